// detail.rs
use crate::domain::PropertyRecord;
use crate::js;
use crate::scraper::collector::FieldCollector;
use crate::scraper::fragments::{self, Fragment};
use crate::scraper::site::{compile_selector, SelectorError, SiteProfile};
use crate::scraper::{ExtractionError, FetchClient};
use scraper::{Html, Selector};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// What a detail page yields before any script is parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPage {
    pub description: String,
    pub scripts: Vec<String>,
}

/// Turns one listing's detail page into a `PropertyRecord`.
pub struct DetailExtractor {
    client: FetchClient,
    site: Arc<SiteProfile>,
    description: Selector,
    script: Selector,
}

impl DetailExtractor {
    pub fn new(client: FetchClient, site: Arc<SiteProfile>) -> Result<Self, SelectorError> {
        let description = compile_selector(&site.description_selector)?;
        let script = compile_selector("script")?;

        Ok(Self {
            client,
            site,
            description,
            script,
        })
    }

    pub fn extract(&self, listing_url: &str) -> Result<PropertyRecord, ExtractionError> {
        let resp = self.client.get(listing_url)?;
        if !resp.is_success() {
            return Err(ExtractionError::HttpStatus {
                status: resp.status,
            });
        }

        let record = self.extract_from_html(&resp.body)?;
        debug!(
            url = listing_url,
            id = record.website_unique_id().unwrap_or("<none>"),
            "listing extracted"
        );
        Ok(record)
    }

    /// Everything after the fetch. Deterministic apart from the generated UUID.
    pub fn extract_from_html(&self, html: &str) -> Result<PropertyRecord, ExtractionError> {
        let page = self.read_page(html)?;

        let fragments = fragments::isolate(&page.scripts, &self.site.markers);
        if fragments.is_empty() {
            return Err(ExtractionError::MissingMarker("listing scripts"));
        }

        let mut collector = FieldCollector::new(&self.site.schema);
        self.walk_fragments(&fragments, &mut collector)?;

        let description = Some(page.description);
        let fields = collector.finish(description.as_deref());

        let mut record = PropertyRecord::new(Uuid::new_v4(), None, description, fields);
        record.url = record
            .website_unique_id()
            .map(|id| self.site.canonical_url(id));

        Ok(record)
    }

    pub fn read_page(&self, html: &str) -> Result<DetailPage, ExtractionError> {
        let document = Html::parse_document(html);

        let description = document
            .select(&self.description)
            .next()
            .ok_or(ExtractionError::MissingMarker("description"))?;
        let description = description
            .text()
            .flat_map(str::split_whitespace)
            .collect::<Vec<_>>()
            .join(" ");

        let scripts = document
            .select(&self.script)
            .map(|s| s.text().collect::<String>())
            .filter(|s| !s.trim().is_empty())
            .collect();

        Ok(DetailPage {
            description,
            scripts,
        })
    }

    /// Parses and walks each fragment in order. Broken fragments are skipped;
    /// the listing only fails when none of them parse.
    fn walk_fragments(
        &self,
        fragments: &[Fragment],
        collector: &mut FieldCollector<'_>,
    ) -> Result<(), ExtractionError> {
        let mut parsed = 0;
        let mut last_error = None;

        for (index, fragment) in fragments.iter().enumerate() {
            match js::parse(&fragment.text) {
                Ok(program) => {
                    parsed += 1;
                    js::walk_assignments(&program, |assignment| collector.offer(assignment));
                }
                Err(source) => {
                    let err = ExtractionError::MalformedFragment { index, source };
                    warn!(fragment = %fragment.source, error = %err, "fragment skipped");
                    last_error = Some(err);
                }
            }
        }

        match last_error {
            Some(err) if parsed == 0 => Err(err),
            _ => Ok(()),
        }
    }
}
