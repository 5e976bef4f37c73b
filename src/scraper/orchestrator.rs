// orchestrator.rs
use crate::domain::PropertyRecord;
use crate::scraper::pool::WorkerPool;
use crate::scraper::site::SiteProfile;
use crate::scraper::{DetailExtractor, FetchClient, FetchConfig, SearchCrawler, SearchFilters};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub areas: usize,
    pub discovered: usize,
    pub extracted: usize,
    pub failed: usize,
}

/// Fans areas and then listings out over a worker pool. Every worker owns its
/// own fetch client; only the site profile is shared, read-only.
pub struct Orchestrator {
    site: Arc<SiteProfile>,
    fetch: FetchConfig,
    pool: WorkerPool,
}

impl Orchestrator {
    pub fn new(site: SiteProfile, fetch: FetchConfig, workers: usize) -> Self {
        Self {
            site: Arc::new(site),
            fetch,
            pool: WorkerPool::new(workers),
        }
    }

    pub fn site(&self) -> &SiteProfile {
        &self.site
    }

    pub fn run(&self, areas: &[String], filters: &SearchFilters) -> Vec<PropertyRecord> {
        self.run_with_summary(areas, filters).0
    }

    pub fn run_with_summary(
        &self,
        areas: &[String],
        filters: &SearchFilters,
    ) -> (Vec<PropertyRecord>, RunSummary) {
        let start = Instant::now();
        info!(
            site = %self.site.name,
            schema = %self.site.schema.name(),
            schema_tokens = self.site.schema.len(),
            areas = areas.len(),
            workers = self.pool.size(),
            "run started"
        );

        let urls = self.discover_all(areas, filters);
        info!(listings = urls.len(), elapsed = ?start.elapsed(), "discovery finished");

        let discovered = urls.len();
        let records = self.extract_all(urls);

        let summary = RunSummary {
            areas: areas.len(),
            discovered,
            extracted: records.len(),
            failed: discovered.saturating_sub(records.len()),
        };
        info!(
            areas = summary.areas,
            discovered = summary.discovered,
            extracted = summary.extracted,
            failed = summary.failed,
            elapsed = ?start.elapsed(),
            "run finished"
        );

        (records, summary)
    }

    /// Listing URLs across all areas, area order then page order. Duplicates stay.
    pub fn discover_all(&self, areas: &[String], filters: &SearchFilters) -> Vec<String> {
        let results = self.pool.map(
            areas.to_vec(),
            || self.crawler(),
            |crawler, area| {
                let urls = crawler.discover(&area, filters);
                info!(area = %area, listings = urls.len(), "area discovered");
                urls
            },
        );

        results.into_iter().flatten().flatten().collect()
    }

    /// Surviving records; every failed listing is logged and dropped.
    pub fn extract_all(&self, urls: Vec<String>) -> Vec<PropertyRecord> {
        let results = self.pool.map(
            urls,
            || self.extractor(),
            |extractor, url| match extractor.extract(&url) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(url = %url, error = %e, "listing dropped");
                    None
                }
            },
        );

        results.into_iter().flatten().flatten().collect()
    }

    fn client(&self) -> Option<FetchClient> {
        match FetchClient::new(self.fetch.clone()) {
            Ok(client) => Some(client),
            Err(e) => {
                error!(error = %e, "worker could not build fetch client");
                None
            }
        }
    }

    fn crawler(&self) -> Option<SearchCrawler> {
        match SearchCrawler::new(self.client()?, Arc::clone(&self.site)) {
            Ok(crawler) => Some(crawler),
            Err(e) => {
                error!(error = %e, "worker could not build search crawler");
                None
            }
        }
    }

    fn extractor(&self) -> Option<DetailExtractor> {
        match DetailExtractor::new(self.client()?, Arc::clone(&self.site)) {
            Ok(extractor) => Some(extractor),
            Err(e) => {
                error!(error = %e, "worker could not build detail extractor");
                None
            }
        }
    }
}
