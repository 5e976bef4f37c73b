// site.rs
use crate::schema::ExtractionSchema;
use scraper::Selector;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
#[error("invalid selector `{selector}`: {reason}")]
pub struct SelectorError {
    pub selector: String,
    pub reason: String,
}

pub fn compile_selector(selector: &str) -> Result<Selector, SelectorError> {
    Selector::parse(selector).map_err(|e| SelectorError {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Substrings that identify the inline scripts worth parsing.
#[derive(Debug, Clone)]
pub struct ScriptMarkers {
    /// Script carrying most structured fields; kept whole.
    pub details: String,
    /// The huge, heavily repeated script. Only one delimited section of it
    /// is parsed.
    pub shared_block: String,
    pub shared_block_section: usize,
    pub images: String,
    pub floorplans: String,
    /// Splits a multi-section script into independently parsable pieces.
    pub delimiter: String,
}

/// Everything that differs between listing sites: URLs, HTML markers, script
/// markers and the extraction schema.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    pub name: String,
    /// Ends with `/`; search and listing paths are appended to it.
    pub base_url: String,
    pub search_path: String,
    pub page_size: usize,
    pub result_count_selector: String,
    pub listing_card_selector: String,
    pub listing_id_attribute: String,
    pub listing_prefix: String,
    pub description_selector: String,
    pub markers: ScriptMarkers,
    pub schema: ExtractionSchema,
}

impl SiteProfile {
    pub fn rightmove() -> Self {
        Self {
            name: "rightmove".to_string(),
            base_url: "https://www.rightmove.co.uk/property-to-rent/".to_string(),
            search_path: "find.html".to_string(),
            page_size: 24,
            result_count_selector: "span.searchHeader-resultCount".to_string(),
            listing_card_selector: "div.l-searchResult.is-list".to_string(),
            listing_id_attribute: "id".to_string(),
            listing_prefix: "property-".to_string(),
            description_selector: "div.left.overflow-hidden.agent-content".to_string(),
            markers: ScriptMarkers {
                details: "RIGHTMOVE.ANALYTICS.DataLayer.pushKV(k,v)".to_string(),
                shared_block: "RIGHTMOVE.ANALYTICS.PageViewTracker.trackOnClick('#facebook'"
                    .to_string(),
                shared_block_section: 6,
                images: "var imageGallery".to_string(),
                floorplans: "RIGHTMOVE.PROPERTYDETAILS.FloorplanViewer".to_string(),
                delimiter: "(jQuery);".to_string(),
            },
            schema: ExtractionSchema::rightmove(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "rightmove" => Some(Self::rightmove()),
            _ => None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    pub fn with_schema(mut self, schema: ExtractionSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn search_url(&self) -> String {
        format!("{}{}", self.base_url, self.search_path)
    }

    /// Detail page for a listing-card id such as `property-67134849`.
    pub fn listing_url(&self, card_id: &str) -> String {
        format!("{}{}.html", self.base_url, card_id)
    }

    /// Canonical URL for a site-assigned listing id such as `67134849`.
    pub fn canonical_url(&self, unique_id: &str) -> String {
        format!("{}{}{}.html", self.base_url, self.listing_prefix, unique_id)
    }

    /// Checks URLs and selectors up front so a bad profile fails before any request.
    pub fn validate(&self) -> Result<(), ProfileError> {
        Url::parse(&self.search_url()).map_err(|e| ProfileError::BaseUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if self.page_size == 0 {
            return Err(ProfileError::PageSize);
        }
        for selector in [
            &self.result_count_selector,
            &self.listing_card_selector,
            &self.description_selector,
        ] {
            compile_selector(selector)?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("invalid base url {url}: {reason}")]
    BaseUrl { url: String, reason: String },
    #[error("page size must be at least 1")]
    PageSize,
    #[error(transparent)]
    Selector(#[from] SelectorError),
}
