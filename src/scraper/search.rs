// search.rs
use crate::scraper::site::{compile_selector, SelectorError, SiteProfile};
use crate::scraper::{FetchClient, SearchError, SearchFilters};
use scraper::{Html, Selector};
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

/// Results-page offsets for `total` listings: `0, page_size, 2 * page_size, ...`.
pub fn page_indices(total: usize, page_size: usize) -> Vec<usize> {
    if page_size == 0 {
        return Vec::new();
    }
    (0..total.div_ceil(page_size))
        .map(|page| page * page_size)
        .collect()
}

/// Walks every results page of one search area and collects listing URLs.
pub struct SearchCrawler {
    client: FetchClient,
    site: Arc<SiteProfile>,
    result_count: Selector,
    listing_card: Selector,
}

impl SearchCrawler {
    pub fn new(client: FetchClient, site: Arc<SiteProfile>) -> Result<Self, SelectorError> {
        let result_count = compile_selector(&site.result_count_selector)?;
        let listing_card = compile_selector(&site.listing_card_selector)?;

        Ok(Self {
            client,
            site,
            result_count,
            listing_card,
        })
    }

    /// Listing URLs for `area`, in site order. Never fails: a bad first page
    /// gives an empty list, a bad later page is skipped.
    pub fn discover(&self, area: &str, filters: &SearchFilters) -> Vec<String> {
        let first = match self.fetch_page(area, filters, 0) {
            Ok(html) => html,
            Err(e) => {
                warn!(area, error = %e, "search count request failed");
                return Vec::new();
            }
        };

        let total = match self.parse_total_count(&first) {
            Some(total) => total,
            None => {
                warn!(area, error = %SearchError::MissingResultCount, "no usable result count");
                return Vec::new();
            }
        };

        let indices = page_indices(total, self.site.page_size);
        info!(area, total, pages = indices.len(), "search results counted");

        let mut urls = Vec::new();
        for index in indices {
            let ids = if index == 0 {
                self.parse_listing_ids(&first)
            } else {
                match self.fetch_page(area, filters, index) {
                    Ok(html) => self.parse_listing_ids(&html),
                    Err(e) => {
                        warn!(area, index, error = %e, "search page skipped");
                        continue;
                    }
                }
            };

            info!(area, index, listings = ids.len(), "search page parsed");
            urls.extend(ids.iter().map(|id| self.site.listing_url(id)));
        }

        urls
    }

    pub fn page_url(
        &self,
        area: &str,
        filters: &SearchFilters,
        index: usize,
    ) -> Result<Url, SearchError> {
        let search_url = self.site.search_url();
        Url::parse_with_params(&search_url, filters.query_pairs(area, index)).map_err(|e| {
            SearchError::InvalidUrl {
                url: search_url,
                reason: e.to_string(),
            }
        })
    }

    fn fetch_page(
        &self,
        area: &str,
        filters: &SearchFilters,
        index: usize,
    ) -> Result<String, SearchError> {
        let url = self.page_url(area, filters, index)?;
        let resp = self.client.get(url.as_str())?;
        if !resp.is_success() {
            return Err(SearchError::HttpStatus { status: resp.status });
        }
        Ok(resp.body)
    }

    /// Total listings advertised in the results header, e.g. `1,234`.
    pub fn parse_total_count(&self, html: &str) -> Option<usize> {
        let document = Html::parse_document(html);
        let element = document.select(&self.result_count).next()?;

        let digits: String = element
            .text()
            .flat_map(|t| t.chars())
            .filter(|c| c.is_ascii_digit())
            .collect();
        if digits.is_empty() {
            return None;
        }
        digits.parse().ok()
    }

    pub fn parse_listing_ids(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        document
            .select(&self.listing_card)
            .filter_map(|card| card.value().attr(&self.site.listing_id_attribute))
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }
}
