mod collector;
mod detail;
mod fetch;
mod fragments;
mod models;
mod orchestrator;
mod pool;
mod scraper_error;
mod search;
pub mod site;

pub use detail::DetailExtractor;
pub use fetch::{
    Backoff, FetchClient, FetchConfig, RetryConfig, DEFAULT_USER_AGENT, USER_AGENT_POOL,
};
pub use fragments::{isolate, FragmentSource};
pub use models::SearchFilters;
pub use orchestrator::{Orchestrator, RunSummary};
pub use pool::{WorkerPool, DEFAULT_WORKERS};
pub use scraper_error::{ExtractionError, FetchError, SearchError};
pub use search::{page_indices, SearchCrawler};
pub use site::SiteProfile;
