// config.rs
use crate::errors::ConfigError;
use crate::schema::ExtractionSchema;
use crate::scraper::{
    Backoff, FetchConfig, RetryConfig, SearchFilters, SiteProfile, DEFAULT_WORKERS,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV: &str = "SCRAPER_CONFIG";

// run config
//  ├── areas            (required, non-empty)
//  ├── filters          (maxPrice, minBedrooms required)
//  ├── site             ("rightmove")
//  ├── schema           (built-in schema name, overrides the site's)
//  ├── schema_path      (schema document, overrides both)
//  ├── base_url         (site base url override)
//  ├── workers          (15)
//  └── fetch            (timeouts + retry policy)

#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub areas: Vec<String>,
    pub filters: SearchFilters,
    #[serde(default = "default_site")]
    pub site: String,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub schema_path: Option<PathBuf>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default)]
    pub fetch: FetchSettings,
}

fn default_site() -> String {
    "rightmove".to_string()
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

/// Flat, JSON-friendly view of `FetchConfig`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
    pub backoff_factor: f64,
    pub backoff_max_ms: u64,
    pub jitter: bool,
    pub retry_on_status: Vec<u16>,
    /// Replaces the built-in identity pool when set.
    pub user_agents: Option<Vec<String>>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        let retry = RetryConfig::default();
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            max_retries: retry.max_retries,
            backoff_base_ms: 600,
            backoff_factor: 2.0,
            backoff_max_ms: 20_000,
            jitter: true,
            retry_on_status: retry.retry_on_status,
            user_agents: None,
        }
    }
}

impl FetchSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(ConfigError::Fetch("timeouts must be positive".into()));
        }
        if !self.backoff_factor.is_finite() || self.backoff_factor < 1.0 {
            return Err(ConfigError::Fetch(format!(
                "backoff_factor must be >= 1, got {}",
                self.backoff_factor
            )));
        }
        Ok(())
    }

    pub fn to_fetch_config(&self) -> FetchConfig {
        let defaults = FetchConfig::default();
        FetchConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            retry: RetryConfig {
                max_retries: self.max_retries,
                backoff: Backoff::Exponential {
                    base: Duration::from_millis(self.backoff_base_ms),
                    factor: self.backoff_factor,
                    max: Duration::from_millis(self.backoff_max_ms),
                    jitter: self.jitter,
                },
                retry_on_status: self.retry_on_status.clone(),
                ..defaults.retry
            },
            user_agents: self.user_agents.clone().unwrap_or(defaults.user_agents),
        }
    }
}

impl RunConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    /// Parses and validates. A missing required filter surfaces as `Parse`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.areas.is_empty() {
            return Err(ConfigError::NoAreas);
        }
        if let Some(blank) = self.areas.iter().position(|a| a.trim().is_empty()) {
            return Err(ConfigError::BlankArea(blank));
        }
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        self.fetch.validate()
    }

    /// Site profile with schema and base url overrides applied, validated.
    pub fn site_profile(&self) -> Result<SiteProfile, ConfigError> {
        let mut profile = SiteProfile::by_name(&self.site)
            .ok_or_else(|| ConfigError::UnknownSite(self.site.clone()))?;

        if let Some(name) = &self.schema {
            profile = profile.with_schema(ExtractionSchema::by_name(name)?);
        }
        if let Some(path) = &self.schema_path {
            profile = profile.with_schema(ExtractionSchema::from_file(path)?);
        }
        if let Some(base_url) = &self.base_url {
            profile = profile.with_base_url(base_url.as_str());
        }

        profile.validate()?;
        Ok(profile)
    }

    pub fn fetch_config(&self) -> FetchConfig {
        self.fetch.to_fetch_config()
    }
}
