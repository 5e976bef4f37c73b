// src/tests/config_tests.rs
use crate::config::{FetchSettings, RunConfig};
use crate::domain::CanonicalField;
use crate::errors::ConfigError;
use crate::scraper::{Backoff, DEFAULT_WORKERS, USER_AGENT_POOL};
use std::time::Duration;

const MINIMAL: &str = r#"{
    "areas": ["REGION^87490", "OUTCODE^2510"],
    "filters": { "maxPrice": 2000, "minBedrooms": 2 }
}"#;

#[test]
fn minimal_config_gets_defaults() {
    let config = RunConfig::from_json(MINIMAL).expect("valid config");

    assert_eq!(config.areas.len(), 2);
    assert_eq!(config.site, "rightmove");
    assert_eq!(config.workers, DEFAULT_WORKERS);
    assert_eq!(config.filters.max_price, 2000);
    assert_eq!(config.filters.min_bedrooms, 2);
    assert!(config.filters.keywords.is_empty());
    assert_eq!(config.filters.radius, 0.0);
    assert_eq!(config.fetch, FetchSettings::default());

    let fetch = config.fetch_config();
    assert_eq!(fetch.retry.max_retries, 6);
    assert_eq!(fetch.retry.retry_on_status, vec![408, 429, 500, 502, 503, 504]);
    assert_eq!(fetch.user_agents.len(), USER_AGENT_POOL.len());
}

#[test]
fn missing_required_filter_is_a_parse_error() {
    let json = r#"{ "areas": ["E8"], "filters": { "maxPrice": 2000 } }"#;
    let err = RunConfig::from_json(json).expect_err("minBedrooms is required");
    assert!(matches!(err, ConfigError::Parse(_)));
    assert!(err.to_string().contains("minBedrooms"), "{err}");
}

#[test]
fn empty_or_blank_areas_are_rejected() {
    let none = r#"{ "areas": [], "filters": { "maxPrice": 1, "minBedrooms": 1 } }"#;
    assert!(matches!(RunConfig::from_json(none), Err(ConfigError::NoAreas)));

    let blank = r#"{ "areas": ["E8", "  "], "filters": { "maxPrice": 1, "minBedrooms": 1 } }"#;
    assert!(matches!(
        RunConfig::from_json(blank),
        Err(ConfigError::BlankArea(1))
    ));
}

#[test]
fn zero_workers_is_rejected() {
    let json = r#"{ "areas": ["E8"], "filters": { "maxPrice": 1, "minBedrooms": 1 }, "workers": 0 }"#;
    assert!(matches!(RunConfig::from_json(json), Err(ConfigError::NoWorkers)));
}

#[test]
fn shrinking_backoff_is_rejected() {
    let json = r#"{
        "areas": ["E8"],
        "filters": { "maxPrice": 1, "minBedrooms": 1 },
        "fetch": { "backoff_factor": 0.5 }
    }"#;
    assert!(matches!(RunConfig::from_json(json), Err(ConfigError::Fetch(_))));
}

#[test]
fn unknown_site_fails_before_any_request() {
    let json = r#"{ "areas": ["E8"], "filters": { "maxPrice": 1, "minBedrooms": 1 }, "site": "nowhere" }"#;
    let config = RunConfig::from_json(json).expect("parses");
    assert!(matches!(
        config.site_profile(),
        Err(ConfigError::UnknownSite(site)) if site == "nowhere"
    ));
}

#[test]
fn unknown_schema_name_is_fatal() {
    let json = r#"{ "areas": ["E8"], "filters": { "maxPrice": 1, "minBedrooms": 1 }, "schema": "nope" }"#;
    let config = RunConfig::from_json(json).expect("parses");
    assert!(matches!(config.site_profile(), Err(ConfigError::Schema(_))));
}

#[test]
fn overrides_apply_to_site_profile() {
    let json = r#"{
        "areas": ["E8"],
        "filters": { "maxPrice": 1800, "minBedrooms": 1, "keywords": ["garden"], "radius": 1.0 },
        "schema": "zoopla",
        "base_url": "http://127.0.0.1:8080/lettings"
    }"#;
    let config = RunConfig::from_json(json).expect("valid config");
    let profile = config.site_profile().expect("valid profile");

    assert_eq!(profile.schema.name(), "zoopla");
    assert_eq!(profile.base_url, "http://127.0.0.1:8080/lettings/");
    assert_eq!(
        profile.canonical_url("42"),
        "http://127.0.0.1:8080/lettings/property-42.html"
    );
    assert_eq!(config.filters.keywords, vec!["garden"]);
}

#[test]
fn bad_base_url_is_fatal() {
    let json = r#"{ "areas": ["E8"], "filters": { "maxPrice": 1, "minBedrooms": 1 }, "base_url": "not a url" }"#;
    let config = RunConfig::from_json(json).expect("parses");
    assert!(matches!(config.site_profile(), Err(ConfigError::Profile(_))));
}

#[test]
fn schema_file_override_is_loaded() {
    let path = std::env::temp_dir().join(format!("schema-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(
        &path,
        r#"{"name": "custom", "entries": [
            {"field": "rent_pcm", "token": "rent", "multiplicity": "single"}
        ]}"#,
    )
    .expect("temp file written");

    let json = format!(
        r#"{{ "areas": ["E8"], "filters": {{ "maxPrice": 1, "minBedrooms": 1 }}, "schema_path": {:?} }}"#,
        path.display().to_string()
    );
    let config = RunConfig::from_json(&json).expect("valid config");
    let profile = config.site_profile().expect("valid profile");
    std::fs::remove_file(&path).ok();

    assert_eq!(profile.schema.name(), "custom");
    assert_eq!(
        profile.schema.lookup("rent").map(|d| d.field),
        Some(CanonicalField::RentPcm)
    );
}

#[test]
fn fetch_settings_convert_to_fetch_config() {
    let settings = FetchSettings {
        timeout_secs: 7,
        max_retries: 2,
        backoff_base_ms: 250,
        backoff_factor: 3.0,
        backoff_max_ms: 1000,
        jitter: false,
        retry_on_status: vec![503],
        user_agents: Some(vec!["agent".to_string()]),
        ..FetchSettings::default()
    };
    let config = settings.to_fetch_config();

    assert_eq!(config.timeout, Duration::from_secs(7));
    assert_eq!(config.retry.max_retries, 2);
    assert_eq!(config.retry.retry_on_status, vec![503]);
    assert_eq!(config.user_agents, vec!["agent"]);
    assert_eq!(config.retry.backoff.delay(1), Duration::from_millis(750));
    assert!(matches!(config.retry.backoff, Backoff::Exponential { jitter: false, .. }));
}

#[test]
fn missing_config_file_is_a_read_error() {
    let err = RunConfig::load("/no/such/config.json").expect_err("missing file");
    assert!(matches!(err, ConfigError::Read { .. }));
}
