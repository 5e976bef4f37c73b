// src/tests/search_tests.rs
use super::utils::{fast_fetch_config, search_page, test_site};
use crate::scraper::{page_indices, FetchClient, SearchCrawler, SearchFilters, SiteProfile};
use httpmock::{Method::GET, MockServer};
use std::sync::Arc;

const AREA: &str = "REGION^87490";

fn crawler(site: SiteProfile) -> SearchCrawler {
    let client = FetchClient::new(fast_fetch_config(0)).expect("client builds");
    SearchCrawler::new(client, Arc::new(site)).expect("selectors compile")
}

fn filters() -> SearchFilters {
    SearchFilters {
        keywords: vec!["garden".to_string(), "parking".to_string()],
        radius: 0.5,
        ..SearchFilters::new(2000, 2)
    }
}

#[test]
fn page_indices_cover_every_page_once() {
    assert_eq!(page_indices(100, 24), vec![0, 24, 48, 72, 96]);
    assert_eq!(page_indices(24, 24), vec![0]);
    assert_eq!(page_indices(25, 24), vec![0, 24]);
    assert!(page_indices(0, 24).is_empty());
    assert!(page_indices(10, 0).is_empty());
}

#[test]
fn query_pairs_carry_filters() {
    let pairs = filters().query_pairs("REGION ^87490", 48);
    let get = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    };

    assert_eq!(get("locationIdentifier"), Some("REGION^87490"));
    assert_eq!(get("index"), Some("48"));
    assert_eq!(get("radius"), Some("0.5"));
    assert_eq!(get("minBedrooms"), Some("2"));
    assert_eq!(get("maxPrice"), Some("2000"));
    assert_eq!(get("keywords"), Some("garden,parking"));
}

#[test]
fn empty_keywords_are_left_off_the_query() {
    let pairs = SearchFilters::new(1500, 1).query_pairs("E8", 0);
    assert!(pairs.iter().all(|(k, _)| *k != "keywords"));
    assert!(pairs.iter().any(|(k, v)| *k == "radius" && v == "0"));
}

#[test]
fn result_count_tolerates_thousands_separators() {
    let crawler = crawler(SiteProfile::rightmove());
    assert_eq!(crawler.parse_total_count(&search_page("1,234", &[])), Some(1234));
    assert_eq!(crawler.parse_total_count(&search_page("  97 ", &[])), Some(97));
    assert_eq!(crawler.parse_total_count(&search_page("none", &[])), None);
    assert_eq!(crawler.parse_total_count("<html></html>"), None);
}

#[test]
fn listing_ids_come_from_card_attributes() {
    let crawler = crawler(SiteProfile::rightmove());
    let html = search_page("2", &["property-1", "property-2"]);
    assert_eq!(crawler.parse_listing_ids(&html), vec!["property-1", "property-2"]);
}

#[test]
fn discover_requests_each_index_once_and_keeps_order() {
    let server = MockServer::start();
    let site = test_site(&server.base_url());

    let page_mocks: Vec<_> = [0usize, 24, 48, 72, 96]
        .iter()
        .map(|&index| {
            let ids = [format!("property-{}", index + 1), format!("property-{}", index + 2)];
            let body = search_page("100", &[ids[0].as_str(), ids[1].as_str()]);
            server.mock(|when, then| {
                when.method(GET)
                    .path("/property-to-rent/find.html")
                    .query_param("locationIdentifier", AREA)
                    .query_param("index", index.to_string())
                    .query_param("maxPrice", "2000")
                    .query_param("minBedrooms", "2")
                    .query_param("keywords", "garden,parking");
                then.status(200).body(&body);
            })
        })
        .collect();

    let urls = crawler(site.clone()).discover(AREA, &filters());

    for mock in &page_mocks {
        mock.assert_calls(1);
    }
    assert_eq!(urls.len(), 10);
    assert_eq!(urls[0], site.listing_url("property-1"));
    assert_eq!(urls[2], site.listing_url("property-25"));
    assert_eq!(urls[9], site.listing_url("property-98"));
}

#[test]
fn failed_count_request_yields_nothing() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/property-to-rent/find.html");
        then.status(500);
    });

    let urls = crawler(test_site(&server.base_url())).discover(AREA, &filters());
    assert!(urls.is_empty());
    mock.assert_calls(1);
}

#[test]
fn unparseable_count_yields_nothing() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/property-to-rent/find.html");
        then.status(200).body(search_page("lots", &["property-1"]));
    });

    let urls = crawler(test_site(&server.base_url())).discover(AREA, &filters());
    assert!(urls.is_empty());
    mock.assert_calls(1);
}

#[test]
fn failed_later_page_is_skipped() {
    let server = MockServer::start();
    let first = server.mock(|when, then| {
        when.method(GET)
            .path("/property-to-rent/find.html")
            .query_param("index", "0");
        then.status(200).body(search_page("48", &["property-1"]));
    });
    let second = server.mock(|when, then| {
        when.method(GET)
            .path("/property-to-rent/find.html")
            .query_param("index", "24");
        then.status(404);
    });

    let site = test_site(&server.base_url());
    let urls = crawler(site.clone()).discover(AREA, &filters());

    assert_eq!(urls, vec![site.listing_url("property-1")]);
    first.assert_calls(1);
    second.assert_calls(1);
}
