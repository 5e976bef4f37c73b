// src/tests/orchestrator_tests.rs
use super::utils::*;
use crate::scraper::{Orchestrator, RunSummary, SearchFilters};
use httpmock::{Method::GET, MockServer};

fn orchestrator(base_url: &str) -> Orchestrator {
    Orchestrator::new(test_site(base_url), fast_fetch_config(0), 4)
}

#[test]
fn run_drops_failed_listings_and_keeps_the_rest() {
    let server = MockServer::start();

    let north = server.mock(|when, then| {
        when.method(GET)
            .path("/property-to-rent/find.html")
            .query_param("locationIdentifier", "REGION^1");
        then.status(200)
            .body(search_page("3", &["property-1", "property-2", "property-3"]));
    });
    let south = server.mock(|when, then| {
        when.method(GET)
            .path("/property-to-rent/find.html")
            .query_param("locationIdentifier", "REGION^2");
        then.status(200)
            .body(search_page("2", &["property-4", "property-5"]));
    });

    let good: Vec<_> = ["1", "2", "4"]
        .iter()
        .map(|id| {
            server.mock(|when, then| {
                when.method(GET)
                    .path(format!("/property-to-rent/property-{id}.html"));
                then.status(200).body(full_detail_page());
            })
        })
        .collect();
    let no_description = server.mock(|when, then| {
        when.method(GET).path("/property-to-rent/property-3.html");
        then.status(200)
            .body(detail_page(None, &[details_script(None)]));
    });
    let missing = server.mock(|when, then| {
        when.method(GET).path("/property-to-rent/property-5.html");
        then.status(404);
    });

    let areas = vec!["REGION^1".to_string(), "REGION^2".to_string()];
    let (records, summary) =
        orchestrator(&server.base_url()).run_with_summary(&areas, &SearchFilters::new(2500, 1));

    assert_eq!(records.len(), 3);
    assert_eq!(
        summary,
        RunSummary {
            areas: 2,
            discovered: 5,
            extracted: 3,
            failed: 2,
        }
    );
    assert!(records
        .iter()
        .all(|r| r.website_unique_id() == Some(LISTING_ID)));

    north.assert_calls(1);
    south.assert_calls(1);
    for mock in &good {
        mock.assert_calls(1);
    }
    no_description.assert_calls(1);
    missing.assert_calls(1);
}

#[test]
fn duplicates_across_areas_are_kept() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/property-to-rent/find.html");
        then.status(200).body(search_page("1", &["property-7"]));
    });
    let detail = server.mock(|when, then| {
        when.method(GET).path("/property-to-rent/property-7.html");
        then.status(200).body(full_detail_page());
    });

    let areas = vec!["A".to_string(), "B".to_string()];
    let records = orchestrator(&server.base_url()).run(&areas, &SearchFilters::new(1000, 0));

    assert_eq!(records.len(), 2);
    assert_ne!(records[0].prop_uuid, records[1].prop_uuid);
    detail.assert_calls(2);
}

#[test]
fn discovery_flattens_in_area_order() {
    let server = MockServer::start();
    for (area, card) in [("first", "property-10"), ("second", "property-20")] {
        server.mock(|when, then| {
            when.method(GET)
                .path("/property-to-rent/find.html")
                .query_param("locationIdentifier", area);
            then.status(200).body(search_page("1", &[card]));
        });
    }

    let orchestrator = orchestrator(&server.base_url());
    let urls = orchestrator.discover_all(
        &["first".to_string(), "second".to_string()],
        &SearchFilters::new(900, 1),
    );

    assert_eq!(
        urls,
        vec![
            orchestrator.site().listing_url("property-10"),
            orchestrator.site().listing_url("property-20"),
        ]
    );
}

#[test]
fn unreachable_site_produces_an_empty_run() {
    let orchestrator = orchestrator("http://127.0.0.1:9");
    let records = orchestrator.run(&["E8".to_string()], &SearchFilters::new(1000, 1));
    assert!(records.is_empty());
}
