// src/tests/utils.rs
use crate::scraper::{Backoff, FetchConfig, RetryConfig, SiteProfile};
use std::time::Duration;

pub const LISTING_ID: &str = "67134849";

/// Fetch settings that never sleep between attempts.
pub fn fast_fetch_config(max_retries: u32) -> FetchConfig {
    FetchConfig {
        timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(2),
        retry: RetryConfig {
            max_retries,
            backoff: Backoff::Fixed(Duration::ZERO),
            ..RetryConfig::default()
        },
        ..FetchConfig::default()
    }
}

/// Rightmove profile pointed at a mock server (`server.base_url()`).
pub fn test_site(base_url: &str) -> SiteProfile {
    SiteProfile::rightmove().with_base_url(format!("{base_url}/property-to-rent/"))
}

pub fn details_script(aed: Option<&str>) -> String {
    let aed = aed
        .map(|d| format!(",\n    \"aed\": \"{d}\""))
        .unwrap_or_default();
    format!(
        r#"(function(k,v){{ RIGHTMOVE.ANALYTICS.DataLayer.pushKV(k,v); }})("page", "details");
var propertyData = {{
    "propertyId": "{LISTING_ID}",
    "postcode": "E8 3PH",
    "price": 1950,
    "beds": 2,
    "brandName": "Acme Lettings",
    "displayAddress": "Dalston Lane, London E8"{aed}
}};"#
    )
}

/// Seven `(jQuery);`-delimited sections; only section 6 holds the real location.
pub fn shared_block_script() -> String {
    let mut sections = vec![
        "(function($){ RIGHTMOVE.ANALYTICS.PageViewTracker.trackOnClick('#facebook', 'share'); })"
            .to_string(),
    ];
    for i in 1..6 {
        sections.push(format!(
            "\n(function($){{ var decoy{i} = {{ \"latitude\": 99.{i}, \"longitude\": 99.{i} }}; }})"
        ));
    }
    sections.push(
        r#"
(function($){
    var mapOptions = { "latitude": 51.5379, "longitude": -0.0859, "price": 1 };
    var nearby = [{ "latitude": 0.5, "longitude": 0.5 }];
})"#
        .to_string(),
    );
    sections.push("\n".to_string());
    sections.join("(jQuery);")
}

pub fn images_script() -> String {
    r#"(function($){
    var imageGallery = new RIGHTMOVE.PROPERTYDETAILS.ImageGallery({
        images: [
            { "masterUrl": "https://media.example/img1.jpg" },
            { "masterUrl": "https://media.example/img2.jpg" },
            { "masterUrl": "https://media.example/img3.jpg" }
        ]
    });
})(jQuery);
(function($){ var related = { "masterUrl": "https://media.example/unrelated.jpg" }; })(jQuery);"#
        .to_string()
}

pub fn floorplan_script() -> String {
    r#"(function($){
    RIGHTMOVE.PROPERTYDETAILS.FloorplanViewer.init({
        zoomUrls: ["https://media.example/fp1.gif", "https://media.example/fp2.gif"]
    });
})(jQuery);"#
        .to_string()
}

pub const DEFAULT_DESCRIPTION: &str = "Bright two bedroom flat. Available from 13/03/2020.";

/// Builds a detail page. `None` for the description drops the marker element.
pub fn detail_page(description: Option<&str>, scripts: &[String]) -> String {
    let description = description
        .map(|d| format!(r#"<div class="left overflow-hidden agent-content"><p>{d}</p></div>"#))
        .unwrap_or_default();
    let scripts: String = scripts
        .iter()
        .map(|s| format!("<script type=\"text/javascript\">{s}</script>\n"))
        .collect();

    format!(
        "<!DOCTYPE html><html><head><title>listing</title>\n{scripts}</head>\
         <body><div class=\"main\">{description}</div></body></html>"
    )
}

/// The full listing: every script kind, script date present.
pub fn full_detail_page() -> String {
    detail_page(
        Some(DEFAULT_DESCRIPTION),
        &[
            details_script(Some("2020-03-13-12-57-10")),
            shared_block_script(),
            images_script(),
            floorplan_script(),
        ],
    )
}

/// A results page advertising `count` listings and carrying `card_ids`.
pub fn search_page(count: &str, card_ids: &[&str]) -> String {
    let cards: String = card_ids
        .iter()
        .map(|id| {
            format!(r#"<div class="l-searchResult is-list" id="{id}"><a href="/x">card</a></div>"#)
        })
        .collect();

    format!(
        r#"<html><body>
<div class="searchHeader"><span class="searchHeader-resultCount">{count}</span> results</div>
<div id="l-searchResults">{cards}</div>
</body></html>"#
    )
}
