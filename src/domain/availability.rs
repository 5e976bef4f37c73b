// src/domain/availability.rs

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::LazyLock;

/// Representation every availability date is normalized to.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Dash-separated is what the listing scripts ship; the space-separated form
// shows up once a value has already been through our own pipeline.
const SCRIPT_FORMATS: [&str; 2] = ["%Y-%m-%d-%H-%M-%S", CANONICAL_FORMAT];

static DESCRIPTION_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b").expect("description date regex is valid")
});

/// Parses a script-sourced availability value.
///
/// A bare `YYYY-MM-DD` is accepted too and lands on midnight.
pub fn parse_script_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    SCRIPT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Finds the first valid `dd/mm/yyyy` date in free text, at midnight.
pub fn date_from_description(text: &str) -> Option<NaiveDateTime> {
    DESCRIPTION_DATE.captures_iter(text).find_map(|caps| {
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day).map(|d| d.and_time(NaiveTime::MIN))
    })
}

/// Script value first, description text second.
pub fn resolve_availability(
    script_value: Option<&str>,
    description: Option<&str>,
) -> Option<NaiveDateTime> {
    script_value
        .and_then(parse_script_date)
        .or_else(|| description.and_then(date_from_description))
}

pub fn format_canonical(date: &NaiveDateTime) -> String {
    date.format(CANONICAL_FORMAT).to_string()
}

/// Normalizes either source format straight to the canonical string.
pub fn normalize(raw: &str) -> Option<String> {
    parse_script_date(raw).map(|d| format_canonical(&d))
}
