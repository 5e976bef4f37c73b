// src/tests/availability_tests.rs
use crate::domain::availability::{
    date_from_description, format_canonical, normalize, parse_script_date, resolve_availability,
};

#[test]
fn both_script_formats_normalize_to_canonical() {
    assert_eq!(
        normalize("2020-03-13-12-57-10").as_deref(),
        Some("2020-03-13 12:57:10")
    );
    assert_eq!(
        normalize("2020-03-13 12:57:10").as_deref(),
        Some("2020-03-13 12:57:10")
    );
}

#[test]
fn bare_date_lands_on_midnight() {
    assert_eq!(normalize("2020-03-13").as_deref(), Some("2020-03-13 00:00:00"));
}

#[test]
fn junk_script_values_do_not_parse() {
    for raw in ["", "   ", "Now", "13/03/2020", "2020-13-45-00-00-00"] {
        assert!(parse_script_date(raw).is_none(), "{raw:?} should not parse");
    }
}

#[test]
fn description_date_is_day_first() {
    let date = date_from_description("Available from 13/03/2020, unfurnished.").expect("date");
    assert_eq!(format_canonical(&date), "2020-03-13 00:00:00");
}

#[test]
fn description_skips_impossible_dates() {
    let date = date_from_description("Ref 45/99/2020. Move in 1/4/2021.").expect("second date");
    assert_eq!(format_canonical(&date), "2021-04-01 00:00:00");
    assert!(date_from_description("Available now").is_none());
}

#[test]
fn script_value_beats_description() {
    let date = resolve_availability(Some("2020-05-01-09-00-00"), Some("from 13/03/2020"))
        .expect("script date");
    assert_eq!(format_canonical(&date), "2020-05-01 09:00:00");
}

#[test]
fn unparsable_script_value_falls_back_to_description() {
    let date = resolve_availability(Some("Now"), Some("from 13/03/2020")).expect("fallback");
    assert_eq!(format_canonical(&date), "2020-03-13 00:00:00");

    assert!(resolve_availability(None, Some("ask the agent")).is_none());
    assert!(resolve_availability(None, None).is_none());
}
