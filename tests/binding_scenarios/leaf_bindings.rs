//! Byte Buffer and Date/Time Bindings

use crate::common::*;
use chrono::{NaiveDate, NaiveDateTime};

// ============================================================================
// Bytes
// ============================================================================

#[test]
fn bytes_are_base64() {
    let text = jsonbind::serialize(&b"Hello".to_vec()).unwrap();
    assert_eq!(text, r#""SGVsbG8=""#);

    let bytes: Vec<u8> = jsonbind::deserialize_as(r#""SGVsbG8=""#).unwrap();
    assert_eq!(bytes, b"Hello".to_vec());
}

#[test]
fn bytes_inside_a_dict() {
    let engine = engine();
    let dict = Dict::new().with("payload", vec![0u8, 255]);
    assert_eq!(engine.serialize(&dict).unwrap(), r#"{"payload":"AP8="}"#);
}

// ============================================================================
// Date/time
// ============================================================================

fn new_year() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2020, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

#[test]
fn date_format_is_process_wide_until_replaced() {
    let engine = engine();
    engine.register(DateTimeBinding::new("%Y-%m-%d").unwrap());
    assert_eq!(engine.serialize(&new_year()).unwrap(), r#""2020-01-01""#);

    engine.register(DateTimeBinding::new("%d.%m.%Y").unwrap());
    let changed = engine.serialize(&new_year()).unwrap();
    assert_eq!(changed, r#""01.01.2020""#);

    // Nested values pick up the new format too.
    let dict = Dict::new().with("when", new_year());
    assert_eq!(engine.serialize(&dict).unwrap(), r#"{"when":"01.01.2020"}"#);
}

#[test]
fn builder_sets_the_initial_format() {
    let engine = Engine::builder().datetime_format("%Y/%m/%d").build().unwrap();
    assert_eq!(engine.serialize(&new_year()).unwrap(), r#""2020/01/01""#);
    let back: NaiveDateTime = engine.deserialize_as(r#""2020/01/01""#).unwrap();
    assert_eq!(back, new_year());
}

#[test]
fn preset_formats() {
    let engine = engine();
    let value = NaiveDate::from_ymd_opt(2021, 6, 15)
        .unwrap()
        .and_hms_micro_opt(8, 5, 9, 42)
        .unwrap();
    let expected = [
        (DateTimeFormat::TimeStamp, "2021-06-15 08:05:09.000042"),
        (DateTimeFormat::Date, "2021-06-15"),
        (DateTimeFormat::Time, "08:05:09.000042"),
        (DateTimeFormat::ShortTime, "08:05:09"),
        (DateTimeFormat::TinyTime, "08:05"),
    ];
    for (format, text) in expected {
        engine.register(DateTimeBinding::preset(format));
        assert_eq!(engine.serialize(&value).unwrap(), format!("\"{text}\""));
    }
}
