//! Tests for key resolution, overrides and time access on the metadata kinds.

use chrono::{TimeZone, Utc};

use field_metadata::{
    same_content, GetOptions, GribMetadata, Metadata, MetadataError, MetadataUpdate, RawMetadata,
    Value, ValueType, DATETIME,
};

fn raw() -> RawMetadata {
    [
        ("shortName", Value::from("2t")),
        ("perturbationNumber", Value::Int(5)),
        ("level", Value::from("500")),
        ("units", Value::Missing),
    ]
    .into_iter()
    .collect()
}

fn grib() -> GribMetadata {
    GribMetadata::from_pairs([
        ("shortName", Value::from("t")),
        ("param", Value::from("t")),
        ("typeOfLevel", Value::from("isobaricInhPa")),
        ("level", Value::Int(850)),
        ("dataDate", Value::Int(20180801)),
        ("dataTime", Value::Int(1200)),
        ("step", Value::Int(0)),
    ])
}

// ============================================================================
// Missing keys
// ============================================================================

#[test]
fn test_absent_key_returns_default() {
    let md = raw();
    assert_eq!(md.get("nosuchkey"), Value::Missing);
    assert_eq!(md.get_or("nosuchkey", Value::Int(-1)), Value::Int(-1));
    assert!(!md.contains("nosuchkey"));
}

#[test]
fn test_absent_key_raises_when_requested() {
    let err = raw().require("nosuchkey").unwrap_err();
    assert!(err.is_key_not_found());
    assert_eq!(err.to_string(), "key not found: nosuchkey");
}

#[test]
fn test_stored_missing_is_treated_as_missing() {
    let md = raw();
    assert!(md.contains("units"));
    assert_eq!(md.get_or("units", Value::from("K")), Value::from("K"));
    assert!(md.require("units").is_err());
}

// ============================================================================
// Casting
// ============================================================================

#[test]
fn test_astype_post_cast() {
    let md = raw();
    assert_eq!(md.get_as("level", ValueType::Int), Value::Int(500));
    assert_eq!(md.get_as("perturbationNumber", ValueType::Str), Value::from("5"));
}

#[test]
fn test_cast_failure_is_swallowed() {
    let md = raw();
    assert_eq!(md.get_as("shortName", ValueType::Int), Value::Missing);

    let opts = GetOptions::new()
        .astype(ValueType::Float)
        .raise_on_missing();
    assert_eq!(md.get_with("shortName", &opts).unwrap(), Value::Missing);
}

#[test]
fn test_native_astype_on_grib() {
    let md = grib();
    assert!(md.supports_native_astype());
    assert_eq!(md.get_as("level", ValueType::Str), Value::from("850"));
    assert_eq!(md.get_as("level", ValueType::Float), Value::Float(850.0));

    let update = MetadataUpdate::new().set("stepRange", "0-12");
    assert_eq!(md.overridden(&update).get_as("stepRange", ValueType::Int), Value::Int(12));
    assert!(!raw().supports_native_astype());
    assert_eq!(
        raw().overridden(&update).get_as("stepRange", ValueType::Int),
        Value::Missing
    );
}

// ============================================================================
// Overrides
// ============================================================================

#[test]
fn test_override_does_not_mutate_receiver() {
    let md = raw();
    let md2 = md.overridden(&MetadataUpdate::new().set("shortName", "msl").set("centre", "ecmf"));

    assert_eq!(md2.get("shortName"), Value::from("msl"));
    assert_eq!(md2.get("centre"), Value::from("ecmf"));
    assert_eq!(md2.get("perturbationNumber"), Value::Int(5));

    assert_eq!(md.get("shortName"), Value::from("2t"));
    assert!(!md.contains("centre"));
}

#[test]
fn test_override_merges_sources_in_order() {
    let other: RawMetadata = [("a", 1), ("b", 2)].into_iter().collect();
    let update = MetadataUpdate::new()
        .merge_metadata(&other)
        .merge_pairs([("b", 3), ("c", 4)])
        .set("c", 5);

    let md = raw().with_overrides(&update);
    assert_eq!(md.get("a"), Value::Int(1));
    assert_eq!(md.get("b"), Value::Int(3));
    assert_eq!(md.get("c"), Value::Int(5));
}

#[test]
fn test_override_keeps_kind() {
    let md = grib().with_overrides(&MetadataUpdate::new().set("level", 500));
    assert_eq!(md.data_format(), Some("grib"));
    assert_eq!(md.get("level"), Value::Int(500));
}

#[test]
fn test_items_round_trip() {
    let md = raw();
    let copy: RawMetadata = md.items().into_iter().collect();
    assert_eq!(copy, md);
    assert!(same_content(&copy, &md));
}

// ============================================================================
// Custom keys
// ============================================================================

#[test]
fn test_datetime_custom_key_on_grib() {
    let md = grib();
    assert!(md.is_custom_key(DATETIME));
    assert!(!md.contains(DATETIME));
    assert!(!md.keys().iter().any(|k| k == DATETIME));
    assert_eq!(md.get(DATETIME), Value::from("2018-08-01T12:00:00"));
}

#[test]
fn test_stored_key_shadows_custom_key() {
    let md = grib().overridden(&MetadataUpdate::new().set(DATETIME, "stored"));
    assert!(!md.is_custom_key(DATETIME));
    assert_eq!(md.get(DATETIME), Value::from("stored"));
}

#[test]
fn test_datetime_unavailable_on_raw() {
    let md = raw();
    assert_eq!(md.get(DATETIME), Value::Missing);

    match md.require(DATETIME) {
        Err(MetadataError::KeyNotFound { key, reason }) => {
            assert_eq!(key, DATETIME);
            assert!(reason.is_some());
        }
        other => panic!("expected KeyNotFound, got {:?}", other),
    }
}

#[test]
fn test_datetime_computation_failure_reports_reason() {
    let md = GribMetadata::from_pairs([("shortName", "t")]);
    let err = md.require(DATETIME).unwrap_err();
    assert!(err.to_string().contains("missing dataDate"));
}

#[test]
fn test_datetime_with_out_of_range_step_is_missing() {
    let md = grib().overridden(&MetadataUpdate::new().set("step", 3_000_000_000i64));
    assert_eq!(md.get(DATETIME), Value::Missing);
    assert_eq!(md.get_or(DATETIME, Value::from("n/a")), Value::from("n/a"));

    match md.require(DATETIME) {
        Err(MetadataError::KeyNotFound { key, reason }) => {
            assert_eq!(key, DATETIME);
            assert!(reason.is_some_and(|r| r.contains("out of range")));
        }
        other => panic!("expected KeyNotFound, got {:?}", other),
    }
    assert!(md.valid_datetime().is_err());
}

// ============================================================================
// Time access
// ============================================================================

#[test]
fn test_datetime_pair() {
    let md = grib().overridden(&MetadataUpdate::new().set("step", 6));
    let pair = md.datetime().unwrap();
    assert_eq!(
        pair.base_time,
        Some(Utc.with_ymd_and_hms(2018, 8, 1, 12, 0, 0).unwrap())
    );
    assert_eq!(
        pair.valid_time,
        Some(Utc.with_ymd_and_hms(2018, 8, 1, 18, 0, 0).unwrap())
    );
}

#[test]
fn test_raw_has_no_time() {
    let pair = raw().datetime().unwrap();
    assert!(pair.base_time.is_none());
    assert!(pair.valid_time.is_none());
}

#[test]
fn test_mars_style_date_time_keys() {
    let md = GribMetadata::from_pairs([
        ("date", Value::Int(20180111)),
        ("time", Value::Int(0)),
        ("step", Value::Int(24)),
    ]);
    assert_eq!(md.get(DATETIME), Value::from("2018-01-12T00:00:00"));
}

// ============================================================================
// Geography
// ============================================================================

#[test]
fn test_geography_from_grid_corners() {
    let md = grib().overridden(
        &MetadataUpdate::new()
            .set("gridType", "regular_ll")
            .set("latitudeOfFirstGridPointInDegrees", 90.0)
            .set("longitudeOfFirstGridPointInDegrees", 0.0)
            .set("latitudeOfLastGridPointInDegrees", -90.0)
            .set("longitudeOfLastGridPointInDegrees", 359.0),
    );
    let geo = md.geography().expect("geography");
    assert_eq!(geo.grid_type.as_deref(), Some("regular_ll"));
    assert_eq!(geo.bounding_box.min_y, -90.0);
    assert_eq!(geo.bounding_box.max_y, 90.0);
    assert!(raw().geography().is_none());
}
