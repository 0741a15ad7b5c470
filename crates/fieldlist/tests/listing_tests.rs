//! Tests for concatenation, listing views and JSON-lines input.

use chrono::{TimeZone, Utc};

use field_metadata::{Metadata, MetadataRequest, NamespaceSelector, Value};
use fieldlist::{Field, FieldList, JsonLinesReader, MetadataKind, Selection};
use test_utils::{ml_data, ml_data_records, strs, tuv_pl, tuv_pl_records, write_json_lines};

// ============================================================================
// Concatenation
// ============================================================================

#[test]
fn test_concat_lengths_and_positions() {
    let a = tuv_pl();
    let b = ml_data();
    let c = &a + &b;

    assert_eq!(c.len(), a.len() + b.len());
    for i in 0..c.len() {
        let expected = if i < a.len() { &a[i] } else { &b[i - a.len()] };
        assert!(Field::ptr_eq(&c[i], expected));
    }
}

#[test]
fn test_concat_has_no_dedup() {
    let a = tuv_pl();
    let doubled = FieldList::concat([a.clone(), a.clone()]);
    assert_eq!(doubled.len(), 36);
    assert_eq!(doubled.index("param"), strs(&["t", "u", "v"]));
}

// ============================================================================
// Listing
// ============================================================================

#[test]
fn test_ls_default_columns() {
    let table = tuv_pl().ls(None);
    assert_eq!(table.len(), 18);
    assert_eq!(table.columns[0], "centre");
    assert_eq!(table.columns.len(), 10);
    assert_eq!(table.rows[0][1], Value::from("t"));
    // stepRange is present, dataType too
    assert_eq!(table.column("dataType").unwrap()[0], &Value::from("an"));
}

#[test]
fn test_ls_explicit_columns() {
    let table = ml_data().ls(Some(&["param", "levelist", "nosuchkey"][..]));
    assert_eq!(table.len(), 36);
    assert_eq!(table.rows[35], vec![Value::from("lnsp"), Value::Int(1), Value::Missing]);
}

#[test]
fn test_describe_groups_by_param() {
    let summary = (tuv_pl() + ml_data()).describe();
    assert_eq!(
        summary.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["lnsp", "t", "u", "v"]
    );

    let t = &summary["t"];
    assert_eq!(t.get("typeOfLevel").unwrap(), &strs(&["hybrid", "isobaricInhPa"])[..]);
    assert_eq!(t.get("level").unwrap().len(), 35 + 6);
    assert_eq!(summary["lnsp"].get("paramId").unwrap(), &[Value::Int(152)][..]);
}

#[test]
fn test_datetime_summary() {
    let summary = (tuv_pl() + ml_data()).datetime();
    let expected = vec![
        Utc.with_ymd_and_hms(2018, 1, 11, 12, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2018, 8, 1, 12, 0, 0).unwrap(),
    ];
    assert_eq!(summary.base_time, expected);
    assert_eq!(summary.valid_time, expected);
}

#[test]
fn test_field_metadata_queries() {
    let ds = tuv_pl();
    let vertical = ds[0]
        .query_metadata(&MetadataRequest::new().namespace(NamespaceSelector::One("vertical".into())))
        .unwrap();
    let flat = vertical.as_flat().unwrap();
    assert_eq!(flat.get("level"), Some(&Value::Int(1000)));
    assert_eq!(flat.get("typeOfLevel"), Some(&Value::from("isobaricInhPa")));

    let levels = ds
        .sel(&Selection::new().with("param", "t"))
        .metadata(&MetadataRequest::new().key("level"))
        .unwrap();
    assert_eq!(levels.len(), 6);
    assert_eq!(levels[5].as_scalar(), Some(&Value::Int(300)));

    let err = ds
        .metadata(
            &MetadataRequest::new()
                .key("level")
                .namespace(NamespaceSelector::from_names(["vertical", "time"])),
        )
        .unwrap_err();
    assert!(err.is_usage());
}

#[test]
fn test_datetime_custom_key_on_fields() {
    let ds = ml_data();
    assert_eq!(
        ds[0].metadata().get("datetime"),
        Value::from("2018-01-11T12:00:00")
    );
}

// ============================================================================
// JSON-lines input
// ============================================================================

#[test]
fn test_read_json_lines_grib() {
    let file = write_json_lines(&tuv_pl_records());
    let ds = JsonLinesReader::new(MetadataKind::Grib)
        .read_path(file.path())
        .unwrap();

    assert_eq!(ds.len(), 18);
    assert!(!ds[0].is_loaded());
    assert_eq!(ds.indices(None, false), tuv_pl().indices(None, false));
    assert_eq!(ds[0].metadata().data_format(), Some("grib"));
}

#[test]
fn test_read_json_lines_raw() {
    let file = write_json_lines(&ml_data_records());
    let ds = JsonLinesReader::new(MetadataKind::Raw)
        .read_path(file.path())
        .unwrap();

    assert_eq!(ds.len(), 36);
    assert!(ds[0].metadata().namespaces().is_empty());
    assert!(ds[0].metadata().get("datetime").is_missing());
    assert_eq!(ds.index("param"), strs(&["lnsp", "t"]));
}

#[test]
fn test_unreadable_first_line_keeps_default_keys() {
    let input = "not json\n{\"param\": \"t\", \"levelist\": 500}\n{\"param\": \"u\", \"levelist\": 850}\n";
    let ds = JsonLinesReader::new(MetadataKind::Grib)
        .read(input.as_bytes())
        .unwrap();

    assert_eq!(ds.len(), 3);
    assert!(ds[0].metadata().is_empty());

    let r = ds.indices(None, false);
    assert_eq!(r.keys().collect::<Vec<_>>(), vec!["levelist", "param"]);
    assert_eq!(r.get("param").unwrap(), &strs(&["t", "u"])[..]);

    let table = ds.ls(None);
    assert_eq!(table.columns.len(), 10);
    assert_eq!(table.rows[0][1], Value::Missing);
}

#[test]
fn test_raw_fields_in_front_keep_declared_keys() {
    let raw = JsonLinesReader::new(MetadataKind::Raw)
        .read("{\"param\": \"q\", \"levelist\": 100}\n".as_bytes())
        .unwrap();
    let ds = raw + tuv_pl();

    let r = ds.indices(None, false);
    assert_eq!(r.len(), 11);
    assert_eq!(r.get("param").unwrap(), &strs(&["q", "t", "u", "v"])[..]);
    assert_eq!(ds.ls(None).columns[0], "centre");
}

#[test]
fn test_read_missing_file() {
    let err = JsonLinesReader::new(MetadataKind::Raw)
        .read_path("/nonexistent/fields.jsonl")
        .unwrap_err();
    assert!(matches!(err, field_metadata::MetadataError::Io(_)));
}
