//! Selection engine tests.

use fieldlist::{Constraint, Selection};
use field_metadata::{Metadata, Value};
use test_utils::{ml_data, tuv_pl};

fn params(ds: &fieldlist::FieldList) -> Vec<String> {
    ds.metadata_values("param")
        .into_iter()
        .map(|v| v.to_string())
        .collect()
}

// ============================================================================
// Scalar and list constraints
// ============================================================================

#[test]
fn test_sel_scalar() {
    let ds = tuv_pl().sel(&Selection::new().with("param", "t"));
    assert_eq!(ds.len(), 6);
    assert!(params(&ds).iter().all(|p| p == "t"));
}

#[test]
fn test_sel_list_is_or_within_key() {
    let ds = tuv_pl().sel(&Selection::new().with("param", vec!["t", "v"]));
    assert_eq!(ds.len(), 12);
    assert!(!params(&ds).iter().any(|p| p == "u"));
}

#[test]
fn test_sel_and_across_keys() {
    let ds = tuv_pl().sel(
        &Selection::new()
            .with("param", vec!["u", "v"])
            .with("level", vec![500, 850]),
    );
    assert_eq!(ds.len(), 4);
}

#[test]
fn test_sel_type_tolerant() {
    let ds = tuv_pl();
    assert_eq!(ds.sel(&Selection::new().with("level", "500")).len(), 3);
    assert_eq!(ds.sel(&Selection::new().with("level", Value::Float(500.0))).len(), 3);
    assert_eq!(ds.sel(&Selection::new().with("expver", 1)).len(), 18);
}

#[test]
fn test_sel_keeps_relative_order() {
    let ds = tuv_pl();
    let selected = ds.sel(&Selection::new().with("param", "u"));
    let levels: Vec<Value> = selected.metadata_values("level");
    assert_eq!(
        levels,
        test_utils::ints(&[1000, 850, 700, 500, 400, 300])
    );
    assert!(fieldlist::Field::ptr_eq(&selected[0], &ds[1]));
}

// ============================================================================
// Absent keys and empty results
// ============================================================================

#[test]
fn test_sel_unknown_key_excludes_fields() {
    let ds = tuv_pl().sel(&Selection::new().with("nosuchkey", "x"));
    assert!(ds.is_empty());
}

#[test]
fn test_sel_empty_result_is_valid() {
    let ds = tuv_pl().sel(&Selection::new().with("param", "q"));
    assert!(ds.is_empty());
    assert!(ds.indices(None, false).is_empty());
}

#[test]
fn test_empty_selection_keeps_everything() {
    let ds = tuv_pl();
    let all = ds.sel(&Selection::new());
    assert!(all.same_fields(&ds));
}

// ============================================================================
// Composition
// ============================================================================

#[test]
fn test_sel_is_idempotent() {
    let ds = tuv_pl();
    let sel = Selection::new().with("param", vec!["t", "u"]).with("level", 700);
    let once = ds.sel(&sel);
    let twice = once.sel(&sel);
    assert!(once.same_fields(&twice));
}

#[test]
fn test_sel_composes() {
    let ds = tuv_pl() + ml_data();
    let chained = ds
        .sel(&Selection::new().with("param", "t"))
        .sel(&Selection::new().with("levtype", "ml"));
    let combined = ds.sel(&Selection::new().with("param", "t").with("levtype", "ml"));
    assert!(chained.same_fields(&combined));
    assert_eq!(combined.len(), 35);
}

// ============================================================================
// MARS-style request syntax
// ============================================================================

#[test]
fn test_sel_range() {
    let ds = ml_data();
    let (key, constraint) = Selection::parse_pair("levelist=1/to/21").unwrap();
    assert_eq!(key, "levelist");

    let selected = ds.sel(&Selection::new().with(key, constraint));
    // t on 1, 5, 9, 13, 17, 21 and lnsp on 1
    assert_eq!(selected.len(), 7);
}

#[test]
fn test_sel_stepped_range() {
    let sel: Selection = "levelist=1/to/137/by/8".parse().unwrap();
    let ds = ml_data().sel(&sel);
    // every other model level from 1, plus lnsp on 1
    assert_eq!(ds.len(), 19);

    let sel: Selection = "levelist=0/to/9000000000000000000/by/1".parse().unwrap();
    assert_eq!(ml_data().sel(&sel).len(), 36);
}

#[test]
fn test_sel_parsed_selection() {
    let sel: Selection = "param=t/u,levelist=300/to/500".parse().unwrap();
    let ds = tuv_pl().sel(&sel);
    assert_eq!(ds.len(), 6);
    for field in &ds {
        let level = field.metadata().get("levelist").as_i64().unwrap();
        assert!((300..=500).contains(&level));
    }
}

#[test]
fn test_repeated_key_requires_both() {
    let sel = Selection::new()
        .with("level", Constraint::parse("300/to/700").unwrap())
        .with("level", vec![700, 850]);
    assert_eq!(tuv_pl().sel(&sel).len(), 3);
}
