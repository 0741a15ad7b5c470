//! Common field fixtures for fieldkit tests.
//!
//! The datasets mirror two small GRIB files used throughout the tests:
//! temperature and wind on pressure levels (`tuv_pl`) and temperature on
//! model levels plus log surface pressure (`ml_data`).

use field_metadata::{GribMetadata, MetadataUpdate, Value};
use fieldlist::{Field, FieldList};

/// Pressure levels of `tuv_pl`, in file order.
pub const TUV_PL_LEVELS: [i64; 6] = [1000, 850, 700, 500, 400, 300];

/// Parameters of `tuv_pl`, in file order, with their paramId.
pub const TUV_PL_PARAMS: [(&str, i64); 3] = [("t", 130), ("u", 131), ("v", 132)];

/// Base keys every fixture record carries.
pub mod mars {
    pub const CLASS: &str = "od";
    pub const STREAM: &str = "oper";
    pub const EXPVER: &str = "0001";
    pub const DOMAIN: &str = "g";
}

/// Model levels of `ml_data` temperature.
pub fn ml_levels() -> Vec<i64> {
    (1..=137).step_by(4).collect()
}

fn record(
    param: (&str, i64),
    level: i64,
    levtype: &str,
    type_of_level: &str,
    data_type: &str,
    date: i64,
) -> MetadataUpdate {
    let (short_name, param_id) = param;
    MetadataUpdate::new()
        .set("centre", "ecmf")
        .set("paramId", param_id)
        .set("shortName", short_name)
        .set("typeOfLevel", type_of_level)
        .set("level", level)
        .set("dataDate", date)
        .set("dataTime", 1200)
        .set("stepUnits", 1)
        .set("stepType", "instant")
        .set("stepRange", "0")
        .set("startStep", 0)
        .set("endStep", 0)
        .set("validityDate", date)
        .set("validityTime", 1200)
        .set("gridType", "regular_ll")
        .set("Ni", 12)
        .set("Nj", 7)
        .set("latitudeOfFirstGridPointInDegrees", 90.0)
        .set("longitudeOfFirstGridPointInDegrees", 0.0)
        .set("latitudeOfLastGridPointInDegrees", -90.0)
        .set("longitudeOfLastGridPointInDegrees", 330.0)
        .set("dataType", data_type)
        .set("class", mars::CLASS)
        .set("stream", mars::STREAM)
        .set("levtype", levtype)
        .set("type", data_type)
        .set("expver", mars::EXPVER)
        .set("date", date)
        .set("time", 1200)
        .set("step", 0)
        .set("domain", mars::DOMAIN)
        .set("number", 0)
        .set("levelist", level)
        .set("param", short_name)
}

/// Records of `tuv_pl`: 18 analysis fields, level by level from 1000 hPa.
pub fn tuv_pl_records() -> Vec<MetadataUpdate> {
    TUV_PL_LEVELS
        .iter()
        .flat_map(|&level| {
            TUV_PL_PARAMS
                .iter()
                .map(move |&param| record(param, level, "pl", "isobaricInhPa", "an", 20180801))
        })
        .collect()
}

/// Records of `ml_data`: forecast temperature on every fourth model level,
/// then log surface pressure on level 1.
pub fn ml_data_records() -> Vec<MetadataUpdate> {
    let mut records: Vec<MetadataUpdate> = ml_levels()
        .into_iter()
        .map(|level| record(("t", 130), level, "ml", "hybrid", "fc", 20180111))
        .collect();
    records.push(record(("lnsp", 152), 1, "ml", "hybrid", "fc", 20180111));
    records
}

/// Build an eager GRIB field list from records.
pub fn grib_fields(records: &[MetadataUpdate]) -> FieldList {
    records
        .iter()
        .map(|r| Field::new(GribMetadata::from_update(r)))
        .collect()
}

pub fn tuv_pl() -> FieldList {
    grib_fields(&tuv_pl_records())
}

pub fn ml_data() -> FieldList {
    grib_fields(&ml_data_records())
}

/// Convenience conversion for expected index values.
pub fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().map(|&v| Value::Int(v)).collect()
}

pub fn strs(values: &[&str]) -> Vec<Value> {
    values.iter().map(|&v| Value::from(v)).collect()
}
