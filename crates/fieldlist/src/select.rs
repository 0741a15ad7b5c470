//! Filtering collections by metadata constraints.

use std::cmp::Ordering;
use std::str::FromStr;

use tracing::debug;

use field_metadata::{Metadata, MetadataError, MetadataResult, Value};

use crate::collection::FieldList;

/// Accepted values for one key.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Equals(Value),
    OneOf(Vec<Value>),
    /// Inclusive range; an absent bound is open.
    Range {
        min: Option<Value>,
        max: Option<Value>,
    },
    /// Integers from `start` to `end` inclusive, every `step`.
    Stepped { start: i64, end: i64, step: i64 },
}

/// Compare a metadata value against a constraint bound. Numbers (and
/// numeric strings) compare numerically, strings lexically, anything else
/// is incomparable.
fn compare(value: &Value, bound: &Value) -> Option<Ordering> {
    match (value, bound) {
        (Value::Str(a), Value::Str(b)) if a.parse::<f64>().is_err() || b.parse::<f64>().is_err() => {
            Some(a.cmp(b))
        }
        _ => match (value.as_f64(), bound.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        },
    }
}

/// Exact integer view of a value; fractional numbers are not integers.
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Int(i) => Some(*i),
        Value::Str(s) => match s.trim().parse::<i64>() {
            Ok(i) => Some(i),
            Err(_) => as_integer(&Value::Float(s.trim().parse::<f64>().ok()?)),
        },
        Value::Float(f) if f.fract() == 0.0 && f.abs() < 9.2e18 => Some(*f as i64),
        _ => None,
    }
}

impl Constraint {
    /// Whether a field value satisfies this constraint. Missing values never do.
    pub fn accepts(&self, value: &Value) -> bool {
        if value.is_missing() {
            return false;
        }
        match self {
            Constraint::Equals(expected) => value.matches(expected),
            Constraint::OneOf(options) => options.iter().any(|o| value.matches(o)),
            Constraint::Range { min, max } => {
                let above = min.as_ref().map_or(true, |min| {
                    matches!(compare(value, min), Some(Ordering::Greater | Ordering::Equal))
                });
                let below = max.as_ref().map_or(true, |max| {
                    matches!(compare(value, max), Some(Ordering::Less | Ordering::Equal))
                });
                above && below
            }
            Constraint::Stepped { start, end, step } => as_integer(value).is_some_and(|v| {
                let offset = i128::from(v) - i128::from(*start);
                *step > 0 && (*start..=*end).contains(&v) && offset % i128::from(*step) == 0
            }),
        }
    }

    /// Parse a MARS-style value: `a`, `a/b/c`, `a/to/b` or `a/to/b/by/n`.
    pub fn parse(text: &str) -> MetadataResult<Self> {
        let tokens: Vec<&str> = text.split('/').map(str::trim).collect();
        if tokens.iter().any(|t| t.is_empty()) {
            return Err(MetadataError::Usage(format!("invalid selection value '{}'", text)));
        }

        let is_kw = |i: usize, kw: &str| tokens.get(i).is_some_and(|t| t.eq_ignore_ascii_case(kw));

        match tokens.len() {
            1 => Ok(Constraint::Equals(Value::from_token(tokens[0]))),
            3 if is_kw(1, "to") => Ok(Constraint::Range {
                min: Some(Value::from_token(tokens[0])),
                max: Some(Value::from_token(tokens[2])),
            }),
            5 if is_kw(1, "to") && is_kw(3, "by") => {
                let parse = |t: &str| {
                    t.parse::<i64>().map_err(|_| {
                        MetadataError::Usage(format!("'{}' is not an integer in '{}'", t, text))
                    })
                };
                let (start, end, step) = (parse(tokens[0])?, parse(tokens[2])?, parse(tokens[4])?);
                if step <= 0 {
                    return Err(MetadataError::Usage(format!(
                        "step must be positive in '{}'",
                        text
                    )));
                }
                Ok(Constraint::Stepped { start, end, step })
            }
            _ if tokens.iter().any(|t| t.eq_ignore_ascii_case("to")) => Err(MetadataError::Usage(
                format!("invalid range '{}'", text),
            )),
            _ => Ok(Constraint::OneOf(
                tokens.into_iter().map(Value::from_token).collect(),
            )),
        }
    }
}

impl From<Value> for Constraint {
    fn from(value: Value) -> Self {
        Constraint::Equals(value)
    }
}

impl From<&str> for Constraint {
    fn from(value: &str) -> Self {
        Constraint::Equals(Value::from(value))
    }
}

impl From<i64> for Constraint {
    fn from(value: i64) -> Self {
        Constraint::Equals(Value::Int(value))
    }
}

impl From<i32> for Constraint {
    fn from(value: i32) -> Self {
        Constraint::Equals(Value::from(value))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Constraint {
    fn from(values: Vec<T>) -> Self {
        Constraint::OneOf(values.into_iter().map(Into::into).collect())
    }
}

/// A conjunction of per-key constraints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    constraints: Vec<(String, Constraint)>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constraint. Repeating a key requires both constraints to hold.
    pub fn with(mut self, key: impl Into<String>, constraint: impl Into<Constraint>) -> Self {
        self.constraints.push((key.into(), constraint.into()));
        self
    }

    /// Parse `key=value` where the value uses MARS request syntax.
    pub fn parse_pair(pair: &str) -> MetadataResult<(String, Constraint)> {
        let (key, value) = pair.split_once('=').ok_or_else(|| {
            MetadataError::Usage(format!("expected KEY=VALUE, got '{}'", pair))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(MetadataError::Usage(format!("empty key in '{}'", pair)));
        }
        Ok((key.to_string(), Constraint::parse(value)?))
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Constraint)> {
        self.constraints.iter().map(|(k, c)| (k.as_str(), c))
    }

    /// Whether `metadata` satisfies every constraint.
    pub fn matches(&self, metadata: &dyn Metadata) -> bool {
        self.constraints
            .iter()
            .all(|(key, constraint)| constraint.accepts(&metadata.get(key)))
    }
}

impl FromStr for Selection {
    type Err = MetadataError;

    /// Comma separated `key=value` pairs, e.g. `param=t/u,levelist=500`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .filter(|p| !p.trim().is_empty())
            .map(Selection::parse_pair)
            .collect()
    }
}

impl<K: Into<String>> FromIterator<(K, Constraint)> for Selection {
    fn from_iter<I: IntoIterator<Item = (K, Constraint)>>(iter: I) -> Self {
        Self {
            constraints: iter.into_iter().map(|(k, c)| (k.into(), c)).collect(),
        }
    }
}

impl FieldList {
    /// Fields satisfying every constraint of `selection`, in original order.
    pub fn sel(&self, selection: &Selection) -> FieldList {
        let selected: FieldList = self
            .iter()
            .filter(|f| selection.matches(f.metadata()))
            .cloned()
            .collect();
        debug!(
            input = self.len(),
            output = selected.len(),
            constraints = selection.constraints.len(),
            "Selected fields"
        );
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalar_and_list() {
        assert_eq!(
            Constraint::parse("t").unwrap(),
            Constraint::Equals(Value::from("t"))
        );
        assert_eq!(
            Constraint::parse("500/850").unwrap(),
            Constraint::OneOf(vec![Value::Int(500), Value::Int(850)])
        );
    }

    #[test]
    fn test_parse_ranges() {
        assert_eq!(
            Constraint::parse("300/to/700").unwrap(),
            Constraint::Range {
                min: Some(Value::Int(300)),
                max: Some(Value::Int(700))
            }
        );
        assert_eq!(
            Constraint::parse("0/to/12/by/6").unwrap(),
            Constraint::Stepped {
                start: 0,
                end: 12,
                step: 6
            }
        );
        assert!(Constraint::parse("0/to/12/by/0").is_err());
        assert!(Constraint::parse("1/to").is_err());
        assert!(Constraint::parse("1//2").is_err());
    }

    #[test]
    fn test_range_accepts() {
        let c = Constraint::parse("300/to/700").unwrap();
        assert!(c.accepts(&Value::Int(300)));
        assert!(c.accepts(&Value::from("500")));
        assert!(!c.accepts(&Value::Int(850)));
        assert!(!c.accepts(&Value::from("t")));
        assert!(!c.accepts(&Value::Missing));
    }

    #[test]
    fn test_stepped_accepts() {
        let c = Constraint::parse("0/to/12/by/6").unwrap();
        for v in [Value::Int(0), Value::Int(6), Value::Float(12.0), Value::from("6")] {
            assert!(c.accepts(&v), "{:?}", v);
        }
        for v in [
            Value::Int(3),
            Value::Int(18),
            Value::Int(-6),
            Value::Float(6.5),
            Value::from("t"),
        ] {
            assert!(!c.accepts(&v), "{:?}", v);
        }
    }

    #[test]
    fn test_stepped_huge_range_is_not_expanded() {
        let c = Constraint::parse("0/to/9000000000000000000/by/1").unwrap();
        assert!(c.accepts(&Value::Int(8_999_999_999_999_999_999)));
        assert!(!c.accepts(&Value::Int(-1)));

        let c = Constraint::parse(
            "-9000000000000000000/to/9000000000000000000/by/9000000000000000000",
        )
        .unwrap();
        assert!(c.accepts(&Value::Int(0)));
        assert!(!c.accepts(&Value::Int(1)));
    }

    #[test]
    fn test_parse_pair_errors() {
        assert!(Selection::parse_pair("param").unwrap_err().is_usage());
        assert!(Selection::parse_pair("=t").unwrap_err().is_usage());
    }

    #[test]
    fn test_selection_from_str() {
        let sel: Selection = "param=t/u, levelist=500".parse().unwrap();
        let keys: Vec<&str> = sel.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["param", "levelist"]);
    }
}
