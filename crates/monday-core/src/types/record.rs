//! Schemaless sheet records.
//!
//! Health and work logs come from spreadsheet rows whose columns are
//! user-defined, so records are maps of field name to a loosely typed value.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single cell value from a sheet row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Whole number.
    Integer(i64),
    /// Fractional number.
    Float(f64),
    /// Free text.
    Text(String),
}

impl FieldValue {
    /// Canonical string form used as a lookup key in weight tables.
    ///
    /// Integral floats render without a fractional part so that `7.0`
    /// and `7` address the same weight entry.
    pub fn as_key(&self) -> String {
        match self {
            FieldValue::Integer(n) => n.to_string(),
            FieldValue::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(n) => Some(*n as f64),
            FieldValue::Float(f) => Some(*f),
            FieldValue::Text(_) => None,
        }
    }

    /// Text view of the value, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Float(x) if x.fract() == 0.0 => write!(f, "{}", *x as i64),
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Integer(n)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

/// A sheet row: ordered mapping of column name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap(BTreeMap<String, FieldValue>);

/// One day of health log columns.
pub type HealthRecord = FieldMap;

/// One day of work log columns.
pub type WorkRecord = FieldMap;

impl FieldMap {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a field by column name.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    /// Field rendered as display text, if present.
    pub fn get_text(&self, key: &str) -> Option<String> {
        self.0.get(key).map(|v| v.to_string())
    }

    /// Insert a field, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// True when the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over columns in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    /// Parse a date-bearing field such as a sheet timestamp column.
    pub fn date(&self, key: &str) -> Option<NaiveDate> {
        self.0
            .get(key)
            .and_then(|v| v.as_str())
            .and_then(parse_sheet_date)
    }
}

impl FromIterator<(String, FieldValue)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Parse sheet-style date strings into a calendar date.
///
/// Accepts `2025/06/18`, `2025-06-18`, and either form with a trailing
/// time component (`2025-06-18 09:00:00`).
pub fn parse_sheet_date(s: &str) -> Option<NaiveDate> {
    let day_part = s.split_whitespace().next()?.replace('/', "-");
    NaiveDate::parse_from_str(&day_part, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_as_key() {
        assert_eq!(FieldValue::Integer(7).as_key(), "7");
        assert_eq!(FieldValue::Float(7.0).as_key(), "7");
        assert_eq!(FieldValue::Float(7.5).as_key(), "7.5");
        assert_eq!(FieldValue::from("やや悪い").as_key(), "やや悪い");
    }

    #[test]
    fn test_field_value_untagged_deserialization() {
        let row: FieldMap =
            serde_json::from_str(r#"{"睡眠時間": 6, "睡眠の質": "良い", "体温": 36.5}"#).unwrap();
        assert_eq!(row.get("睡眠時間"), Some(&FieldValue::Integer(6)));
        assert_eq!(row.get("睡眠の質"), Some(&FieldValue::from("良い")));
        assert_eq!(row.get("体温"), Some(&FieldValue::Float(36.5)));
    }

    #[test]
    fn test_parse_sheet_date() {
        let expected = NaiveDate::from_ymd_opt(2025, 6, 18).unwrap();
        assert_eq!(parse_sheet_date("2025/06/18"), Some(expected));
        assert_eq!(parse_sheet_date("2025-06-18"), Some(expected));
        assert_eq!(parse_sheet_date("2025-06-18 09:00:00"), Some(expected));
        assert_eq!(parse_sheet_date("not a date"), None);
    }

    #[test]
    fn test_record_date_field() {
        let mut row = FieldMap::new();
        row.insert("タイムスタンプ", "2025/06/18 07:30:00");
        assert_eq!(
            row.date("タイムスタンプ"),
            NaiveDate::from_ymd_opt(2025, 6, 18)
        );
    }
}
