use std::fmt;

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Scalar cell content.
///
/// Spreadsheet cells are loosely typed; this enum makes the variants explicit so
/// nothing downstream relies on implicit coercion. The enum uses an explicit
/// `{type, value}` tagged layout so JSON output stays stable.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// Empty / null cell.
    #[default]
    Blank,
    /// Plain string.
    String(String),
    /// IEEE-754 double precision number.
    Number(f64),
    /// Boolean.
    Boolean(bool),
    /// Date/time cell (1900 date system, already converted from the serial number).
    DateTime(NaiveDateTime),
}

impl Value {
    /// Returns true if the value is [`Value::Blank`].
    ///
    /// This is the "null" notion used when building lookup indexes: an empty
    /// string read from a workbook is already converted to `Blank` on load.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Blank)
    }

    /// Returns true for `Blank` and for strings that are empty after trimming whitespace.
    pub fn is_blank_text(&self) -> bool {
        match self {
            Value::Blank => true,
            Value::String(s) => s.trim().is_empty(),
            Value::Number(_) | Value::Boolean(_) | Value::DateTime(_) => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Blank => Ok(()),
            Value::String(s) => f.write_str(s),
            Value::Number(n) => fmt_number(*n, f),
            Value::Boolean(true) => f.write_str("TRUE"),
            Value::Boolean(false) => f.write_str("FALSE"),
            // Midnight renders date-only, like a date column rendered to text.
            Value::DateTime(dt) => {
                if dt.num_seconds_from_midnight() == 0 && dt.nanosecond() == 0 {
                    write!(f, "{}", dt.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S"))
                }
            }
        }
    }
}

// Largest magnitude below which every integral f64 converts to i64 exactly.
const MAX_EXACT_INTEGRAL: f64 = 9_007_199_254_740_992.0;

fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    // Whole numbers read from a workbook come back as floats; `10.0` should key
    // the same as the text `10`.
    if n.is_finite() && n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGRAL {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{n}")
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Blank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn numbers_render_without_trailing_zero_fraction() {
        assert_eq!(Value::Number(10.0).to_string(), "10");
        assert_eq!(Value::Number(-3.0).to_string(), "-3");
        assert_eq!(Value::Number(0.5).to_string(), "0.5");
        assert_eq!(Value::Number(-0.0).to_string(), "0");
        assert_eq!(Value::Number(1e300).to_string(), format!("{}", 1e300_f64));
    }

    #[test]
    fn blank_and_whitespace_strings_are_blank_text() {
        assert!(Value::Blank.is_blank_text());
        assert!(Value::from("   ").is_blank_text());
        assert!(Value::from("").is_blank_text());
        assert!(!Value::from(" x ").is_blank_text());
        assert!(!Value::Number(0.0).is_blank_text());
        assert!(!Value::Boolean(false).is_blank_text());
    }

    #[test]
    fn only_blank_is_null() {
        assert_eq!(Value::default(), Value::Blank);
        assert!(Value::Blank.is_null());
        assert!(!Value::from("").is_null());
        assert!(!Value::Number(0.0).is_null());
    }

    #[test]
    fn datetimes_render_date_only_at_midnight() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            Value::DateTime(day.and_hms_opt(0, 0, 0).unwrap()).to_string(),
            "2024-03-09"
        );
        assert_eq!(
            Value::DateTime(day.and_hms_opt(13, 5, 7).unwrap()).to_string(),
            "2024-03-09 13:05:07"
        );
    }

    #[test]
    fn booleans_render_like_spreadsheets() {
        assert_eq!(Value::Boolean(true).to_string(), "TRUE");
        assert_eq!(Value::Boolean(false).to_string(), "FALSE");
    }

    #[test]
    fn optional_values_map_none_to_blank() {
        assert_eq!(Value::from(None::<f64>), Value::Blank);
        assert_eq!(Value::from(Some(2.0)), Value::Number(2.0));
    }
}
