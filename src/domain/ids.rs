//! Validated pipeline inputs
//!
//! Newtype wrappers for the two values a caller supplies to an extraction run.
//! Both are validated on construction so that nothing reaches the database
//! with a malformed segment code or date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Format of the extraction date on the wire and in file names
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Business-unit code
///
/// The caller's casing is preserved; [`SegmentCode::lookup_key`] gives the
/// upper-cased form used for connection lookup and the segment procedure.
///
/// # Examples
///
/// ```
/// use invex::domain::ids::SegmentCode;
///
/// let segment = SegmentCode::new("lp").unwrap();
/// assert_eq!(segment.as_str(), "lp");
/// assert_eq!(segment.lookup_key(), "LP");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentCode(String);

impl SegmentCode {
    /// Creates a new SegmentCode
    ///
    /// Surrounding whitespace is removed. The code must be non-empty and contain
    /// only ASCII letters, digits, `_` or `-` since it becomes a path component.
    pub fn new(code: impl Into<String>) -> Result<Self, String> {
        let code = code.into().trim().to_string();
        if code.is_empty() {
            return Err("Segment code cannot be empty".to_string());
        }
        if let Some(c) = code
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(format!(
                "Segment code '{code}' contains invalid character '{c}'"
            ));
        }
        Ok(Self(code))
    }

    /// Returns the segment code as given by the caller
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Upper-cased code used for database lookup
    pub fn lookup_key(&self) -> String {
        self.0.to_ascii_uppercase()
    }
}

impl fmt::Display for SegmentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SegmentCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for SegmentCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Invoice extraction date in `YYYYMMDD` form
///
/// # Examples
///
/// ```
/// use invex::domain::ids::ExtractionDate;
/// use std::str::FromStr;
///
/// let date = ExtractionDate::from_str("20240131").unwrap();
/// assert_eq!(date.to_string(), "20240131");
/// assert!(ExtractionDate::from_str("2024-01-31").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExtractionDate(NaiveDate);

impl ExtractionDate {
    /// Parses a date from exactly eight digits
    pub fn parse(value: &str) -> Result<Self, String> {
        if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!(
                "Invalid date '{value}'. Expected format: YYYYMMDD"
            ));
        }
        NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(Self)
            .map_err(|e| format!("Invalid date '{value}': {e}"))
    }

    /// Wraps an already-valid calendar date
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Today's date in the local timezone
    pub fn today() -> Self {
        Self(chrono::Local::now().date_naive())
    }

    /// Returns the underlying calendar date
    pub fn as_date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for ExtractionDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for ExtractionDate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ExtractionDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ExtractionDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_segment_code_preserves_casing() {
        let segment = SegmentCode::new("Nd").unwrap();
        assert_eq!(segment.as_str(), "Nd");
        assert_eq!(segment.lookup_key(), "ND");
    }

    #[test]
    fn test_segment_code_trims_whitespace() {
        let segment = SegmentCode::new("  LP ").unwrap();
        assert_eq!(segment.as_str(), "LP");
    }

    #[test_case("" ; "empty")]
    #[test_case("   " ; "blank")]
    #[test_case("../etc" ; "path traversal")]
    #[test_case("L P" ; "inner space")]
    fn test_segment_code_rejects(input: &str) {
        assert!(SegmentCode::new(input).is_err());
    }

    #[test]
    fn test_extraction_date_round_trips_format() {
        let date = ExtractionDate::parse("20240229").unwrap();
        assert_eq!(date.to_string(), "20240229");
        assert_eq!(date.as_date(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test_case("2024-01-31" ; "dashed")]
    #[test_case("2024013" ; "too short")]
    #[test_case("202401311" ; "too long")]
    #[test_case("20230229" ; "not a leap year")]
    #[test_case("20241301" ; "month out of range")]
    #[test_case("+2024013" ; "sign")]
    fn test_extraction_date_rejects(input: &str) {
        assert!(ExtractionDate::parse(input).is_err());
    }

    #[test]
    fn test_extraction_date_serde() {
        let date = ExtractionDate::parse("20240105").unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"20240105\"");
        let back: ExtractionDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, date);
    }
}
