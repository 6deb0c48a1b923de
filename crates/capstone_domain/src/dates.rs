//! Calendar date handling for backend payloads.
//!
//! The backend sends dates either as `2024-09-01` or as a full timestamp
//! (`2024-09-01T00:00:00`, `2024-09-01T00:00:00Z`). Only the calendar day is
//! meaningful, so everything is parsed down to a [`NaiveDate`] and written
//! back as `YYYY-MM-DD`.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serializer};

use crate::error::{DomainError, DomainResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a date from a backend string, ignoring any time component.
pub fn parse_date(raw: &str) -> DomainResult<NaiveDate> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, DATE_FORMAT)
        .map_err(|e| DomainError::InvalidDate(format!("{raw}: {e}")))
}

/// Format a date the way the backend expects it.
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_date(date))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}

/// Same as the parent module, for optional dates.
pub mod option {
    use super::*;

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_some(&format_date(d)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            Some(s) if !s.trim().is_empty() => {
                parse_date(&s).map(Some).map_err(serde::de::Error::custom)
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_date() {
        let date = parse_date("2024-09-01").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());
    }

    #[test]
    fn test_parse_timestamp_keeps_day() {
        let date = parse_date("2024-12-31T23:59:59Z").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_date("next tuesday").is_err());
    }
}
