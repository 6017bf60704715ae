//! Normalization of date-like inputs into a query date.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

use crate::error::B3Error;

/// Anything that can be turned into a query date.
#[derive(Clone, Debug, PartialEq)]
pub enum DateInput {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    /// A zoned timestamp; its local date is used.
    Zoned(DateTime<FixedOffset>),
    /// Unix timestamp in seconds, read as UTC.
    Timestamp(i64),
    /// ISO-8601 text.
    Text(String),
}

impl From<NaiveDate> for DateInput {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for DateInput {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<DateTime<FixedOffset>> for DateInput {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::Zoned(value)
    }
}

impl From<DateTime<chrono::Utc>> for DateInput {
    fn from(value: DateTime<chrono::Utc>) -> Self {
        Self::Zoned(value.fixed_offset())
    }
}

impl From<i64> for DateInput {
    fn from(value: i64) -> Self {
        Self::Timestamp(value)
    }
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for DateInput {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Converts a date-like value into a calendar date.
pub fn normalize_date(input: impl Into<DateInput>) -> Result<NaiveDate, B3Error> {
    match input.into() {
        DateInput::Date(date) => Ok(date),
        DateInput::DateTime(dt) => Ok(dt.date()),
        DateInput::Zoned(dt) => Ok(dt.date_naive()),
        DateInput::Timestamp(secs) => DateTime::from_timestamp(secs, 0)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| B3Error::InvalidDate(format!("timestamp {} is out of range", secs))),
        DateInput::Text(text) => parse_text(&text),
    }
}

fn parse_text(raw: &str) -> Result<NaiveDate, B3Error> {
    let text = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date);
    }
    if text.len() == 8 && text.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y%m%d") {
            return Ok(date);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.date())
        .ok_or_else(|| B3Error::InvalidDate(format!("invalid date format '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, TimeZone, Utc};

    fn sept_28() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 9, 28).unwrap()
    }

    #[test]
    fn date_passes_through() {
        assert_eq!(normalize_date(sept_28()).unwrap(), sept_28());
    }

    #[test]
    fn equivalent_inputs_agree() {
        let midnight = sept_28().and_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        let utc = Utc.from_utc_datetime(&midnight);
        let inputs: Vec<DateInput> = vec![
            sept_28().into(),
            midnight.into(),
            utc.into(),
            utc.timestamp().into(),
            "2021-09-28".into(),
            "20210928".into(),
            "2021-09-28T00:00:00".into(),
            "2021-09-28T00:00:00Z".into(),
            "2021-09-28 00:00:00.000".into(),
        ];
        for input in inputs {
            assert_eq!(normalize_date(input.clone()).unwrap(), sept_28(), "{:?}", input);
        }
    }

    #[test]
    fn zoned_uses_local_date() {
        let dt = DateTime::parse_from_rfc3339("2021-09-28T23:30:00-03:00").unwrap();
        assert_eq!(normalize_date(dt).unwrap(), sept_28());
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(normalize_date("  2021-09-28\n").unwrap(), sept_28());
    }

    #[test]
    fn garbage_is_rejected() {
        for bad in ["", "yesterday", "28/09/2021", "2021-13-01", "2021-02-30", "12345678"] {
            let err = normalize_date(bad).unwrap_err();
            assert!(matches!(err, B3Error::InvalidDate(_)), "{}", bad);
        }
    }

    #[test]
    fn out_of_range_timestamp_is_rejected() {
        assert!(matches!(
            normalize_date(i64::MAX),
            Err(B3Error::InvalidDate(_))
        ));
    }
}
