//! Appraisal date handling: spreadsheet serials, free-text dates and the
//! record store's wire format.

use chrono::{NaiveDate, TimeDelta};

use crate::cell::CellValue;

/// Serial number of 1970-01-01 in the 1899-12-30 based spreadsheet calendar.
pub const SERIAL_UNIX_EPOCH: f64 = 25569.0;

/// Text layouts accepted for typed-in dates, tried in order.
///
/// Numeric layouts without a leading year are month first, so `10/01/2024`
/// is October 1st and `13/01/2024` is no date at all.
const TEXT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%m.%d.%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

/// Convert a spreadsheet date serial to a calendar date.
///
/// Any time-of-day fraction is dropped. Returns `None` for non-finite or
/// out-of-range serials.
pub fn date_from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let days = (serial - SERIAL_UNIX_EPOCH).floor();
    if days.abs() > 3_000_000.0 {
        return None;
    }
    let delta = TimeDelta::try_days(days as i64)?;
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(delta)
}

/// Parse a typed-in date. Leading ISO dates (`2024-01-10T08:00:00`) are
/// accepted by their date part.
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    for format in TEXT_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    text.get(..10)
        .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok())
}

/// Read a date cell: numbers are serials, text is parsed, anything else
/// (including unparseable text) has no date.
pub fn parse_cell_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Number(serial) => date_from_serial(*serial),
        CellValue::Text(text) => parse_date_text(text),
        CellValue::Empty | CellValue::Bool(_) => None,
    }
}

/// Serde adapter for the store's date fields.
///
/// Dates are written as `YYYY-MM-DD 00:00:00.000Z` and the empty string is
/// null. Only the first ten characters are significant when reading.
pub mod wire_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&format!("{} 00:00:00.000Z", d.format("%Y-%m-%d"))),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        let head = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(head, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for server-managed timestamps.
///
/// The store writes `2024-02-01 10:00:00.000Z`; RFC 3339 with a `T`
/// separator is accepted too. Empty strings read as `None`.
pub mod wire_timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match ts {
            Some(ts) => serializer.serialize_str(&ts.format("%Y-%m-%d %H:%M:%S%.3fZ").to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        let normalized = raw.replacen(' ', "T", 1);
        DateTime::parse_from_rfc3339(&normalized)
            .map(|ts| Some(ts.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn serial_45000_is_march_15_2023() {
        assert_eq!(date_from_serial(45000.0), Some(ymd(2023, 3, 15)));
    }

    #[test]
    fn serial_epoch_and_fraction() {
        assert_eq!(date_from_serial(25569.0), Some(ymd(1970, 1, 1)));
        assert_eq!(date_from_serial(45000.75), Some(ymd(2023, 3, 15)));
        assert_eq!(date_from_serial(1.0), Some(ymd(1899, 12, 31)));
        assert_eq!(date_from_serial(f64::NAN), None);
    }

    #[test]
    fn text_dates() {
        assert_eq!(parse_date_text("2024-01-10"), Some(ymd(2024, 1, 10)));
        assert_eq!(parse_date_text("2024/01/10"), Some(ymd(2024, 1, 10)));
        assert_eq!(parse_date_text("10 January 2024"), Some(ymd(2024, 1, 10)));
        assert_eq!(parse_date_text("January 10, 2024"), Some(ymd(2024, 1, 10)));
        assert_eq!(parse_date_text("2024-01-10T08:30:00"), Some(ymd(2024, 1, 10)));
        assert_eq!(parse_date_text("not a date"), None);
        assert_eq!(parse_date_text(""), None);
    }

    #[test]
    fn slashed_dates_are_month_first() {
        assert_eq!(parse_date_text("10/01/2024"), Some(ymd(2024, 10, 1)));
        assert_eq!(parse_date_text("1/10/2024"), Some(ymd(2024, 1, 10)));
        assert_eq!(parse_date_text("10-01-2024"), Some(ymd(2024, 10, 1)));
        assert_eq!(parse_date_text("13/01/2024"), None);
        assert_eq!(parse_date_text("31/12/2024"), None);
        assert_eq!(parse_date_text(""), None);
    }

    #[test]
    fn cell_dates() {
        assert_eq!(parse_cell_date(&CellValue::Number(45000.0)), Some(ymd(2023, 3, 15)));
        assert_eq!(parse_cell_date(&CellValue::from("2024-01-10")), Some(ymd(2024, 1, 10)));
        assert_eq!(parse_cell_date(&CellValue::Bool(true)), None);
    }

    #[derive(serde::Serialize, serde::Deserialize)]
    struct Holder {
        #[serde(with = "wire_date", default)]
        date: Option<NaiveDate>,
    }

    #[test]
    fn wire_format() {
        let json = serde_json::to_value(Holder {
            date: Some(ymd(2024, 1, 10)),
        })
        .unwrap();
        assert_eq!(json["date"], "2024-01-10 00:00:00.000Z");

        let none = serde_json::to_value(Holder { date: None }).unwrap();
        assert_eq!(none["date"], "");

        let read: Holder = serde_json::from_str(r#"{"date":"2023-03-15 00:00:00.000Z"}"#).unwrap();
        assert_eq!(read.date, Some(ymd(2023, 3, 15)));

        let empty: Holder = serde_json::from_str(r#"{"date":""}"#).unwrap();
        assert_eq!(empty.date, None);

        let missing: Holder = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.date, None);
    }

    #[derive(serde::Deserialize)]
    struct Stamped {
        #[serde(with = "wire_timestamp", default)]
        created: Option<chrono::DateTime<chrono::Utc>>,
    }

    #[test]
    fn timestamps_accept_space_separator() {
        let spaced: Stamped =
            serde_json::from_str(r#"{"created":"2024-02-01 10:00:00.000Z"}"#).unwrap();
        let rfc: Stamped = serde_json::from_str(r#"{"created":"2024-02-01T10:00:00Z"}"#).unwrap();
        assert!(spaced.created.is_some());
        assert_eq!(spaced.created, rfc.created);
    }
}
