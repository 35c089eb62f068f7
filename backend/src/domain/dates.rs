//! Calendar-date parsing shared by validation and stored documents.
//!
//! Dates arrive either as `YYYY-MM-DD` or as full RFC 3339 timestamps (older
//! documents and some clients send the latter); only the date part is kept.

use chrono::{DateTime, NaiveDate};

/// Parse a calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp.
///
/// # Examples
/// ```
/// use backend::domain::dates::parse_calendar_date;
///
/// let date = parse_calendar_date("2030-01-31T10:00:00Z").expect("timestamp");
/// assert_eq!(date.to_string(), "2030-01-31");
/// assert!(parse_calendar_date("31/01/2030").is_none());
/// ```
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|timestamp| timestamp.date_naive())
        })
}

/// Serde adapter writing `YYYY-MM-DD` and reading either accepted form.
pub mod calendar_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    /// Serialise as `YYYY-MM-DD`.
    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }

    /// Deserialise from `YYYY-MM-DD` or RFC 3339.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_calendar_date(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid calendar date: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Dated {
        #[serde(with = "calendar_date")]
        date: NaiveDate,
    }

    #[rstest]
    #[case("2026-05-01")]
    #[case("2026-05-01T00:00:00.000Z")]
    #[case("2026-05-01T23:30:00+05:30")]
    fn reads_both_forms(#[case] raw: &str) {
        let decoded: Dated =
            serde_json::from_value(serde_json::json!({ "date": raw })).expect("decode");
        assert_eq!(decoded.date.to_string(), "2026-05-01");
    }

    #[test]
    fn writes_plain_dates() {
        let date = NaiveDate::from_ymd_opt(2026, 5, 1).expect("date");
        let value = serde_json::to_value(Dated { date }).expect("encode");
        assert_eq!(value["date"], "2026-05-01");
    }
}
