//! Lenient date parsing for OPF metadata

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a metadata date.
///
/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DD[T ]HH:MM:SS` (taken as
/// UTC), and the reduced-precision forms `YYYY-MM-DD`, `YYYY-MM` and `YYYY`.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.and_utc());
        }
    }

    let date = match value.len() {
        4 => NaiveDate::parse_from_str(&format!("{value}-01-01"), "%Y-%m-%d"),
        7 => NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d"),
        _ => NaiveDate::parse_from_str(value, "%Y-%m-%d"),
    };
    match date {
        Ok(date) => date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()),
        Err(_) => {
            log::debug!("unparseable date: {value:?}");
            None
        }
    }
}
