//! Decoding helpers for values selected as `TEXT`.
//!
//! The bot schemas disagree on column types (`bigint` vs `numeric` vs
//! `varchar`, `boolean` vs status strings), so every adaptive query casts to
//! text and the typed value is recovered here.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

pub fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Integer from `"42"`, `"42.00"` or `"41.6"` (rounded).
pub fn parse_i64(value: Option<&str>) -> Option<i64> {
    let raw = value?.trim();
    if let Ok(parsed) = raw.parse::<i64>() {
        return Some(parsed);
    }

    let float = raw.parse::<f64>().ok().filter(|f| f.is_finite())?;
    if float.abs() > i64::MAX as f64 {
        return None;
    }
    Some(float.round() as i64)
}

pub fn parse_f64(value: Option<&str>) -> Option<f64> {
    value?.trim().parse::<f64>().ok().filter(|f| f.is_finite())
}

/// Postgres booleans render as `t`/`f`; status columns carry words.
pub fn parse_bool(value: Option<&str>) -> Option<bool> {
    match value?.trim().to_ascii_lowercase().as_str() {
        "t" | "true" | "1" | "y" | "yes" | "on" | "active" | "trial" | "paid" => Some(true),
        "f" | "false" | "0" | "n" | "no" | "off" | "inactive" | "expired" | "disabled"
        | "cancelled" | "canceled" => Some(false),
        _ => None,
    }
}

/// Accepts RFC 3339 and the Postgres text forms of `timestamptz`,
/// `timestamp` (taken as UTC) and `date`.
pub fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = value?.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%d %H:%M:%S%#z"] {
        if let Ok(parsed) = DateTime::parse_from_str(raw, format) {
            return Some(parsed.with_timezone(&Utc));
        }
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn integers_accept_numeric_strings() {
        assert_eq!(parse_i64(Some("402695709")), Some(402_695_709));
        assert_eq!(parse_i64(Some(" 1500.00 ")), Some(1500));
        assert_eq!(parse_i64(Some("99.6")), Some(100));
        assert_eq!(parse_i64(Some("abc")), None);
        assert_eq!(parse_i64(None), None);
    }

    #[test]
    fn booleans_accept_postgres_and_status_words() {
        assert_eq!(parse_bool(Some("t")), Some(true));
        assert_eq!(parse_bool(Some("false")), Some(false));
        assert_eq!(parse_bool(Some("ACTIVE")), Some(true));
        assert_eq!(parse_bool(Some("expired")), Some(false));
        assert_eq!(parse_bool(Some("pending")), None);
    }

    #[test]
    fn timestamps_accept_postgres_text_output() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();

        assert_eq!(parse_timestamp(Some("2025-03-01 12:30:00+03")), Some(expected));
        assert_eq!(parse_timestamp(Some("2025-03-01 09:30:00")), Some(expected));
        assert_eq!(parse_timestamp(Some("2025-03-01T09:30:00Z")), Some(expected));
        assert_eq!(
            parse_timestamp(Some("2025-03-01 09:30:00.250+00")).map(|t| t.timestamp()),
            Some(expected.timestamp())
        );
        assert_eq!(
            parse_timestamp(Some("2025-03-01")),
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp(Some("soon")), None);
    }

    #[test]
    fn blank_strings_are_absent() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some(" REF1 ".to_string())), Some("REF1".to_string()));
    }
}
