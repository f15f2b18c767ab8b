//! Timestamp parsing with an explicit validity flag.
//!
//! Two policies are built on top of [`parse_timestamp`] and must stay
//! separate: sorting treats an invalid value as epoch 0 (oldest) and keeps
//! the record, while display filters drop the record entirely.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

/// Zone-less layouts seen in API payloads. These are read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedTimestamp {
    pub valid: bool,
    pub epoch_millis: i64,
}

impl ParsedTimestamp {
    pub const INVALID: ParsedTimestamp = ParsedTimestamp {
        valid: false,
        epoch_millis: 0,
    };
}

/// Parse a timestamp-like value. Absent, blank and unparseable input all
/// yield `valid = false, epoch_millis = 0`.
pub fn parse_timestamp(value: Option<&str>) -> ParsedTimestamp {
    match value.and_then(parse_datetime) {
        Some(dt) => ParsedTimestamp {
            valid: true,
            epoch_millis: dt.timestamp_millis(),
        },
        None => ParsedTimestamp::INVALID,
    }
}

/// Sort fallback: epoch millis, or 0 when the value is unusable.
pub fn sort_key(value: Option<&str>) -> i64 {
    parse_timestamp(value).epoch_millis
}

/// Display filter: whether the value parses at all.
pub fn is_valid(value: Option<&str>) -> bool {
    parse_timestamp(value).valid
}

pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// ISO-8601 rendering used for timestamps this client sends.
pub fn format_iso(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Sort newest first by a timestamp attribute, using the sort fallback.
/// The sort is stable, so records with equal keys keep their input order.
pub fn sort_newest_first<T, F>(items: &mut [T], timestamp: F)
where
    F: Fn(&T) -> Option<&str>,
{
    items.sort_by_cached_key(|item| std::cmp::Reverse(sort_key(timestamp(item))));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(parse_timestamp(Some("")), ParsedTimestamp::INVALID);
        assert_eq!(parse_timestamp(None), ParsedTimestamp::INVALID);
        assert_eq!(parse_timestamp(Some("not-a-date")), ParsedTimestamp::INVALID);
        assert_eq!(parse_timestamp(Some("   ")), ParsedTimestamp::INVALID);
        assert_eq!(parse_timestamp(Some("2024-13-45")), ParsedTimestamp::INVALID);
    }

    #[test]
    fn test_rfc3339() {
        let parsed = parse_timestamp(Some("2024-01-01T00:00:00Z"));
        assert!(parsed.valid);
        assert_eq!(parsed.epoch_millis, 1_704_067_200_000);

        let offset = parse_timestamp(Some("2024-01-01T02:00:00+02:00"));
        assert_eq!(offset.epoch_millis, 1_704_067_200_000);

        let fractional = parse_timestamp(Some("2024-01-01T00:00:00.250Z"));
        assert_eq!(fractional.epoch_millis, 1_704_067_200_250);
    }

    #[test]
    fn test_zoneless_and_date_only_read_as_utc() {
        assert_eq!(sort_key(Some("2024-01-01T00:00:00")), 1_704_067_200_000);
        assert_eq!(sort_key(Some("2024-01-01 00:00:00")), 1_704_067_200_000);
        assert_eq!(sort_key(Some("2024-01-01 00:00")), 1_704_067_200_000);
        assert_eq!(sort_key(Some("2024-01-01")), 1_704_067_200_000);
    }

    #[test]
    fn test_sort_fallback_keeps_invalid_as_oldest() {
        let mut rows = vec![
            ("a", Some("garbage")),
            ("b", Some("2024-01-02T00:00:00Z")),
            ("c", None),
            ("d", Some("2024-01-01T00:00:00Z")),
        ];
        sort_newest_first(&mut rows, |row| row.1);
        let order: Vec<&str> = rows.iter().map(|row| row.0).collect();
        assert_eq!(order, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_format_iso() {
        let dt = parse_datetime("2024-03-04T05:06:07.008Z").unwrap();
        assert_eq!(format_iso(dt), "2024-03-04T05:06:07.008Z");
    }
}
