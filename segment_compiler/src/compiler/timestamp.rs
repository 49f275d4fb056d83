use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a timestamp written as RFC 3339, a naive date-time (taken as UTC)
/// or a calendar date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    if let Some(naive) = NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    {
        return Some(Utc.from_utc_datetime(&naive));
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Canonical stored form: `YYYY-MM-DDTHH:MM:SS.sssZ`
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Normalize a timestamp to its canonical form, or `None` if it does not parse
pub fn normalize_timestamp(raw: &str) -> Option<String> {
    parse_timestamp(raw).map(|timestamp| format_timestamp(&timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_date_is_midnight_utc() {
        assert_eq!(
            normalize_timestamp("2024-01-01").as_deref(),
            Some("2024-01-01T00:00:00.000Z")
        );
    }

    #[test]
    fn test_rfc3339_offset_is_converted_to_utc() {
        assert_eq!(
            normalize_timestamp("2024-03-10T12:30:00+02:00").as_deref(),
            Some("2024-03-10T10:30:00.000Z")
        );
        assert_eq!(
            normalize_timestamp("2024-03-10T12:30:00.25Z").as_deref(),
            Some("2024-03-10T12:30:00.250Z")
        );
    }

    #[test]
    fn test_naive_date_time_is_taken_as_utc() {
        assert_eq!(
            normalize_timestamp("2023-11-05T08:15:42").as_deref(),
            Some("2023-11-05T08:15:42.000Z")
        );
        assert_eq!(
            normalize_timestamp("2023-11-05 08:15").as_deref(),
            Some("2023-11-05T08:15:00.000Z")
        );
    }

    #[test]
    fn test_unparseable_values() {
        for raw in ["not-a-date", "2024-13-01", "2024/01/01", "", "1700000000"] {
            assert_eq!(normalize_timestamp(raw), None, "{raw}");
        }
    }

    #[test]
    fn test_canonical_form_sorts_chronologically() {
        let earlier = normalize_timestamp("2023-12-31T23:59:59Z").unwrap();
        let later = normalize_timestamp("2024-01-01").unwrap();
        assert!(earlier < later);
    }
}
