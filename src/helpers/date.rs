//! Date helper functions

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parse a front-matter date string in various formats
///
/// Dates without an offset are taken as UTC.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    // Try RFC 3339 / ISO 8601 first, it carries its own offset
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}

/// Format date in full format (like "January 1, 2024")
pub fn full_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Human readable date with how long ago it was, e.g.
/// "January 1, 2024 (9mo ago)"
pub fn format_date(date: &str, only_date: bool) -> String {
    format_date_at(date, only_date, Utc::now())
}

/// Same as [`format_date`], measured against `now`
pub fn format_date_at(date: &str, only_date: bool, now: DateTime<Utc>) -> String {
    let Some(target) = parse_date(date) else {
        return "Invalid date".to_string();
    };

    let full = full_date(&target);
    if only_date {
        return full;
    }

    let days_ago = now.signed_duration_since(target).num_days().abs();

    if days_ago < 1 {
        "Today".to_string()
    } else if days_ago < 7 {
        format!("{} ({}d ago)", full, days_ago)
    } else if days_ago < 30 {
        format!("{} ({}w ago)", full, days_ago / 7)
    } else if days_ago < 365 {
        format!("{} ({}mo ago)", full, days_ago / 30)
    } else {
        format!("{} ({}y ago)", full, days_ago / 365)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_date() {
        let dt = parse_date("2024-01-15").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());

        let dt = parse_date("2024-01-15 10:30:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap());

        let dt = parse_date("2024-01-15T10:30:00+02:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap());

        assert!(parse_date("yesterday").is_none());
        assert!(parse_date("").is_none());
    }

    #[test]
    fn test_full_date() {
        let date = Utc.with_ymd_and_hms(2024, 1, 5, 10, 30, 0).unwrap();
        assert_eq!(full_date(&date), "January 5, 2024");
    }

    #[test]
    fn test_format_date_labels() {
        assert_eq!(format_date_at("2024-06-15", false, now()), "Today");
        assert_eq!(
            format_date_at("2024-06-12", false, now()),
            "June 12, 2024 (3d ago)"
        );
        assert_eq!(
            format_date_at("2024-06-01", false, now()),
            "June 1, 2024 (2w ago)"
        );
        assert_eq!(
            format_date_at("2024-02-01", false, now()),
            "February 1, 2024 (4mo ago)"
        );
        assert_eq!(
            format_date_at("2022-01-01", false, now()),
            "January 1, 2022 (2y ago)"
        );
    }

    #[test]
    fn test_format_date_only_date() {
        assert_eq!(format_date_at("2024-06-15", true, now()), "June 15, 2024");
    }

    #[test]
    fn test_format_invalid_date() {
        assert_eq!(format_date_at("", false, now()), "Invalid date");
        assert_eq!(format_date_at("not a date", true, now()), "Invalid date");
    }
}
