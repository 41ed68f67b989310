use chrono::{DateTime, Local, TimeZone, Utc};

/// Format a publish time in the local timezone, to minute precision.
pub fn format_published(ts: &DateTime<Utc>) -> String {
    format_published_in(ts, &Local)
}

/// Format a publish time in `tz`, to minute precision.
pub fn format_published_in<Tz>(ts: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    ts.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string()
}

/// Format an optional RFC 3339 string as a date, using '-' when missing and
/// the raw value when it does not parse.
pub fn format_date_opt(raw: Option<&str>) -> String {
    match raw {
        None => "-".to_string(),
        Some(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|_| s.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_published_in() {
        let ts = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 30).unwrap();
        assert_eq!(format_published_in(&ts, &Utc), "2024-12-31 23:59");
        let plus_two = chrono::FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(format_published_in(&ts, &plus_two), "2025-01-01 01:59");
    }

    #[test]
    fn test_format_date_opt() {
        assert_eq!(format_date_opt(None), "-");
        assert_eq!(format_date_opt(Some("2023-06-01T18:00:00Z")), "2023-06-01");
        assert_eq!(format_date_opt(Some("yesterday")), "yesterday");
    }
}
