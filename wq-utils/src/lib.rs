//! Shared utility functions for water quality crates.

/// Date and time utility functions
pub mod dates {
    use crate::error::DateError;
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

    /// Canonical timestamp format used when writing readings back out.
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Date-time layouts tried in order by [`parse_timestamp`].
    const DATE_TIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y %H:%M",
        // CDEC-style compact layout
        "%Y%m%d %H%M",
        "%d %b %Y %H:%M:%S",
        "%d %B %Y %H:%M:%S",
        "%b %d, %Y %H:%M:%S",
        "%B %d, %Y %H:%M:%S",
    ];

    /// Layouts carrying a UTC offset; converted to UTC.
    const OFFSET_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S%.f%:z",
        "%Y-%m-%d %H:%M:%S%.f%z",
        "%Y-%m-%dT%H:%M:%S%.f%z",
    ];

    /// Date-only layouts; the time defaults to midnight.
    const DATE_FORMATS: &[&str] = &[
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%Y%m%d",
        "%d %b %Y",
        "%d %B %Y",
        "%b %d, %Y",
        "%B %d, %Y",
        "%b %d %Y",
        "%B %d %Y",
    ];

    /// Parse a free-form timestamp.
    ///
    /// Accepts RFC 3339 / RFC 2822, the common ISO-ish date-time layouts with
    /// either a space or `T` separator, slash dates, compact `YYYYMMDD HHMM`,
    /// spelled-out month names, bare dates (midnight) and unix epoch seconds.
    /// Values carrying an offset are normalized to UTC.
    pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, DateError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DateError("empty timestamp".to_string()));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.naive_utc());
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
            return Ok(dt.naive_utc());
        }
        for fmt in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
                return Ok(dt.naive_utc());
            }
        }
        for fmt in DATE_TIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(dt);
            }
        }
        for fmt in DATE_FORMATS {
            if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
                return Ok(d.and_time(NaiveTime::MIN));
            }
        }
        if s.len() >= 9 && s.bytes().all(|b| b.is_ascii_digit()) {
            if let Some(dt) = s
                .parse::<i64>()
                .ok()
                .and_then(|secs| DateTime::from_timestamp(secs, 0))
            {
                return Ok(dt.naive_utc());
            }
        }

        Err(DateError(format!("unrecognized timestamp '{s}'")))
    }

    /// Format a timestamp as "YYYY-MM-DD HH:MM:SS"
    pub fn format_timestamp(ts: &NaiveDateTime) -> String {
        ts.format(TIMESTAMP_FORMAT).to_string()
    }

}

/// Error types
pub mod error {
    use std::fmt;

    #[derive(Debug, Clone, PartialEq)]
    pub struct DateError(pub String);

    impl fmt::Display for DateError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Date error: {}", self.0)
        }
    }

    impl std::error::Error for DateError {}
}
