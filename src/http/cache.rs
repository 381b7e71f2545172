//! HTTP cache control module
//!
//! Provides `Last-Modified` dates and `If-Modified-Since` handling.

use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// Format a timestamp as an HTTP date, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
pub fn format_http_date(time: SystemTime) -> String {
    let dt: DateTime<Utc> = time.into();
    dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parse an HTTP date; malformed values yield `None`
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Check whether the client's copy is still fresh
///
/// `If-None-Match` takes precedence over `If-Modified-Since`; since no
/// entity tags are issued, its presence disables the date check. File times
/// are compared at whole-second precision.
///
/// # Returns
/// Returns true if a 304 should be sent
pub fn is_not_modified(
    if_modified_since: Option<&str>,
    has_if_none_match: bool,
    modified: SystemTime,
) -> bool {
    if has_if_none_match {
        return false;
    }
    let Some(since) = if_modified_since.and_then(parse_http_date) else {
        return false;
    };
    let modified: DateTime<Utc> = modified.into();
    modified.timestamp() <= since.timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_format_http_date() {
        assert_eq!(format_http_date(at(784_111_777)), "Sun, 06 Nov 1994 08:49:37 GMT");
    }

    #[test]
    fn test_round_trip_of_own_dates() {
        let date = format_http_date(at(1_700_000_000));
        assert_eq!(parse_http_date(&date).unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_not_modified() {
        let header = "Sun, 06 Nov 1994 08:49:37 GMT";
        assert!(is_not_modified(Some(header), false, at(784_111_777)));
        assert!(is_not_modified(Some(header), false, at(784_111_000)));
        // Sub-second differences are ignored
        assert!(is_not_modified(
            Some(header),
            false,
            at(784_111_777) + Duration::from_millis(400)
        ));
        assert!(!is_not_modified(Some(header), false, at(784_111_778)));
    }

    #[test]
    fn test_if_none_match_disables_date_check() {
        let header = "Sun, 06 Nov 1994 08:49:37 GMT";
        assert!(!is_not_modified(Some(header), true, at(0)));
    }

    #[test]
    fn test_malformed_or_missing_header() {
        assert!(!is_not_modified(Some("yesterday"), false, at(0)));
        assert!(!is_not_modified(None, false, at(0)));
    }
}
