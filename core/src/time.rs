//! Time related utils.

use crate::{Error, Result};
use chrono::Utc;

/// The UTC instant used throughout signing.
///
/// One instant is sampled per signing operation and reused for both the
/// credential scope date and the `x-amz-date` header; the two must agree
/// exactly or the signature is rejected by the remote service.
pub type DateTime = chrono::DateTime<Utc>;

/// Return the current UTC time.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format a datetime as the 8-digit scope date: `20150830`.
pub fn format_date(t: DateTime) -> String {
    t.format("%Y%m%d").to_string()
}

/// Format a datetime in ISO 8601 basic format: `20150830T123600Z`.
pub fn format_iso8601(t: DateTime) -> String {
    t.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Parse an ISO 8601 basic format timestamp: `20150830T123600Z`.
pub fn parse_iso8601(s: &str) -> Result<DateTime> {
    chrono::NaiveDateTime::parse_from_str(s, "%Y%m%dT%H%M%SZ")
        .map(|t| t.and_utc())
        .map_err(|e| Error::unexpected(format!("failed to parse timestamp {s}")).with_source(e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_and_iso8601_agree() {
        let t = parse_iso8601("20150830T123600Z").expect("timestamp must parse");
        assert_eq!(format_date(t), "20150830");
        assert_eq!(format_iso8601(t), "20150830T123600Z");
    }

    #[test]
    fn test_parse_iso8601_rejects_garbage() {
        assert!(parse_iso8601("2015-08-30 12:36:00").is_err());
        assert!(parse_iso8601("").is_err());
    }
}
