//! Shared helpers.

use std::fmt;

/// Masks a secret for debug output.
///
/// Values of twelve characters or more keep their first and last three
/// characters, enough to tell two access keys apart in a log line without
/// disclosing the key. Shorter values are masked entirely; keeping any part
/// of them would reveal too large a fraction.
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact(value.as_deref().unwrap_or(""))
    }
}

impl fmt::Debug for Redact<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.len() {
            0 => f.write_str("EMPTY"),
            n if n < 12 => f.write_str("***"),
            n => write!(f, "{}***{}", &self.0[..3], &self.0[n - 3..]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_masks_short_values_entirely() {
        // 11 characters: below the threshold, nothing is kept.
        assert_eq!(format!("{:?}", Redact::from("AKIDEXAMPLE")), "***");
        assert_eq!(format!("{:?}", Redact::from("")), "EMPTY");
    }

    #[test]
    fn test_redact_keeps_the_ends_of_long_values() {
        assert_eq!(
            format!(
                "{:?}",
                Redact::from("wJalrXUtnFEMI/K7MDENG/bPxRfiCYEXAMPLEKEY")
            ),
            "wJa***KEY"
        );
        assert_eq!(
            format!("{:?}", Redact::from(&Some("AKIDEXAMPLEKEYID".to_string()))),
            "AKI***YID"
        );
    }

    #[test]
    fn test_redact_of_absent_value() {
        let token: Option<String> = None;
        assert_eq!(format!("{:?}", Redact::from(&token)), "EMPTY");
    }
}
