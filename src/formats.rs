//! Commonly used string formats, available through
//! [`Registry::with_standard_formats`](crate::registry::Registry::with_standard_formats).
use std::net::{Ipv4Addr, Ipv6Addr};

use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

pub(crate) const STANDARD: &[(&str, fn(&str) -> bool)] = &[
    ("date", is_date),
    ("date-time", is_date_time),
    ("time", is_time),
    ("email", is_email),
    ("uri", is_uri),
    ("ipv4", is_ipv4),
    ("ipv6", is_ipv6),
    ("uuid", is_uuid),
];

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex")
});
static URI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:[^\s]*$").expect("uri regex")
});
static UUID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("uuid regex")
});

/// RFC 3339 full-date.
pub fn is_date(s: &str) -> bool {
    s.len() == 10 && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

/// RFC 3339 date-time, offset required.
pub fn is_date_time(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
}

/// RFC 3339 full-time (`HH:MM:SS[.frac](Z|±HH:MM)`).
pub fn is_time(s: &str) -> bool {
    DateTime::parse_from_rfc3339(&format!("1970-01-01T{s}")).is_ok()
}

pub fn is_email(s: &str) -> bool {
    EMAIL.is_match(s)
}

pub fn is_uri(s: &str) -> bool {
    URI.is_match(s)
}

pub fn is_ipv4(s: &str) -> bool {
    s.parse::<Ipv4Addr>().is_ok()
}

pub fn is_ipv6(s: &str) -> bool {
    s.parse::<Ipv6Addr>().is_ok()
}

pub fn is_uuid(s: &str) -> bool {
    UUID.is_match(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temporal_formats() {
        assert!(is_date("2024-02-29"));
        assert!(!is_date("2023-02-29"));
        assert!(!is_date("2024-2-1"));
        assert!(is_date_time("2024-02-29T12:30:00Z"));
        assert!(is_date_time("2024-02-29T12:30:00.25+02:00"));
        assert!(!is_date_time("2024-02-29 12:30"));
        assert!(is_time("12:30:00Z"));
        assert!(!is_time("25:00:00Z"));
    }

    #[test]
    fn network_and_identifier_formats() {
        assert!(is_email("a.b@example.com"));
        assert!(!is_email("a b@example.com"));
        assert!(is_uri("https://example.com/x?y=1"));
        assert!(is_uri("mailto:a@b.c"));
        assert!(!is_uri("/relative/path"));
        assert!(is_ipv4("10.0.0.1"));
        assert!(!is_ipv4("10.0.0.256"));
        assert!(is_ipv6("::1"));
        assert!(is_uuid("123e4567-e89b-12d3-a456-426614174000"));
        assert!(!is_uuid("123e4567e89b12d3a456426614174000"));
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = STANDARD.iter().map(|(n, _)| *n).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), STANDARD.len());
    }
}
