//! Move-in availability for a listing.

use chrono::{DateTime, Datelike, NaiveDate};

/// When a listing can be moved into.
///
/// The stored `availableDate` field historically mixes the literal `"now"`
/// with ISO-8601 dates; the coercion to `Now` for anything absent,
/// unparseable, or already in the past happens once, here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// Absent, unparseable, or on/before today.
    Now,
    /// First available on a future date.
    On(NaiveDate),
}

impl Availability {
    /// Parse a stored availability value.
    ///
    /// Fail-open: an invalid date means "available now" rather than an
    /// error, since this is display data only. Date comparison ignores
    /// time of day.
    pub fn parse(raw: &str, today: NaiveDate) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("now") {
            return Self::Now;
        }
        match parse_date(raw) {
            Some(date) if date > today => Self::On(date),
            _ => Self::Now,
        }
    }

    pub fn is_now(self) -> bool {
        matches!(self, Self::Now)
    }

    /// Sort key for the catalog: every available-now listing before every
    /// future-dated one, available-now entries mutually equal, future dates
    /// ascending. `Option`'s derived ordering gives exactly that.
    pub fn sort_key(self) -> Option<NaiveDate> {
        match self {
            Self::Now => None,
            Self::On(date) => Some(date),
        }
    }

    /// The stored wire form: `"now"` or an ISO date.
    pub fn to_wire(self) -> String {
        match self {
            Self::Now => "now".to_string(),
            Self::On(date) => date.format("%Y-%m-%d").to_string(),
        }
    }

    /// Visitor-facing label, e.g. "Available now" or "Available Jan 14".
    /// The year is only spelled out when it differs from the current one.
    pub fn label(self, today: NaiveDate) -> String {
        match self {
            Self::Now => "Available now".to_string(),
            Self::On(date) if date.year() == today.year() => {
                format!("Available {}", date.format("%b %-d"))
            }
            Self::On(date) => format!("Available {}", date.format("%b %-d, %Y")),
        }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    // Both bare dates and full timestamps appear in stored records
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    }

    #[test]
    fn test_now_literal_and_empty_parse_to_now() {
        assert_eq!(Availability::parse("now", today()), Availability::Now);
        assert_eq!(Availability::parse("NOW", today()), Availability::Now);
        assert_eq!(Availability::parse("", today()), Availability::Now);
        assert_eq!(Availability::parse("  ", today()), Availability::Now);
    }

    #[test]
    fn test_unparseable_date_is_available_now() {
        assert_eq!(Availability::parse("banana", today()), Availability::Now);
        assert_eq!(Availability::parse("2026-13-40", today()), Availability::Now);
    }

    #[test]
    fn test_past_and_today_coerce_to_now() {
        assert_eq!(Availability::parse("2026-08-07", today()), Availability::Now);
        assert_eq!(Availability::parse("2020-01-01", today()), Availability::Now);
    }

    #[test]
    fn test_future_date_is_kept() {
        assert_eq!(
            Availability::parse("2026-09-01", today()),
            Availability::On(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap())
        );
    }

    #[test]
    fn test_rfc3339_timestamp_is_accepted() {
        assert_eq!(
            Availability::parse("2026-09-01T10:30:00Z", today()),
            Availability::On(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap())
        );
    }

    #[test]
    fn test_sort_key_orders_now_before_any_future_date() {
        let now = Availability::Now.sort_key();
        let soon = Availability::parse("2026-08-20", today()).sort_key();
        let later = Availability::parse("2099-01-01", today()).sort_key();

        assert!(now < soon);
        assert!(soon < later);
        assert_eq!(now, Availability::Now.sort_key());
    }

    #[test]
    fn test_labels() {
        assert_eq!(Availability::Now.label(today()), "Available now");
        assert_eq!(
            Availability::parse("2026-09-14", today()).label(today()),
            "Available Sep 14"
        );
        assert_eq!(
            Availability::parse("2027-01-02", today()).label(today()),
            "Available Jan 2, 2027"
        );
    }
}
