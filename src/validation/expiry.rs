use crate::models::ExpiryResult;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;

/// Formats tried in order. A date such as 03/04/2025 parses as day/month and
/// the month/day reading is never considered.
const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%m/%d/%Y", "%m-%d-%Y"];

const MILLIS_PER_DAY: i64 = 86_400_000;

lazy_static! {
    static ref VALIDITY_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)valid.*?until.*?(\d{2}[/-]\d{2}[/-]\d{4})").unwrap(),
        Regex::new(r"(?i)expires.*?on.*?(\d{2}[/-]\d{2}[/-]\d{4})").unwrap(),
        Regex::new(r"(?i)validity.*?(\d{2}[/-]\d{2}[/-]\d{4})").unwrap(),
        Regex::new(r"(?i)valid.*?upto.*?(\d{2}[/-]\d{2}[/-]\d{4})").unwrap(),
    ];
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant.
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    pub fn at_date(date: NaiveDate) -> Self {
        FixedClock(date.and_time(NaiveTime::MIN))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

pub struct ExpiryResolver<'a> {
    clock: &'a dyn Clock,
    warning_days: i64,
}

impl<'a> ExpiryResolver<'a> {
    pub fn new(clock: &'a dyn Clock, warning_days: i64) -> Self {
        ExpiryResolver {
            clock,
            warning_days,
        }
    }

    pub fn resolve(&self, text: &str) -> ExpiryResult {
        let mut result = ExpiryResult::default();

        // Only the first template that matches is considered.
        let Some(raw) = VALIDITY_PATTERNS
            .iter()
            .find_map(|pattern| pattern.captures(text))
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
        else {
            return result;
        };

        let Some(date) = Self::parse_date(&raw) else {
            return result;
        };

        let expires_at = date.and_time(NaiveTime::MIN);
        let now = self.clock.now();
        // Floor, so any instant past midnight of the expiry date is day -1.
        let days = (expires_at - now)
            .num_milliseconds()
            .div_euclid(MILLIS_PER_DAY);

        // Sub-millisecond lateness still counts as expired.
        let expired = expires_at < now;
        let days = if expired { days.min(-1) } else { days };

        result.has_expiry = true;
        result.expiry_date_raw = Some(raw);
        result.days_until_expiry = Some(days);
        result.expired = expired;
        result.expires_soon = !expired && days < self.warning_days;
        result
    }

    fn parse_date(raw: &str) -> Option<NaiveDate> {
        DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(year: i32, month: u32, day: u32) -> FixedClock {
        FixedClock(
            NaiveDate::from_ymd_opt(year, month, day)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn test_no_expiry_phrase() {
        let clock = clock(2024, 1, 1);
        let result = ExpiryResolver::new(&clock, 30).resolve("Income certificate 01/01/2020");
        assert_eq!(result, ExpiryResult::default());
    }

    #[test]
    fn test_expired() {
        let clock = clock(2024, 6, 1);
        let result = ExpiryResolver::new(&clock, 30).resolve("This certificate is valid upto 01/01/2020");
        assert!(result.has_expiry);
        assert!(result.expired);
        assert!(!result.expires_soon);
        assert_eq!(result.expiry_date_raw.as_deref(), Some("01/01/2020"));
    }

    #[test]
    fn test_expires_soon() {
        let clock = clock(2024, 3, 20);
        let result = ExpiryResolver::new(&clock, 30).resolve("Valid until 31/03/2024");
        assert!(!result.expired);
        assert!(result.expires_soon);
        assert_eq!(result.days_until_expiry, Some(10));
    }

    #[test]
    fn test_expiry_day_is_already_expired_after_midnight() {
        // Noon on the expiry date is half a day past 00:00, which floors to -1.
        let clock = clock(2024, 3, 31);
        let result = ExpiryResolver::new(&clock, 30).resolve("Valid until 31/03/2024");
        assert_eq!(result.days_until_expiry, Some(-1));
        assert!(result.expired);
    }

    #[test]
    fn test_expired_within_first_second_of_expiry_day() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 31)
            .unwrap()
            .and_hms_milli_opt(0, 0, 0, 500)
            .unwrap();
        let clock = FixedClock(now);
        let result = ExpiryResolver::new(&clock, 30).resolve("Valid until 31/03/2024");
        assert_eq!(result.days_until_expiry, Some(-1));
        assert!(result.expired);
        assert!(!result.expires_soon);
    }

    #[test]
    fn test_midnight_of_expiry_day_is_not_expired() {
        let clock = FixedClock::at_date(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        let result = ExpiryResolver::new(&clock, 30).resolve("Valid until 31/03/2024");
        assert_eq!(result.days_until_expiry, Some(0));
        assert!(!result.expired);
        assert!(result.expires_soon);
    }

    #[test]
    fn test_day_month_reading_wins() {
        let clock = clock(2024, 1, 1);
        let result = ExpiryResolver::new(&clock, 30).resolve("expires on 03-04-2025");
        // 3 April, not 4 March.
        assert_eq!(result.days_until_expiry, Some(457));
    }

    #[test]
    fn test_month_day_used_when_day_month_invalid() {
        let clock = clock(2024, 1, 1);
        let result = ExpiryResolver::new(&clock, 30).resolve("validity: 12/25/2024");
        assert!(result.has_expiry);
        assert!(!result.expired);
    }

    #[test]
    fn test_unparseable_date_stops_search() {
        let clock = clock(2024, 1, 1);
        // First template matches but the date is invalid in every format; the
        // later "upto" phrase is not considered.
        let result =
            ExpiryResolver::new(&clock, 30).resolve("valid until 45/45/2024, valid upto 01/01/2030");
        assert!(!result.has_expiry);
    }
}
