//! Calendar month value type.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use society_shared::AppError;
use thiserror::Error;

/// Errors raised while parsing or stepping months.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    /// Input was not `YYYY-MM` or `YYYY-MM-DD`.
    #[error("Malformed month '{0}', expected YYYY-MM or YYYY-MM-01")]
    Malformed(String),

    /// Month arithmetic left the supported calendar range.
    #[error("Month out of range")]
    OutOfRange,
}

impl From<PeriodError> for AppError {
    fn from(err: PeriodError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// A calendar month, stored as the first day of that month.
///
/// Serialized as an ISO-8601 date (`2024-03-01`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthYear(NaiveDate);

impl MonthYear {
    /// Creates a month from its year and 1-based month number.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::OutOfRange` for an invalid month number.
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or(PeriodError::OutOfRange)
    }

    /// Truncates a date to its month.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date - chrono::Days::new(u64::from(date.day0())))
    }

    /// The month containing `now` as observed in timezone `tz`.
    #[must_use]
    pub fn current_in(tz: Tz, now: DateTime<Utc>) -> Self {
        Self::from_date(now.with_timezone(&tz).date_naive())
    }

    /// First day of the month.
    #[must_use]
    pub const fn first_day(&self) -> NaiveDate {
        self.0
    }

    /// Calendar year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month number, 1 through 12.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// The month `n` months after this one.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::OutOfRange` past the end of the calendar.
    pub fn plus_months(&self, n: u32) -> Result<Self, PeriodError> {
        self.0
            .checked_add_months(Months::new(n))
            .map(Self)
            .ok_or(PeriodError::OutOfRange)
    }

    /// `count` consecutive months starting with this one.
    ///
    /// # Errors
    ///
    /// Returns `PeriodError::OutOfRange` past the end of the calendar.
    pub fn consecutive(&self, count: u32) -> Result<Vec<Self>, PeriodError> {
        (0..count).map(|offset| self.plus_months(offset)).collect()
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for MonthYear {
    type Err = PeriodError;

    /// Accepts `YYYY-MM` or a full date, which is truncated to its month.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(Self::from_date(date));
        }
        NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| PeriodError::Malformed(s.to_string()))
    }
}

impl TryFrom<String> for MonthYear {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthYear> for String {
    fn from(value: MonthYear) -> Self {
        value.to_string()
    }
}

impl From<MonthYear> for NaiveDate {
    fn from(value: MonthYear) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case("2024-03", 2024, 3)]
    #[case("2024-03-01", 2024, 3)]
    #[case("2024-03-17", 2024, 3)]
    #[case(" 2025-12 ", 2025, 12)]
    fn test_parse(#[case] input: &str, #[case] year: i32, #[case] month: u32) {
        let parsed: MonthYear = input.parse().unwrap();
        assert_eq!(parsed.year(), year);
        assert_eq!(parsed.month(), month);
        assert_eq!(parsed.first_day().day(), 1);
    }

    #[rstest]
    #[case("")]
    #[case("2024")]
    #[case("2024-13")]
    #[case("March 2024")]
    #[case("2024-02-30")]
    fn test_parse_rejects_malformed(#[case] input: &str) {
        assert!(matches!(
            input.parse::<MonthYear>(),
            Err(PeriodError::Malformed(_))
        ));
    }

    #[test]
    fn test_display_is_first_of_month() {
        let month = MonthYear::new(2024, 7).unwrap();
        assert_eq!(month.to_string(), "2024-07-01");
    }

    #[test]
    fn test_new_rejects_invalid_month() {
        assert_eq!(MonthYear::new(2024, 0), Err(PeriodError::OutOfRange));
        assert_eq!(MonthYear::new(2024, 13), Err(PeriodError::OutOfRange));
    }

    #[test]
    fn test_consecutive_crosses_year_boundary() {
        let start = MonthYear::new(2024, 11).unwrap();
        let months = start.consecutive(3).unwrap();
        assert_eq!(
            months,
            vec![
                MonthYear::new(2024, 11).unwrap(),
                MonthYear::new(2024, 12).unwrap(),
                MonthYear::new(2025, 1).unwrap(),
            ]
        );
    }

    #[test]
    fn test_current_in_timezone() {
        // 20:00 UTC on Jan 31 is already Feb 1 in India.
        let now = Utc.with_ymd_and_hms(2024, 1, 31, 20, 0, 0).unwrap();
        assert_eq!(
            MonthYear::current_in(chrono_tz::Asia::Kolkata, now),
            MonthYear::new(2024, 2).unwrap()
        );
        assert_eq!(
            MonthYear::current_in(chrono_tz::UTC, now),
            MonthYear::new(2024, 1).unwrap()
        );
    }

    #[test]
    fn test_serde_as_iso_date() {
        let month = MonthYear::new(2024, 3).unwrap();
        let json = serde_json::to_string(&month).unwrap();
        assert_eq!(json, "\"2024-03-01\"");

        let back: MonthYear = serde_json::from_str("\"2024-03\"").unwrap();
        assert_eq!(back, month);
        assert!(serde_json::from_str::<MonthYear>("\"nope\"").is_err());
    }
}
