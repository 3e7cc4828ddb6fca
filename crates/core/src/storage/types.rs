use chrono::{Duration, NaiveDate};

use super::DateRangeError;

/// A date range with inclusive start and end dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// Creates a range covering exactly one day.
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Creates a range of `days` days ending on (and including) `today`.
    ///
    /// A window of zero days is treated as one day.
    pub fn trailing_days(today: NaiveDate, days: u32) -> Self {
        let span = i64::from(days.max(1)) - 1;
        let start = today
            .checked_sub_signed(Duration::days(span))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end: today }
    }

    /// Returns true if `date` falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_valid_range_construction() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();

        assert_eq!(range.start, date(2024, 1, 1));
        assert_eq!(range.end, date(2024, 1, 31));
    }

    #[test]
    fn test_same_day_range_is_valid() {
        let range = DateRange::new(date(2024, 6, 15), date(2024, 6, 15)).unwrap();

        assert_eq!(range, DateRange::single_day(date(2024, 6, 15)));
    }

    #[test]
    fn test_invalid_range_returns_error() {
        let result = DateRange::new(date(2024, 1, 31), date(2024, 1, 1));

        assert_eq!(result, Err(DateRangeError::InvalidRange));
    }

    #[test]
    fn test_trailing_three_days() {
        let range = DateRange::trailing_days(date(2024, 3, 1), 3);

        // 2024 is a leap year
        assert_eq!(range.start, date(2024, 2, 28));
        assert_eq!(range.end, date(2024, 3, 1));
    }

    #[test]
    fn test_trailing_zero_days_is_today() {
        let range = DateRange::trailing_days(date(2024, 3, 1), 0);

        assert_eq!(range, DateRange::single_day(date(2024, 3, 1)));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = DateRange::new(date(2024, 1, 4), date(2024, 1, 6)).unwrap();

        assert!(range.contains(date(2024, 1, 4)));
        assert!(range.contains(date(2024, 1, 6)));
        assert!(!range.contains(date(2024, 1, 3)));
        assert!(!range.contains(date(2024, 1, 7)));
    }
}
