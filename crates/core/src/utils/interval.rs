use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{CalculatorError, Result};
use crate::utils::time_utils::{days_between, get_days_between};

/// Reporting interval: `start` is exclusive, `end` is inclusive.
///
/// Transactions dated on or before `start` are historical: they shape the
/// opening position but are not period events.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Interval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Interval {
    pub fn of(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(CalculatorError::InvalidInterval { start, end }.into());
        }
        Ok(Interval { start, end })
    }

    /// True when `date` falls in the period (start, end].
    pub fn contains(&self, date: NaiveDate) -> bool {
        date > self.start && date <= self.end
    }

    pub fn is_historical(&self, date: NaiveDate) -> bool {
        date <= self.start
    }

    pub fn is_after(&self, date: NaiveDate) -> bool {
        date > self.end
    }

    /// Every day from start through end; index 0 is the opening mark.
    pub fn days(&self) -> Vec<NaiveDate> {
        get_days_between(self.start, self.end)
    }

    /// Number of entries in `days()`.
    pub fn len_days(&self) -> usize {
        days_between(self.start, self.end) as usize + 1
    }

    /// Offset of `date` from start, or `None` outside [start, end].
    pub fn day_offset(&self, date: NaiveDate) -> Option<usize> {
        if date < self.start || date > self.end {
            return None;
        }
        Some(days_between(self.start, date) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_start_exclusive_end_inclusive() {
        let interval = Interval::of(date(2020, 12, 31), date(2021, 1, 31)).unwrap();
        assert!(!interval.contains(date(2020, 12, 31)));
        assert!(interval.is_historical(date(2020, 12, 31)));
        assert!(interval.contains(date(2021, 1, 1)));
        assert!(interval.contains(date(2021, 1, 31)));
        assert!(interval.is_after(date(2021, 2, 1)));
    }

    #[test]
    fn test_day_offsets() {
        let interval = Interval::of(date(2020, 12, 31), date(2021, 1, 31)).unwrap();
        assert_eq!(interval.len_days(), 32);
        assert_eq!(interval.days().len(), 32);
        assert_eq!(interval.day_offset(date(2020, 12, 31)), Some(0));
        assert_eq!(interval.day_offset(date(2021, 1, 31)), Some(31));
        assert_eq!(interval.day_offset(date(2021, 2, 1)), None);
        assert_eq!(interval.day_offset(date(2020, 12, 30)), None);
    }

    #[test]
    fn test_reversed_interval_is_rejected() {
        assert!(Interval::of(date(2021, 1, 2), date(2021, 1, 1)).is_err());
        assert!(Interval::of(date(2021, 1, 1), date(2021, 1, 1)).is_ok());
    }
}
