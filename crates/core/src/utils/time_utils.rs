use chrono::NaiveDate;

use crate::constants::{AVERAGE_DAYS_PER_MONTH, DAYS_PER_YEAR};

pub fn get_days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(current);
        if let Some(next) = current.succ_opt() {
            current = next;
        } else {
            break;
        }
    }
    days
}

/// Signed number of days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Gap between two dates in whole months, rounded to the nearest month.
pub fn months_between_rounded(from: NaiveDate, to: NaiveDate) -> i64 {
    (days_between(from, to) as f64 / AVERAGE_DAYS_PER_MONTH).round() as i64
}

/// Fraction of a year between two dates on an act/365 basis.
pub fn year_fraction(from: NaiveDate, to: NaiveDate) -> f64 {
    days_between(from, to) as f64 / DAYS_PER_YEAR
}
