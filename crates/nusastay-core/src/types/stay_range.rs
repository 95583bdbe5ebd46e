//! Half-open stay date range.
//!
//! A stay occupies `[check_in, check_out)`: the check-out day itself is
//! free for the next guest, so back-to-back stays never conflict.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// A `[check_in, check_out)` date pair for a stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayRange {
    /// First night of the stay.
    pub check_in: NaiveDate,
    /// Departure day (exclusive).
    pub check_out: NaiveDate,
}

impl StayRange {
    /// Create a stay range, enforcing `check_out > check_in`.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> AppResult<Self> {
        if check_out <= check_in {
            return Err(AppError::invalid_date_range(format!(
                "check_out ({check_out}) must be after check_in ({check_in})"
            )));
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// Number of nights covered by the stay.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Half-open overlap test: ranges overlap iff
    /// `a.check_in < b.check_out && b.check_in < a.check_out`.
    pub fn overlaps(&self, other: &StayRange) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 9, d).unwrap()
    }

    fn range(a: u32, b: u32) -> StayRange {
        StayRange::new(day(a), day(b)).unwrap()
    }

    #[test]
    fn test_rejects_inverted_and_empty_ranges() {
        assert!(StayRange::new(day(10), day(10)).is_err());
        assert!(StayRange::new(day(13), day(10)).is_err());
    }

    #[test]
    fn test_nights_is_whole_day_difference() {
        assert_eq!(range(10, 13).nights(), 3);
        assert_eq!(range(10, 11).nights(), 1);
    }

    #[test]
    fn test_overlapping_ranges_conflict() {
        assert!(range(10, 13).overlaps(&range(12, 15)));
        assert!(range(12, 15).overlaps(&range(10, 13)));
        assert!(range(10, 13).overlaps(&range(11, 12)));
    }

    #[test]
    fn test_turnover_day_does_not_conflict() {
        // Check-out on day 13 frees the slot for a day-13 check-in.
        assert!(!range(10, 13).overlaps(&range(13, 16)));
        assert!(!range(13, 16).overlaps(&range(10, 13)));
    }

    #[test]
    fn test_disjoint_ranges_do_not_conflict() {
        assert!(!range(10, 13).overlaps(&range(20, 25)));
    }
}
