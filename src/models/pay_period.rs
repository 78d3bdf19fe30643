//! Pay period model.
//!
//! This module contains the [`PayPeriod`] type, the date window whose time
//! cards, sales and service fees contribute to a payroll run or a query.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

/// An inclusive date window `[start_date, end_date]`.
///
/// A window whose end precedes its start is empty.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod {
///     start_date: NaiveDate::from_ymd_opt(2005, 1, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2005, 1, 7).unwrap(),
/// };
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2005, 1, 7).unwrap()));
/// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2005, 1, 8).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The start date of the period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the period (inclusive).
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Creates an inclusive period.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Builds the inclusive period covering the half-open range `[start, end)`.
    ///
    /// Query operations take half-open ranges; this converts them into the
    /// inclusive form used everywhere else. `start == end` yields an empty
    /// period.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::InvalidDateRange`] if `start` is after `end`.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::PayPeriod;
    /// use chrono::NaiveDate;
    ///
    /// let start = NaiveDate::from_ymd_opt(2005, 1, 1).unwrap();
    /// let end = NaiveDate::from_ymd_opt(2005, 1, 3).unwrap();
    /// let period = PayPeriod::half_open(start, end).unwrap();
    ///
    /// assert!(period.contains_date(NaiveDate::from_ymd_opt(2005, 1, 2).unwrap()));
    /// assert!(!period.contains_date(end));
    /// ```
    pub fn half_open(start: NaiveDate, end: NaiveDate) -> PayrollResult<Self> {
        if start > end {
            return Err(PayrollError::InvalidDateRange { start, end });
        }
        let end_date = end.pred_opt().unwrap_or(NaiveDate::MIN);
        Ok(Self {
            start_date: start,
            end_date,
        })
    }

    /// Checks if a given date falls within this period (inclusive on both ends).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns true if no date can fall within this period.
    pub fn is_empty(&self) -> bool {
        self.end_date < self.start_date
    }
}
