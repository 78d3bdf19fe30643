//! Ledger entries recorded against an employee.
//!
//! Time cards, sales and service fees are immutable once created and only
//! ever accumulate. Each constructor validates its amount.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

fn require_positive(field: &str, value: Decimal) -> PayrollResult<Decimal> {
    if value <= Decimal::ZERO {
        return Err(PayrollError::InvalidAmount {
            field: field.to_string(),
            message: "must be positive".to_string(),
        });
    }
    Ok(value)
}

/// Hours worked by an hourly employee on a single day.
///
/// Several cards may share a date; their hours are added together before
/// the daily overtime split.
///
/// # Example
///
/// ```
/// use payroll_engine::models::TimeCard;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let card = TimeCard::new(NaiveDate::from_ymd_opt(2005, 1, 3).unwrap(), Decimal::new(95, 1)).unwrap();
/// assert_eq!(card.hours(), Decimal::new(95, 1));
///
/// assert!(TimeCard::new(NaiveDate::from_ymd_opt(2005, 1, 3).unwrap(), Decimal::ZERO).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeCard {
    date: NaiveDate,
    hours: Decimal,
}

impl TimeCard {
    /// Creates a time card, rejecting non-positive hours.
    pub fn new(date: NaiveDate, hours: Decimal) -> PayrollResult<Self> {
        Ok(Self {
            date,
            hours: require_positive("hours", hours)?,
        })
    }

    /// The day the hours were worked.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The number of hours worked.
    pub fn hours(&self) -> Decimal {
        self.hours
    }
}

/// A sale made by a commissioned employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    date: NaiveDate,
    amount: Decimal,
}

impl SaleRecord {
    /// Creates a sale record, rejecting non-positive amounts.
    pub fn new(date: NaiveDate, amount: Decimal) -> PayrollResult<Self> {
        Ok(Self {
            date,
            amount: require_positive("sale amount", amount)?,
        })
    }

    /// The day of the sale.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The value of the sale.
    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

/// A union service fee charged to a member.
///
/// The entry lives in the ledger of the employee whose union id it was
/// recorded against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceFeeEntry {
    date: NaiveDate,
    amount: Decimal,
}

impl ServiceFeeEntry {
    /// Creates a service fee entry, rejecting non-positive amounts.
    pub fn new(date: NaiveDate, amount: Decimal) -> PayrollResult<Self> {
        Ok(Self {
            date,
            amount: require_positive("service fee", amount)?,
        })
    }

    /// The day the fee was charged.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The fee amount.
    pub fn amount(&self) -> Decimal {
        self.amount
    }
}
