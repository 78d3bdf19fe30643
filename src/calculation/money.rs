//! Fixed-point money rules.
//!
//! Every intermediate product is truncated to cents before it is added to
//! anything else. Summing first and truncating once gives different, wrong
//! totals.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{PayrollError, PayrollResult};

/// Scale of intermediate quotients before truncation to cents.
pub const INTERMEDIATE_SCALE: u32 = 10;

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
const WEEKS_PER_YEAR: Decimal = Decimal::from_parts(52, 0, 0, false, 0);

/// Truncates toward zero at two decimal places.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::truncate2;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(truncate2(Decimal::from_str("10.129").unwrap()), Decimal::from_str("10.12").unwrap());
/// assert_eq!(truncate2(Decimal::from_str("461.538461").unwrap()), Decimal::from_str("461.53").unwrap());
/// ```
pub fn truncate2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::ToZero)
}

/// Rounds a quotient half-up to the intermediate scale.
pub fn round_intermediate(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(INTERMEDIATE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

fn out_of_range(field: &str) -> PayrollError {
    PayrollError::InvalidAmount {
        field: field.to_string(),
        message: "exceeds the representable range".to_string(),
    }
}

/// Multiplies two amounts, failing with [`PayrollError::InvalidAmount`]
/// instead of overflowing.
pub fn checked_product(field: &str, lhs: Decimal, rhs: Decimal) -> PayrollResult<Decimal> {
    lhs.checked_mul(rhs).ok_or_else(|| out_of_range(field))
}

/// Adds up amounts, failing with [`PayrollError::InvalidAmount`] instead of
/// overflowing.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::checked_total;
/// use rust_decimal::Decimal;
///
/// let total = checked_total("sales", [Decimal::ONE, Decimal::TWO]).unwrap();
/// assert_eq!(total, Decimal::from(3));
/// assert!(checked_total("sales", [Decimal::MAX, Decimal::ONE]).is_err());
/// ```
pub fn checked_total<I>(field: &str, values: I) -> PayrollResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().try_fold(Decimal::ZERO, |total, value| {
        total.checked_add(value).ok_or_else(|| out_of_range(field))
    })
}

/// The share of a monthly salary paid every `interval_weeks` weeks.
///
/// Computed as `monthly × 12 × interval / 52`, rounded half-up to ten
/// decimal places and then truncated to cents.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::weekly_equivalent;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let fixed = weekly_equivalent(Decimal::from_str("1000.00").unwrap(), 2).unwrap();
/// assert_eq!(fixed, Decimal::from_str("461.53").unwrap());
/// ```
pub fn weekly_equivalent(monthly_salary: Decimal, interval_weeks: u32) -> PayrollResult<Decimal> {
    let annual = checked_product("salary", monthly_salary, MONTHS_PER_YEAR)?;
    let annual_share = checked_product("salary", annual, Decimal::from(interval_weeks))?;
    Ok(truncate2(round_intermediate(annual_share / WEEKS_PER_YEAR)))
}
