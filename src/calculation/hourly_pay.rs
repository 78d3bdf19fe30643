//! Pay calculation for hourly employees.
//!
//! Ordinary hours are paid at the hourly rate and overtime hours at one and
//! a half times the rate. Each product is truncated to cents separately.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::daily_hours::{HoursSplit, summarize_hours};
use super::deductions::{AccrualWindow, calculate_deductions};
use super::money::{checked_product, checked_total, round_intermediate, truncate2};
use super::schedule_engine::{pay_period, projected_pay_date};
use crate::error::PayrollResult;
use crate::models::{Employee, HourlyPayment, NetPay, PaidEmployee, TimeCard};
use crate::schedule::ScheduleDescriptor;

const OVERTIME_NUMERATOR: Decimal = Decimal::from_parts(3, 0, 0, false, 0);
const OVERTIME_DENOMINATOR: Decimal = Decimal::from_parts(2, 0, 0, false, 0);

/// Gross pay components for an hourly employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyGross {
    /// Ordinary pay, truncated to cents.
    pub ordinary_pay: Decimal,
    /// Overtime pay, truncated to cents.
    pub overtime_pay: Decimal,
    /// Ordinary plus overtime pay.
    pub gross: Decimal,
}

/// The overtime rate: one and a half times the hourly rate, at the
/// intermediate scale.
pub fn overtime_rate(hourly_rate: Decimal) -> PayrollResult<Decimal> {
    let scaled = checked_product("hourly rate", hourly_rate, OVERTIME_NUMERATOR)?;
    Ok(round_intermediate(scaled / OVERTIME_DENOMINATOR))
}

/// Computes gross pay for the given hours.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{hourly_gross, HoursSplit};
/// use rust_decimal::Decimal;
///
/// let hours = HoursSplit {
///     ordinary_hours: Decimal::from(16),
///     overtime_hours: Decimal::from(2),
/// };
/// let gross = hourly_gross(Decimal::from(10), &hours).unwrap();
/// assert_eq!(gross.ordinary_pay, Decimal::from(160));
/// assert_eq!(gross.overtime_pay, Decimal::from(30));
/// assert_eq!(gross.gross, Decimal::from(190));
/// ```
pub fn hourly_gross(hourly_rate: Decimal, hours: &HoursSplit) -> PayrollResult<HourlyGross> {
    let ordinary_pay = truncate2(checked_product(
        "hourly rate",
        hourly_rate,
        hours.ordinary_hours,
    )?);
    let overtime_pay = if hours.overtime_hours > Decimal::ZERO {
        truncate2(checked_product(
            "hourly rate",
            overtime_rate(hourly_rate)?,
            hours.overtime_hours,
        )?)
    } else {
        Decimal::ZERO
    };
    Ok(HourlyGross {
        ordinary_pay,
        overtime_pay,
        gross: checked_total("gross pay", [ordinary_pay, overtime_pay])?,
    })
}

/// The most recent pay date before `pay_date` that any time card was
/// projected onto.
///
/// Hourly employees are only considered paid on dates they had work for,
/// so the previous payment is derived from the time cards rather than from
/// the schedule alone.
pub fn hourly_prior_pay_date(
    schedule: &ScheduleDescriptor,
    time_cards: &[TimeCard],
    pay_date: NaiveDate,
) -> Option<NaiveDate> {
    time_cards
        .iter()
        .filter_map(|card| projected_pay_date(schedule, card.date()))
        .filter(|projected| *projected < pay_date)
        .max()
}

/// Accrual window for an hourly member: the previous payment, falling back
/// to the day before the earliest time card.
pub fn hourly_accrual_window(
    schedule: &ScheduleDescriptor,
    time_cards: &[TimeCard],
    pay_date: NaiveDate,
) -> AccrualWindow {
    AccrualWindow {
        prior_pay_date: hourly_prior_pay_date(schedule, time_cards, pay_date),
        baseline: time_cards
            .iter()
            .map(TimeCard::date)
            .min()
            .and_then(|first| first.pred_opt()),
    }
}

/// Computes an hourly employee's payment for `pay_date`.
///
/// The caller has already checked that `pay_date` is a pay date under the
/// employee's schedule.
pub fn calculate_hourly_payment(
    employee: &Employee,
    hourly_rate: Decimal,
    pay_date: NaiveDate,
) -> PayrollResult<HourlyPayment> {
    let period = pay_period(&employee.schedule, pay_date);
    let hours = summarize_hours(&employee.time_cards, &period)?;
    let gross = hourly_gross(hourly_rate, &hours)?;

    let window = hourly_accrual_window(&employee.schedule, &employee.time_cards, pay_date);
    let deductions = calculate_deductions(
        employee.union.as_ref(),
        &employee.service_fees,
        &window,
        pay_date,
        gross.gross,
    )?;

    Ok(HourlyPayment {
        employee: PaidEmployee::from(employee),
        normal_hours: hours.ordinary_hours,
        overtime_hours: hours.overtime_hours,
        pay: NetPay::new(gross.gross, deductions.total),
    })
}
