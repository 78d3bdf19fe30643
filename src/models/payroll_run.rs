//! Payroll run result models.
//!
//! This module contains the [`PayrollRun`] type and the per-category payment
//! records produced by a single run date, along with the section totals the
//! report prints.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Employee;
use crate::calculation::checked_total;
use crate::error::{PayrollError, PayrollResult};

/// Identifies the employee a payment record belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaidEmployee {
    /// The employee id.
    pub id: String,
    /// The employee name as printed.
    pub name: String,
    /// The payment method description as printed.
    pub payment_description: String,
}

impl From<&Employee> for PaidEmployee {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id.clone(),
            name: employee.name.clone(),
            payment_description: employee.payment_description(),
        }
    }
}

/// Gross pay, deductions and net pay for one employee.
///
/// `deductions` never exceeds `gross`, so `net` is never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NetPay {
    /// Gross pay before deductions.
    pub gross: Decimal,
    /// Union dues plus service fees, capped at gross.
    pub deductions: Decimal,
    /// Gross minus deductions.
    pub net: Decimal,
}

impl NetPay {
    /// Applies deductions to gross, capping them at gross.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::NetPay;
    /// use rust_decimal::Decimal;
    ///
    /// let pay = NetPay::new(Decimal::new(10000, 2), Decimal::new(25000, 2));
    /// assert_eq!(pay.deductions, Decimal::new(10000, 2));
    /// assert_eq!(pay.net, Decimal::ZERO);
    /// ```
    pub fn new(gross: Decimal, deductions: Decimal) -> Self {
        let deductions = deductions.max(Decimal::ZERO).min(gross);
        Self {
            gross,
            deductions,
            net: gross - deductions,
        }
    }

    fn accumulate(&mut self, other: &NetPay) -> PayrollResult<()> {
        self.gross = checked_total("gross pay", [self.gross, other.gross])?;
        self.deductions = checked_total("deductions", [self.deductions, other.deductions])?;
        self.net = checked_total("net pay", [self.net, other.net])?;
        Ok(())
    }
}

/// A paid hourly employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyPayment {
    /// Who was paid.
    pub employee: PaidEmployee,
    /// Unrounded ordinary hours in the period.
    pub normal_hours: Decimal,
    /// Unrounded overtime hours in the period.
    pub overtime_hours: Decimal,
    /// Pay figures.
    pub pay: NetPay,
}

impl HourlyPayment {
    /// Ordinary hours rounded to the nearest whole hour for display.
    pub fn displayed_normal_hours(&self) -> i64 {
        round_hours(self.normal_hours)
    }

    /// Overtime hours rounded to the nearest whole hour for display.
    pub fn displayed_overtime_hours(&self) -> i64 {
        round_hours(self.overtime_hours)
    }
}

fn add_hours(total: i64, hours: i64) -> PayrollResult<i64> {
    total.checked_add(hours).ok_or_else(|| PayrollError::InvalidAmount {
        field: "hours".to_string(),
        message: "exceeds the representable range".to_string(),
    })
}

fn round_hours(hours: Decimal) -> i64 {
    hours
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or_default()
}

/// A paid salaried employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalariedPayment {
    /// Who was paid.
    pub employee: PaidEmployee,
    /// Pay figures.
    pub pay: NetPay,
}

/// A paid commissioned employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionedPayment {
    /// Who was paid.
    pub employee: PaidEmployee,
    /// Fixed salary share for the interval.
    pub fixed: Decimal,
    /// Sum of period sales, each truncated to cents.
    pub sales: Decimal,
    /// Commission on period sales.
    pub commission: Decimal,
    /// Pay figures.
    pub pay: NetPay,
}

/// Section totals for hourly employees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HourlyTotals {
    /// Sum of the displayed (rounded) ordinary hours.
    pub normal_hours: i64,
    /// Sum of the displayed (rounded) overtime hours.
    pub overtime_hours: i64,
    /// Summed pay figures.
    pub pay: NetPay,
}

/// Section totals for commissioned employees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommissionedTotals {
    /// Summed fixed shares.
    pub fixed: Decimal,
    /// Summed sales.
    pub sales: Decimal,
    /// Summed commissions.
    pub commission: Decimal,
    /// Summed pay figures.
    pub pay: NetPay,
}

/// Every payment made on one run date, grouped by category and sorted by
/// name within each group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRun {
    /// Correlation id for log lines about this run.
    pub run_id: Uuid,
    /// The run date.
    pub pay_date: NaiveDate,
    /// Paid hourly employees.
    pub hourly: Vec<HourlyPayment>,
    /// Paid salaried employees.
    pub salaried: Vec<SalariedPayment>,
    /// Paid commissioned employees.
    pub commissioned: Vec<CommissionedPayment>,
}

impl PayrollRun {
    /// Creates an empty run for the given date.
    pub fn new(pay_date: NaiveDate) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            pay_date,
            hourly: Vec::new(),
            salaried: Vec::new(),
            commissioned: Vec::new(),
        }
    }

    /// Totals of the hourly section.
    ///
    /// Like every total on a run, this fails with
    /// [`PayrollError::InvalidAmount`] if a sum leaves the decimal range.
    pub fn hourly_totals(&self) -> PayrollResult<HourlyTotals> {
        let mut totals = HourlyTotals::default();
        for payment in &self.hourly {
            totals.normal_hours = add_hours(totals.normal_hours, payment.displayed_normal_hours())?;
            totals.overtime_hours =
                add_hours(totals.overtime_hours, payment.displayed_overtime_hours())?;
            totals.pay.accumulate(&payment.pay)?;
        }
        Ok(totals)
    }

    /// Totals of the salaried section.
    pub fn salaried_totals(&self) -> PayrollResult<NetPay> {
        let mut totals = NetPay::default();
        for payment in &self.salaried {
            totals.accumulate(&payment.pay)?;
        }
        Ok(totals)
    }

    /// Totals of the commissioned section.
    pub fn commissioned_totals(&self) -> PayrollResult<CommissionedTotals> {
        let mut totals = CommissionedTotals::default();
        for payment in &self.commissioned {
            totals.fixed = checked_total("fixed pay", [totals.fixed, payment.fixed])?;
            totals.sales = checked_total("sale amount", [totals.sales, payment.sales])?;
            totals.commission =
                checked_total("commission", [totals.commission, payment.commission])?;
            totals.pay.accumulate(&payment.pay)?;
        }
        Ok(totals)
    }

    /// Gross pay across all categories.
    pub fn total_gross(&self) -> PayrollResult<Decimal> {
        checked_total(
            "gross pay",
            [
                self.hourly_totals()?.pay.gross,
                self.salaried_totals()?.gross,
                self.commissioned_totals()?.pay.gross,
            ],
        )
    }

    /// Number of employees paid in this run.
    pub fn paid_count(&self) -> usize {
        self.hourly.len() + self.salaried.len() + self.commissioned.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn paid(name: &str) -> PaidEmployee {
        PaidEmployee {
            id: format!("EMP-{}", name),
            name: name.to_string(),
            payment_description: "Em maos".to_string(),
        }
    }

    fn create_sample_run() -> PayrollRun {
        let mut run = PayrollRun::new(NaiveDate::from_ymd_opt(2005, 1, 28).unwrap());
        run.hourly.push(HourlyPayment {
            employee: paid("a"),
            normal_hours: dec("15.5"),
            overtime_hours: dec("2.4"),
            pay: NetPay::new(dec("190.00"), dec("10.00")),
        });
        run.hourly.push(HourlyPayment {
            employee: paid("b"),
            normal_hours: dec("8"),
            overtime_hours: dec("0"),
            pay: NetPay::new(dec("80.00"), Decimal::ZERO),
        });
        run.salaried.push(SalariedPayment {
            employee: paid("c"),
            pay: NetPay::new(dec("2000.00"), dec("50.00")),
        });
        run.commissioned.push(CommissionedPayment {
            employee: paid("d"),
            fixed: dec("461.53"),
            sales: dec("800.50"),
            commission: dec("80.05"),
            pay: NetPay::new(dec("541.58"), Decimal::ZERO),
        });
        run
    }

    #[test]
    fn test_net_pay_caps_deductions_at_gross() {
        let pay = NetPay::new(dec("30.00"), dec("45.10"));
        assert_eq!(pay.deductions, dec("30.00"));
        assert_eq!(pay.net, Decimal::ZERO);
    }

    #[test]
    fn test_net_pay_subtracts_deductions() {
        let pay = NetPay::new(dec("190.00"), dec("10.25"));
        assert_eq!(pay.net, dec("179.75"));
    }

    #[test]
    fn test_displayed_hours_round_half_up() {
        let run = create_sample_run();
        assert_eq!(run.hourly[0].displayed_normal_hours(), 16);
        assert_eq!(run.hourly[0].displayed_overtime_hours(), 2);
    }

    #[test]
    fn test_hourly_totals_sum_rounded_hours() {
        let totals = create_sample_run().hourly_totals().unwrap();
        assert_eq!(totals.normal_hours, 24);
        assert_eq!(totals.overtime_hours, 2);
        assert_eq!(totals.pay.gross, dec("270.00"));
        assert_eq!(totals.pay.deductions, dec("10.00"));
        assert_eq!(totals.pay.net, dec("260.00"));
    }

    #[test]
    fn test_commissioned_totals() {
        let totals = create_sample_run().commissioned_totals().unwrap();
        assert_eq!(totals.fixed, dec("461.53"));
        assert_eq!(totals.sales, dec("800.50"));
        assert_eq!(totals.commission, dec("80.05"));
    }

    #[test]
    fn test_total_gross_spans_categories() {
        let run = create_sample_run();
        assert_eq!(run.total_gross().unwrap(), dec("2811.58"));
        assert_eq!(run.paid_count(), 4);
    }

    #[test]
    fn test_empty_run_totals_are_zero() {
        let run = PayrollRun::new(NaiveDate::from_ymd_opt(2005, 1, 3).unwrap());
        assert_eq!(run.total_gross().unwrap(), Decimal::ZERO);
        assert_eq!(run.hourly_totals().unwrap(), HourlyTotals::default());
    }

    #[test]
    fn test_totals_beyond_decimal_range_are_errors() {
        let mut run = PayrollRun::new(NaiveDate::from_ymd_opt(2005, 1, 31).unwrap());
        for name in ["a", "b"] {
            run.salaried.push(SalariedPayment {
                employee: paid(name),
                pay: NetPay::new(Decimal::MAX, Decimal::ZERO),
            });
        }
        assert!(matches!(
            run.salaried_totals(),
            Err(PayrollError::InvalidAmount { .. })
        ));
        assert!(run.total_gross().is_err());
    }
}
