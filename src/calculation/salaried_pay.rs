//! Pay calculation for salaried employees.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::deductions::{AccrualWindow, calculate_deductions};
use super::money::{truncate2, weekly_equivalent};
use crate::error::PayrollResult;
use crate::models::{Employee, NetPay, PaidEmployee, SalariedPayment};
use crate::schedule::ScheduleDescriptor;

/// Salary paid per pay date.
///
/// Monthly schedules pay the full monthly salary. Weekly-family schedules
/// pay the salary's share for the interval (`salary × 12 × interval / 52`).
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::salary_for_schedule;
/// use payroll_engine::schedule::ScheduleDescriptor;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let salary = Decimal::from_str("1000.00").unwrap();
/// assert_eq!(
///     salary_for_schedule(salary, &ScheduleDescriptor::MonthlyLastBusinessDay).unwrap(),
///     salary
/// );
/// assert_eq!(
///     salary_for_schedule(salary, &ScheduleDescriptor::BIWEEKLY_FRIDAY).unwrap(),
///     Decimal::from_str("461.53").unwrap()
/// );
/// ```
pub fn salary_for_schedule(
    monthly_salary: Decimal,
    schedule: &ScheduleDescriptor,
) -> PayrollResult<Decimal> {
    match schedule.interval_weeks() {
        Some(interval_weeks) => weekly_equivalent(monthly_salary, interval_weeks),
        None => Ok(truncate2(monthly_salary)),
    }
}

/// Computes a salaried employee's payment for `pay_date`.
pub fn calculate_salaried_payment(
    employee: &Employee,
    monthly_salary: Decimal,
    pay_date: NaiveDate,
) -> PayrollResult<SalariedPayment> {
    let gross = salary_for_schedule(monthly_salary, &employee.schedule)?;
    let window = AccrualWindow::scheduled(&employee.schedule, pay_date);
    let deductions = calculate_deductions(
        employee.union.as_ref(),
        &employee.service_fees,
        &window,
        pay_date,
        gross,
    )?;

    Ok(SalariedPayment {
        employee: PaidEmployee::from(employee),
        pay: NetPay::new(gross, deductions.total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Compensation, ServiceFeeEntry, UnionMembership};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn create_salaried(salary: &str) -> Employee {
        Employee::new(
            "EMP2",
            "Maria",
            "Rua 2",
            Compensation::salaried(dec(salary)).unwrap(),
        )
    }

    #[test]
    fn test_monthly_salary_truncated() {
        let employee = create_salaried("2500.999");
        let payment = calculate_salaried_payment(&employee, dec("2500.999"), make_date("2005-01-31")).unwrap();
        assert_eq!(payment.pay.gross, dec("2500.99"));
        assert_eq!(payment.pay.net, dec("2500.99"));
    }

    #[test]
    fn test_weekly_schedule_prorates_salary() {
        let mut employee = create_salaried("1300.00");
        employee.schedule = ScheduleDescriptor::WEEKLY_FRIDAY;
        // 1300 * 12 / 52 = 300
        let payment = calculate_salaried_payment(&employee, dec("1300.00"), make_date("2005-01-07")).unwrap();
        assert_eq!(payment.pay.gross, dec("300.00"));
    }

    #[test]
    fn test_first_month_dues_from_day_before_epoch() {
        let mut employee = create_salaried("2000.00");
        employee.union = Some(UnionMembership::new("S2", dec("1.00")).unwrap());
        let payment = calculate_salaried_payment(&employee, dec("2000.00"), make_date("2005-01-31")).unwrap();
        // 2004-12-31 .. 2005-01-31 = 31 days
        assert_eq!(payment.pay.deductions, dec("31.00"));
        assert_eq!(payment.pay.net, dec("1969.00"));
    }

    #[test]
    fn test_later_month_dues_since_previous_business_day() {
        let mut employee = create_salaried("2000.00");
        employee.union = Some(UnionMembership::new("S2", dec("1.00")).unwrap());
        employee.service_fees = vec![
            ServiceFeeEntry::new(make_date("2005-04-29"), dec("50.00")).unwrap(),
            ServiceFeeEntry::new(make_date("2005-05-02"), dec("10.00")).unwrap(),
        ];
        let payment = calculate_salaried_payment(&employee, dec("2000.00"), make_date("2005-05-31")).unwrap();
        // previous payment 2005-04-29: 32 days of dues, only the May fee
        assert_eq!(payment.pay.deductions, dec("42.00"));
    }

    #[test]
    fn test_zero_salary_owes_nothing() {
        let mut employee = create_salaried("0");
        employee.union = Some(UnionMembership::new("S2", dec("1.00")).unwrap());
        let payment = calculate_salaried_payment(&employee, Decimal::ZERO, make_date("2005-01-31")).unwrap();
        assert_eq!(payment.pay, NetPay::default());
    }

    #[test]
    fn test_salary_beyond_decimal_range_on_weekly_schedule() {
        let mut employee = create_salaried("0");
        employee.schedule = ScheduleDescriptor::BIWEEKLY_FRIDAY;
        let result = calculate_salaried_payment(&employee, Decimal::MAX, make_date("2005-01-14"));
        assert!(result.is_err());
    }
}
