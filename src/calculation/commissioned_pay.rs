//! Pay calculation for commissioned employees.
//!
//! Commissioned employees earn the fixed salary share for their interval
//! plus a commission on the sales made during the pay period.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::deductions::{AccrualWindow, calculate_deductions};
use super::money::{checked_product, checked_total, truncate2};
use super::salaried_pay::salary_for_schedule;
use super::schedule_engine::pay_period;
use crate::error::PayrollResult;
use crate::models::{CommissionedPayment, Employee, NetPay, PaidEmployee, PayPeriod, SaleRecord};

/// Sum of the sales inside `period`, each truncated to cents first.
pub fn period_sales<'a, I>(sales: I, period: &PayPeriod) -> PayrollResult<Decimal>
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    checked_total(
        "sale amount",
        sales
            .into_iter()
            .filter(|sale| period.contains_date(sale.date()))
            .map(|sale| truncate2(sale.amount())),
    )
}

/// Computes a commissioned employee's payment for `pay_date`.
pub fn calculate_commissioned_payment(
    employee: &Employee,
    monthly_salary: Decimal,
    commission_rate: Decimal,
    pay_date: NaiveDate,
) -> PayrollResult<CommissionedPayment> {
    let fixed = salary_for_schedule(monthly_salary, &employee.schedule)?;
    let period = pay_period(&employee.schedule, pay_date);
    let sales = period_sales(&employee.sales, &period)?;
    let commission = truncate2(checked_product("commission rate", sales, commission_rate)?);
    let gross = checked_total("gross pay", [fixed, commission])?;

    let window = AccrualWindow::scheduled(&employee.schedule, pay_date);
    let deductions = calculate_deductions(
        employee.union.as_ref(),
        &employee.service_fees,
        &window,
        pay_date,
        gross,
    )?;

    Ok(CommissionedPayment {
        employee: PaidEmployee::from(employee),
        fixed,
        sales,
        commission,
        pay: NetPay::new(gross, deductions.total),
    })
}
