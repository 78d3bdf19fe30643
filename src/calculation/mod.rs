//! Calculation logic for the payroll engine.
//!
//! This module contains the fixed-point money rules, the daily overtime
//! split, the schedule engine that decides pay dates and periods, union
//! deductions, the per-category pay calculations and the payroll run that
//! ties them together.

mod commissioned_pay;
mod daily_hours;
mod deductions;
mod hourly_pay;
mod money;
mod payroll;
mod salaried_pay;
mod schedule_engine;

pub use commissioned_pay::{calculate_commissioned_payment, period_sales};
pub use daily_hours::{DAILY_OVERTIME_THRESHOLD, HoursSplit, split_daily_hours, summarize_hours};
pub use deductions::{
    AccrualWindow, DeductionBreakdown, calculate_deductions, days_between, service_fees,
    union_dues,
};
pub use hourly_pay::{
    HourlyGross, calculate_hourly_payment, hourly_accrual_window, hourly_gross,
    hourly_prior_pay_date, overtime_rate,
};
pub use money::{
    INTERMEDIATE_SCALE, checked_product, checked_total, round_intermediate, truncate2,
    weekly_equivalent,
};
pub use payroll::calculate_payroll;
pub use salaried_pay::{calculate_salaried_payment, salary_for_schedule};
pub use schedule_engine::{
    EPOCH, is_pay_date, is_weekend, last_business_day_of_month, pay_period, period_start,
    prior_scheduled_date, projected_pay_date, weeks_since_epoch,
};
