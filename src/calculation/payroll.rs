//! The payroll run for a single date.
//!
//! Every employee whose schedule fires on the run date is paid according to
//! their compensation. Employees not due are skipped entirely.

use chrono::NaiveDate;
use tracing::{debug, info};

use super::commissioned_pay::calculate_commissioned_payment;
use super::hourly_pay::calculate_hourly_payment;
use super::salaried_pay::calculate_salaried_payment;
use super::schedule_engine::is_pay_date;
use crate::directory::Directory;
use crate::error::PayrollResult;
use crate::models::{Compensation, Employee, PayrollRun};

/// Computes every payment due on `pay_date`.
///
/// Within each category the payments are sorted by name, compared
/// case-insensitively, with the id breaking ties.
///
/// # Errors
///
/// [`PayrollError::InvalidAmount`](crate::error::PayrollError::InvalidAmount)
/// if any pay figure or total leaves the decimal range.
pub fn calculate_payroll(directory: &Directory, pay_date: NaiveDate) -> PayrollResult<PayrollRun> {
    let mut run = PayrollRun::new(pay_date);
    info!(run_id = %run.run_id, pay_date = %pay_date, employees = directory.len(), "Starting payroll run");

    let mut due: Vec<&Employee> = directory
        .iter()
        .filter(|employee| is_pay_date(&employee.schedule, pay_date))
        .collect();
    due.sort_by_cached_key(|employee| (employee.name.to_lowercase(), employee.id.clone()));

    for employee in due {
        debug!(
            run_id = %run.run_id,
            employee_id = %employee.id,
            category = %employee.category(),
            "Paying employee"
        );
        match &employee.compensation {
            Compensation::Hourly { hourly_rate } => {
                run.hourly
                    .push(calculate_hourly_payment(employee, *hourly_rate, pay_date)?);
            }
            Compensation::Salaried { monthly_salary } => {
                run.salaried
                    .push(calculate_salaried_payment(employee, *monthly_salary, pay_date)?);
            }
            Compensation::Commissioned {
                monthly_salary,
                commission_rate,
            } => {
                run.commissioned.push(calculate_commissioned_payment(
                    employee,
                    *monthly_salary,
                    *commission_rate,
                    pay_date,
                )?);
            }
        }
    }

    let total_gross = run.total_gross()?;
    info!(
        run_id = %run.run_id,
        paid = run.paid_count(),
        total_gross = %total_gross,
        "Payroll run complete"
    );
    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SaleRecord, TimeCard};
    use crate::schedule::ScheduleDescriptor;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn add(directory: &mut Directory, name: &str, compensation: Compensation) -> String {
        let id = directory.allocate_id();
        directory.insert(Employee::new(id.clone(), name, "Rua 1", compensation));
        id
    }

    fn sample_directory() -> Directory {
        let mut directory = Directory::new();
        let hourly = add(&mut directory, "joao", Compensation::hourly(dec("10.00")).unwrap());
        add(&mut directory, "Ana", Compensation::hourly(dec("20.00")).unwrap());
        add(&mut directory, "Maria", Compensation::salaried(dec("2000.00")).unwrap());
        let commissioned = add(
            &mut directory,
            "Pedro",
            Compensation::commissioned(dec("1000.00"), dec("0.10")).unwrap(),
        );

        let employee = directory.get_mut(&hourly).unwrap();
        employee.time_cards = vec![
            TimeCard::new(make_date("2005-01-24"), dec("9")).unwrap(),
            TimeCard::new(make_date("2005-01-25"), dec("9")).unwrap(),
        ];
        directory.get_mut(&commissioned).unwrap().sales = vec![
            SaleRecord::new(make_date("2005-01-17"), dec("500.00")).unwrap(),
            SaleRecord::new(make_date("2005-01-20"), dec("300.50")).unwrap(),
        ];
        directory
    }

    #[test]
    fn test_friday_pays_weekly_and_biweekly_only() {
        let run = calculate_payroll(&sample_directory(), make_date("2005-01-28")).unwrap();
        assert_eq!(run.hourly.len(), 2);
        assert!(run.salaried.is_empty());
        assert_eq!(run.commissioned.len(), 1);
        assert_eq!(run.commissioned[0].pay.gross, dec("541.58"));
    }

    #[test]
    fn test_hourly_sorted_case_insensitively() {
        let run = calculate_payroll(&sample_directory(), make_date("2005-01-28")).unwrap();
        let names: Vec<&str> = run.hourly.iter().map(|p| p.employee.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "joao"]);
        assert_eq!(run.hourly[1].pay.gross, dec("190.00"));
        assert_eq!(run.hourly[0].pay.gross, Decimal::ZERO);
    }

    #[test]
    fn test_last_business_day_pays_salaried() {
        let run = calculate_payroll(&sample_directory(), make_date("2005-01-31")).unwrap();
        assert!(run.hourly.is_empty());
        assert_eq!(run.salaried.len(), 1);
        assert_eq!(run.salaried[0].pay.gross, dec("2000.00"));
        assert_eq!(run.total_gross().unwrap(), dec("2000.00"));
    }

    #[test]
    fn test_nobody_due_on_weekend() {
        let run = calculate_payroll(&sample_directory(), make_date("2005-01-29")).unwrap();
        assert_eq!(run.paid_count(), 0);
    }

    #[test]
    fn test_custom_schedule_moves_employee() {
        let mut directory = sample_directory();
        let id = directory.find_by_name("maria", 1).unwrap();
        directory.get_mut(&id).unwrap().schedule = ScheduleDescriptor::MonthlyDay { day: 10 };

        let run = calculate_payroll(&directory, make_date("2005-01-10")).unwrap();
        assert_eq!(run.salaried.len(), 1);
        assert!(
            calculate_payroll(&directory, make_date("2005-01-31"))
                .unwrap()
                .salaried
                .is_empty()
        );
    }

    #[test]
    fn test_overflowing_salary_fails_the_run() {
        let mut directory = sample_directory();
        add(
            &mut directory,
            "Zeca",
            Compensation::commissioned(Decimal::MAX, dec("0.10")).unwrap(),
        );
        let result = calculate_payroll(&directory, make_date("2005-01-14"));
        assert!(matches!(result, Err(crate::error::PayrollError::InvalidAmount { .. })));
    }

    #[test]
    fn test_salaries_summing_past_decimal_range_fail_the_run() {
        let mut directory = Directory::new();
        add(&mut directory, "Ana", Compensation::salaried(Decimal::MAX).unwrap());
        add(&mut directory, "Bia", Compensation::salaried(Decimal::MAX).unwrap());
        assert!(calculate_payroll(&directory, make_date("2005-01-31")).is_err());
    }
}
