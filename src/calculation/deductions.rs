//! Union dues and service fee deductions.
//!
//! Members pay daily dues for every day since their previous payment plus
//! any service fees charged since then. The total is capped at gross pay.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::{checked_product, checked_total, truncate2};
use super::schedule_engine::{EPOCH, prior_scheduled_date};
use crate::error::PayrollResult;
use crate::models::{ServiceFeeEntry, UnionMembership};
use crate::schedule::ScheduleDescriptor;

/// Dues and fees charged to a union member on one pay date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeductionBreakdown {
    /// Daily dues times days since the previous payment.
    pub union_dues: Decimal,
    /// Service fees charged since the previous payment.
    pub service_fees: Decimal,
    /// Dues plus fees, capped at gross.
    pub total: Decimal,
}

/// Inputs that decide how far back a member's deductions reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccrualWindow {
    /// The previous payment date, if there was one.
    pub prior_pay_date: Option<NaiveDate>,
    /// Where dues start accruing when there was no previous payment.
    /// `None` means no dues are owed at all.
    pub baseline: Option<NaiveDate>,
}

impl AccrualWindow {
    /// Window for employees whose previous payment follows from the schedule
    /// alone. With no previous payment, dues accrue from the day before the
    /// epoch.
    pub fn scheduled(schedule: &ScheduleDescriptor, pay_date: NaiveDate) -> Self {
        Self {
            prior_pay_date: prior_scheduled_date(schedule, pay_date),
            baseline: EPOCH.pred_opt(),
        }
    }
}

/// Days between `from` and `to`, never negative.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days().max(0)
}

/// Union dues owed on `pay_date`.
pub fn union_dues(
    daily_due: Decimal,
    window: &AccrualWindow,
    pay_date: NaiveDate,
) -> PayrollResult<Decimal> {
    match window.prior_pay_date.or(window.baseline) {
        Some(since) => {
            let days = Decimal::from(days_between(since, pay_date));
            Ok(truncate2(checked_product("daily due", daily_due, days)?))
        }
        None => Ok(Decimal::ZERO),
    }
}

/// Service fees dated after the previous payment (or all of them if there
/// was none) and not after `pay_date`, each truncated to cents.
pub fn service_fees<'a, I>(
    fees: I,
    prior_pay_date: Option<NaiveDate>,
    pay_date: NaiveDate,
) -> PayrollResult<Decimal>
where
    I: IntoIterator<Item = &'a ServiceFeeEntry>,
{
    checked_total(
        "service fee",
        fees.into_iter()
            .filter(|fee| prior_pay_date.is_none_or(|prior| fee.date() > prior))
            .filter(|fee| fee.date() <= pay_date)
            .map(|fee| truncate2(fee.amount())),
    )
}

/// Computes a member's deductions, capped at `gross`.
///
/// Non-members and employees with no gross pay owe nothing.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{calculate_deductions, AccrualWindow};
/// use payroll_engine::models::UnionMembership;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let membership = UnionMembership::new("S1", Decimal::new(150, 2)).unwrap();
/// let window = AccrualWindow {
///     prior_pay_date: NaiveDate::from_ymd_opt(2005, 1, 7),
///     baseline: None,
/// };
/// let pay_date = NaiveDate::from_ymd_opt(2005, 1, 14).unwrap();
///
/// let deductions =
///     calculate_deductions(Some(&membership), &[], &window, pay_date, Decimal::from(100)).unwrap();
/// assert_eq!(deductions.union_dues, Decimal::new(1050, 2));
/// assert_eq!(deductions.total, Decimal::new(1050, 2));
/// ```
pub fn calculate_deductions(
    membership: Option<&UnionMembership>,
    fees: &[ServiceFeeEntry],
    window: &AccrualWindow,
    pay_date: NaiveDate,
    gross: Decimal,
) -> PayrollResult<DeductionBreakdown> {
    let Some(membership) = membership else {
        return Ok(DeductionBreakdown::default());
    };
    if gross <= Decimal::ZERO {
        return Ok(DeductionBreakdown::default());
    }

    let union_dues = union_dues(membership.daily_due, window, pay_date)?;
    let service_fees = service_fees(fees, window.prior_pay_date, pay_date)?;
    Ok(DeductionBreakdown {
        union_dues,
        service_fees,
        total: checked_total("deductions", [union_dues, service_fees])?.min(gross),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn fee(date_str: &str, amount: &str) -> ServiceFeeEntry {
        ServiceFeeEntry::new(make_date(date_str), dec(amount)).unwrap()
    }

    fn member(daily_due: &str) -> UnionMembership {
        UnionMembership::new("S1", dec(daily_due)).unwrap()
    }

    fn after(prior: &str) -> AccrualWindow {
        AccrualWindow {
            prior_pay_date: Some(make_date(prior)),
            baseline: None,
        }
    }

    #[test]
    fn test_scheduled_window_before_first_payment() {
        let window = AccrualWindow::scheduled(
            &ScheduleDescriptor::MonthlyLastBusinessDay,
            make_date("2005-01-31"),
        );
        assert_eq!(window.prior_pay_date, None);
        assert_eq!(window.baseline, Some(make_date("2004-12-31")));
    }

    #[test]
    fn test_scheduled_window_after_first_payment() {
        let window = AccrualWindow::scheduled(
            &ScheduleDescriptor::BIWEEKLY_FRIDAY,
            make_date("2005-01-28"),
        );
        assert_eq!(window.prior_pay_date, Some(make_date("2005-01-14")));
    }

    #[test]
    fn test_days_between_never_negative() {
        assert_eq!(days_between(make_date("2005-01-07"), make_date("2005-01-14")), 7);
        assert_eq!(days_between(make_date("2005-01-14"), make_date("2005-01-07")), 0);
    }

    #[test]
    fn test_union_dues_from_prior_payment() {
        let dues = union_dues(dec("1.333"), &after("2005-01-07"), make_date("2005-01-14")).unwrap();
        // 1.333 * 7 = 9.331
        assert_eq!(dues, dec("9.33"));
    }

    #[test]
    fn test_union_dues_from_baseline() {
        let window = AccrualWindow {
            prior_pay_date: None,
            baseline: Some(make_date("2004-12-31")),
        };
        // 2004-12-31 .. 2005-01-31 = 31 days
        assert_eq!(union_dues(dec("2"), &window, make_date("2005-01-31")).unwrap(), dec("62"));
    }

    #[test]
    fn test_union_dues_without_any_reference_date() {
        let window = AccrualWindow {
            prior_pay_date: None,
            baseline: None,
        };
        assert_eq!(union_dues(dec("2"), &window, make_date("2005-01-31")).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_union_dues_overflow_is_invalid_amount() {
        let result = union_dues(Decimal::MAX, &after("2005-01-07"), make_date("2005-01-14"));
        assert!(matches!(
            result,
            Err(crate::error::PayrollError::InvalidAmount { ref field, .. }) if field == "daily due"
        ));
    }

    #[test]
    fn test_service_fees_strictly_after_prior_and_not_after_pay_date() {
        let fees = vec![
            fee("2005-01-07", "5.00"),
            fee("2005-01-08", "3.009"),
            fee("2005-01-14", "2.50"),
            fee("2005-01-15", "100.00"),
        ];
        let total = service_fees(&fees, Some(make_date("2005-01-07")), make_date("2005-01-14")).unwrap();
        assert_eq!(total, dec("5.50"));
    }

    #[test]
    fn test_service_fees_without_prior_include_everything_up_to_pay_date() {
        let fees = vec![fee("2004-06-01", "1.00"), fee("2005-01-14", "2.00")];
        assert_eq!(service_fees(&fees, None, make_date("2005-01-14")).unwrap(), dec("3.00"));
    }

    #[test]
    fn test_deductions_capped_at_gross() {
        let fees = vec![fee("2005-01-10", "500.00")];
        let result = calculate_deductions(
            Some(&member("1.00")),
            &fees,
            &after("2005-01-07"),
            make_date("2005-01-14"),
            dec("120.00"),
        )
        .unwrap();
        assert_eq!(result.union_dues, dec("7.00"));
        assert_eq!(result.service_fees, dec("500.00"));
        assert_eq!(result.total, dec("120.00"));
    }

    #[test]
    fn test_no_deductions_for_non_members() {
        let result = calculate_deductions(
            None,
            &[],
            &after("2005-01-07"),
            make_date("2005-01-14"),
            dec("120.00"),
        )
        .unwrap();
        assert_eq!(result, DeductionBreakdown::default());
    }

    #[test]
    fn test_no_deductions_without_gross() {
        let fees = vec![fee("2005-01-10", "5.00")];
        let result = calculate_deductions(
            Some(&member("1.00")),
            &fees,
            &after("2005-01-07"),
            make_date("2005-01-14"),
            Decimal::ZERO,
        )
        .unwrap();
        assert_eq!(result.total, Decimal::ZERO);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn deductions_never_exceed_gross(
            gross_cents in 0i64..10_000_000,
            due_cents in 0i64..100_000,
            fee_cents in proptest::collection::vec(1i64..1_000_000, 0..6),
            days in 0u64..400,
        ) {
            let pay_date = NaiveDate::from_ymd_opt(2006, 6, 30).unwrap();
            let fees: Vec<ServiceFeeEntry> = fee_cents
                .iter()
                .enumerate()
                .map(|(i, cents)| {
                    ServiceFeeEntry::new(
                        pay_date - chrono::Days::new(i as u64),
                        Decimal::new(*cents, 2),
                    )
                    .unwrap()
                })
                .collect();
            let membership = UnionMembership::new("S1", Decimal::new(due_cents, 2)).unwrap();
            let window = AccrualWindow {
                prior_pay_date: Some(pay_date - chrono::Days::new(days)),
                baseline: None,
            };
            let gross = Decimal::new(gross_cents, 2);

            let result = calculate_deductions(Some(&membership), &fees, &window, pay_date, gross).unwrap();
            prop_assert!(result.total <= gross);
            prop_assert!(result.total >= Decimal::ZERO);
        }
    }
}
