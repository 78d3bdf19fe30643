//! Calendar arithmetic for payment schedules.
//!
//! This module answers the date questions a payroll run asks of a schedule:
//! whether a date is a pay date, where the pay period starts, when the
//! previous scheduled payment fell, and which pay date a given work day
//! belongs to. Weekly schedules count whole weeks from [`EPOCH`].

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

use crate::models::PayPeriod;
use crate::schedule::ScheduleDescriptor;

/// The first day the system reasons about. Weekly schedules are anchored here.
pub const EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(2005, 1, 1) {
    Some(date) => date,
    None => panic!("invalid payroll epoch"),
};

/// Whole weeks between [`EPOCH`] and `date`, or `None` before the epoch.
pub fn weeks_since_epoch(date: NaiveDate) -> Option<i64> {
    let days = date.signed_duration_since(EPOCH).num_days();
    (days >= 0).then_some(days / 7)
}

/// Returns true if the day falls on Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn last_day_of_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

fn first_day_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)?.checked_add_months(Months::new(1))
}

/// The last Monday-to-Friday day of the month containing `date`.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::last_business_day_of_month;
/// use chrono::NaiveDate;
///
/// // 2005-04-30 is a Saturday
/// let april = NaiveDate::from_ymd_opt(2005, 4, 12).unwrap();
/// assert_eq!(
///     last_business_day_of_month(april),
///     NaiveDate::from_ymd_opt(2005, 4, 29)
/// );
/// ```
pub fn last_business_day_of_month(date: NaiveDate) -> Option<NaiveDate> {
    let mut day = last_day_of_month(date)?;
    while is_weekend(day) {
        day = day.pred_opt()?;
    }
    Some(day)
}

/// Decides whether `date` is a pay date under `schedule`.
///
/// Weekly schedules fire on their weekday once at least `interval - 1`
/// whole weeks have passed since the epoch, and then every `interval`
/// weeks. Monthly schedules fire once per month.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::is_pay_date;
/// use payroll_engine::schedule::ScheduleDescriptor;
/// use chrono::NaiveDate;
///
/// let biweekly = ScheduleDescriptor::BIWEEKLY_FRIDAY;
/// assert!(!is_pay_date(&biweekly, NaiveDate::from_ymd_opt(2005, 1, 7).unwrap()));
/// assert!(is_pay_date(&biweekly, NaiveDate::from_ymd_opt(2005, 1, 14).unwrap()));
/// assert!(!is_pay_date(&biweekly, NaiveDate::from_ymd_opt(2005, 1, 21).unwrap()));
/// ```
pub fn is_pay_date(schedule: &ScheduleDescriptor, date: NaiveDate) -> bool {
    match *schedule {
        ScheduleDescriptor::Weekly {
            interval_weeks,
            weekday,
        } => {
            if date.weekday().number_from_monday() != weekday {
                return false;
            }
            let Some(weeks) = weeks_since_epoch(date) else {
                return false;
            };
            let interval = i64::from(interval_weeks);
            weeks >= interval - 1 && (interval == 1 || weeks % interval == interval - 1)
        }
        ScheduleDescriptor::MonthlyDay { day } => date.day() == day,
        ScheduleDescriptor::MonthlyLastBusinessDay => {
            last_business_day_of_month(date) == Some(date)
        }
    }
}

/// First day of the pay period ending on `pay_date`.
///
/// Weekly: `pay_date - (7 × interval - 1)` days. Monthly: the first day of
/// the pay date's month.
pub fn period_start(schedule: &ScheduleDescriptor, pay_date: NaiveDate) -> NaiveDate {
    let start = match *schedule {
        ScheduleDescriptor::Weekly { interval_weeks, .. } => {
            pay_date.checked_sub_days(Days::new(7 * u64::from(interval_weeks) - 1))
        }
        ScheduleDescriptor::MonthlyDay { .. } | ScheduleDescriptor::MonthlyLastBusinessDay => {
            pay_date.with_day(1)
        }
    };
    start.unwrap_or(NaiveDate::MIN)
}

/// The inclusive pay period `[period_start, pay_date]`.
pub fn pay_period(schedule: &ScheduleDescriptor, pay_date: NaiveDate) -> PayPeriod {
    PayPeriod::new(period_start(schedule, pay_date), pay_date)
}

/// The scheduled pay date before `pay_date`, or `None` if it would fall
/// before the epoch.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::prior_scheduled_date;
/// use payroll_engine::schedule::ScheduleDescriptor;
/// use chrono::NaiveDate;
///
/// let monthly = ScheduleDescriptor::MonthlyLastBusinessDay;
/// let feb = NaiveDate::from_ymd_opt(2005, 2, 28).unwrap();
/// assert_eq!(prior_scheduled_date(&monthly, feb), NaiveDate::from_ymd_opt(2005, 1, 31));
///
/// let jan = NaiveDate::from_ymd_opt(2005, 1, 31).unwrap();
/// assert_eq!(prior_scheduled_date(&monthly, jan), None);
/// ```
pub fn prior_scheduled_date(schedule: &ScheduleDescriptor, pay_date: NaiveDate) -> Option<NaiveDate> {
    let prior = match *schedule {
        ScheduleDescriptor::Weekly { interval_weeks, .. } => {
            pay_date.checked_sub_days(Days::new(7 * u64::from(interval_weeks)))
        }
        ScheduleDescriptor::MonthlyDay { day } => pay_date
            .with_day(1)?
            .checked_sub_months(Months::new(1))?
            .with_day(day),
        ScheduleDescriptor::MonthlyLastBusinessDay => {
            last_business_day_of_month(pay_date.with_day(1)?.pred_opt()?)
        }
    }?;
    (prior >= EPOCH).then_some(prior)
}

/// The first pay date on or after `event_date`.
///
/// Used to map an hourly employee's time card onto the payment that covers
/// it. Weekly schedules scan at most `7 × interval + 1` days; monthly
/// schedules roll to the next month when this month's pay date has passed.
/// Returns `None` when no pay date is reachable (before the epoch for
/// weekly schedules).
pub fn projected_pay_date(schedule: &ScheduleDescriptor, event_date: NaiveDate) -> Option<NaiveDate> {
    match *schedule {
        ScheduleDescriptor::Weekly { interval_weeks, .. } => {
            let horizon = 7 * interval_weeks as usize + 1;
            event_date
                .iter_days()
                .take(horizon)
                .find(|day| is_pay_date(schedule, *day))
        }
        ScheduleDescriptor::MonthlyDay { day } => {
            let candidate = event_date.with_day(day)?;
            if candidate < event_date {
                first_day_of_next_month(event_date)?.with_day(day)
            } else {
                Some(candidate)
            }
        }
        ScheduleDescriptor::MonthlyLastBusinessDay => {
            let candidate = last_business_day_of_month(event_date)?;
            if candidate < event_date {
                last_business_day_of_month(first_day_of_next_month(event_date)?)
            } else {
                Some(candidate)
            }
        }
    }
}
