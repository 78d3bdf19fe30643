//! Daily overtime split for hourly employees.
//!
//! Hours from all time cards on the same calendar day are added together,
//! then split into ordinary hours (up to the daily threshold) and overtime
//! hours (the excess).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::checked_total;
use crate::error::PayrollResult;
use crate::models::{PayPeriod, TimeCard};

/// Ordinary hours allowed per calendar day before overtime starts.
pub const DAILY_OVERTIME_THRESHOLD: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Ordinary and overtime hours for a day or a whole period.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{split_daily_hours, DAILY_OVERTIME_THRESHOLD};
/// use rust_decimal::Decimal;
///
/// let split = split_daily_hours(Decimal::from(10), DAILY_OVERTIME_THRESHOLD);
/// assert_eq!(split.ordinary_hours, Decimal::from(8));
/// assert_eq!(split.overtime_hours, Decimal::from(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HoursSplit {
    /// Hours up to the threshold.
    pub ordinary_hours: Decimal,
    /// Hours above the threshold.
    pub overtime_hours: Decimal,
}

/// Splits one day's hours at `threshold`.
pub fn split_daily_hours(worked_hours: Decimal, threshold: Decimal) -> HoursSplit {
    HoursSplit {
        ordinary_hours: worked_hours.min(threshold),
        overtime_hours: (worked_hours - threshold).max(Decimal::ZERO),
    }
}

/// Sums ordinary and overtime hours over the time cards inside `period`.
///
/// Cards sharing a date are combined before the per-day split, so two
/// 5-hour cards on one day yield 8 ordinary and 2 overtime hours.
pub fn summarize_hours<'a, I>(time_cards: I, period: &PayPeriod) -> PayrollResult<HoursSplit>
where
    I: IntoIterator<Item = &'a TimeCard>,
{
    let mut hours_per_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for card in time_cards {
        if period.contains_date(card.date()) {
            let day = hours_per_day.entry(card.date()).or_default();
            *day = checked_total("hours", [*day, card.hours()])?;
        }
    }

    let days: Vec<HoursSplit> = hours_per_day
        .values()
        .map(|hours| split_daily_hours(*hours, DAILY_OVERTIME_THRESHOLD))
        .collect();
    Ok(HoursSplit {
        ordinary_hours: checked_total("hours", days.iter().map(|day| day.ordinary_hours))?,
        overtime_hours: checked_total("hours", days.iter().map(|day| day.overtime_hours))?,
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

    fn card(date_str: &str, hours: &str) -> TimeCard {
        TimeCard::new(make_date(date_str), dec(hours)).unwrap()
    }

    fn week_of_jan_2005() -> PayPeriod {
        // Saturday 2005-01-01 .. Friday 2005-01-07
        PayPeriod::new(make_date("2005-01-01"), make_date("2005-01-07"))
    }

    #[test]
    fn test_exactly_threshold_no_overtime() {
        let split = split_daily_hours(dec("8.0"), DAILY_OVERTIME_THRESHOLD);
        assert_eq!(split.ordinary_hours, dec("8"));
        assert_eq!(split.overtime_hours, Decimal::ZERO);
    }

    #[test]
    fn test_under_threshold_no_overtime() {
        let split = split_daily_hours(dec("6.0"), DAILY_OVERTIME_THRESHOLD);
        assert_eq!(split.ordinary_hours, dec("6"));
        assert_eq!(split.overtime_hours, Decimal::ZERO);
    }

    #[test]
    fn test_fractional_overtime() {
        let split = split_daily_hours(dec("11.25"), DAILY_OVERTIME_THRESHOLD);
        assert_eq!(split.ordinary_hours, dec("8"));
        assert_eq!(split.overtime_hours, dec("3.25"));
    }

    #[test]
    fn test_cap_applies_per_day_not_per_period() {
        let cards = vec![card("2005-01-03", "9"), card("2005-01-04", "9")];
        let split = summarize_hours(&cards, &week_of_jan_2005()).unwrap();
        assert_eq!(split.ordinary_hours, dec("16"));
        assert_eq!(split.overtime_hours, dec("2"));
    }

    #[test]
    fn test_same_day_cards_combined_before_split() {
        let cards = vec![card("2005-01-03", "5"), card("2005-01-03", "5")];
        let split = summarize_hours(&cards, &week_of_jan_2005()).unwrap();
        assert_eq!(split.ordinary_hours, dec("8"));
        assert_eq!(split.overtime_hours, dec("2"));
    }

    #[test]
    fn test_cards_outside_period_ignored() {
        let cards = vec![
            card("2004-12-31", "8"),
            card("2005-01-07", "4"),
            card("2005-01-08", "8"),
        ];
        let split = summarize_hours(&cards, &week_of_jan_2005()).unwrap();
        assert_eq!(split.ordinary_hours, dec("4"));
        assert_eq!(split.overtime_hours, Decimal::ZERO);
    }

    #[test]
    fn test_no_cards() {
        let split = summarize_hours(&Vec::<TimeCard>::new(), &week_of_jan_2005()).unwrap();
        assert_eq!(split, HoursSplit::default());
    }

    #[test]
    fn test_hours_beyond_decimal_range_rejected() {
        let cards = vec![
            TimeCard::new(make_date("2005-01-03"), Decimal::MAX).unwrap(),
            card("2005-01-03", "1"),
        ];
        let result = summarize_hours(&cards, &week_of_jan_2005());
        assert!(matches!(result, Err(crate::error::PayrollError::InvalidAmount { .. })));
    }

    #[test]
    fn test_default_threshold_constant() {
        assert_eq!(DAILY_OVERTIME_THRESHOLD, dec("8"));
    }
}
