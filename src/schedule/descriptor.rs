//! Payment schedule descriptors.
//!
//! A descriptor is written as text in one of four forms (case-insensitive):
//!
//! ```text
//! semanal <weekday 1-7>                 every week on a weekday
//! semanal <interval 1-52> <weekday 1-7> every N weeks on a weekday
//! mensal <day 1-28>                     a fixed day of every month
//! mensal $                              the last business day of every month
//! ```
//!
//! `weekly` and `monthly` are accepted as aliases for `semanal` and
//! `mensal`. Weekdays are numbered from Monday (1) to Sunday (7).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

const WEEKLY_KEYWORD: &str = "semanal";
const MONTHLY_KEYWORD: &str = "mensal";
const LAST_BUSINESS_DAY_TOKEN: &str = "$";

/// Highest accepted week interval.
pub const MAX_INTERVAL_WEEKS: u32 = 52;
/// Highest accepted fixed day of month.
pub const MAX_DAY_OF_MONTH: u32 = 28;

/// A parsed payment schedule.
///
/// The [`Display`](fmt::Display) form is the canonical string; two texts
/// describe the same schedule exactly when their canonical strings match.
///
/// # Example
///
/// ```
/// use payroll_engine::schedule::ScheduleDescriptor;
///
/// let schedule: ScheduleDescriptor = "Weekly 1 5".parse().unwrap();
/// assert_eq!(schedule, ScheduleDescriptor::Weekly { interval_weeks: 1, weekday: 5 });
/// assert_eq!(schedule.to_string(), "semanal 5");
///
/// assert!("mensal 31".parse::<ScheduleDescriptor>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ScheduleDescriptor {
    /// Every `interval_weeks` weeks on `weekday` (1 = Monday ... 7 = Sunday).
    Weekly {
        /// Number of weeks between pay dates, 1 to 52.
        interval_weeks: u32,
        /// ISO weekday number, 1 to 7.
        weekday: u32,
    },
    /// A fixed day of every month, 1 to 28.
    MonthlyDay {
        /// The day of the month.
        day: u32,
    },
    /// The last Monday-to-Friday day of every month.
    MonthlyLastBusinessDay,
}

impl ScheduleDescriptor {
    /// Default schedule for hourly employees: every Friday.
    pub const WEEKLY_FRIDAY: ScheduleDescriptor = ScheduleDescriptor::Weekly {
        interval_weeks: 1,
        weekday: 5,
    };

    /// Default schedule for commissioned employees: every other Friday.
    pub const BIWEEKLY_FRIDAY: ScheduleDescriptor = ScheduleDescriptor::Weekly {
        interval_weeks: 2,
        weekday: 5,
    };

    /// Default schedule for salaried employees: last business day of the month.
    pub const MONTHLY_LAST_BUSINESS_DAY: ScheduleDescriptor =
        ScheduleDescriptor::MonthlyLastBusinessDay;

    /// The three schedules every catalog starts with.
    pub const BUILT_INS: [ScheduleDescriptor; 3] = [
        Self::WEEKLY_FRIDAY,
        Self::BIWEEKLY_FRIDAY,
        Self::MONTHLY_LAST_BUSINESS_DAY,
    ];

    /// Parses descriptor text.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::InvalidScheduleSyntax`] when the text does not
    /// match the grammar or a number is out of range.
    pub fn parse(text: &str) -> PayrollResult<Self> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered.split_whitespace().collect();
        let invalid = |message: &str| PayrollError::InvalidScheduleSyntax {
            text: text.to_string(),
            message: message.to_string(),
        };

        match tokens.as_slice() {
            [keyword, rest @ ..] if is_weekly_keyword(keyword) => match rest {
                [weekday] => Ok(ScheduleDescriptor::Weekly {
                    interval_weeks: 1,
                    weekday: parse_weekday(weekday).ok_or_else(|| {
                        invalid("weekday must be between 1 and 7")
                    })?,
                }),
                [interval, weekday] => {
                    let interval_weeks = parse_in_range(interval, 1, MAX_INTERVAL_WEEKS)
                        .ok_or_else(|| invalid("interval must be between 1 and 52"))?;
                    let weekday = parse_weekday(weekday)
                        .ok_or_else(|| invalid("weekday must be between 1 and 7"))?;
                    Ok(ScheduleDescriptor::Weekly {
                        interval_weeks,
                        weekday,
                    })
                }
                _ => Err(invalid("expected 'semanal <weekday>' or 'semanal <interval> <weekday>'")),
            },
            [keyword, rest @ ..] if is_monthly_keyword(keyword) => match rest {
                [token] if *token == LAST_BUSINESS_DAY_TOKEN => {
                    Ok(ScheduleDescriptor::MonthlyLastBusinessDay)
                }
                [day] => {
                    let day = parse_in_range(day, 1, MAX_DAY_OF_MONTH)
                        .ok_or_else(|| invalid("day must be between 1 and 28"))?;
                    Ok(ScheduleDescriptor::MonthlyDay { day })
                }
                _ => Err(invalid("expected 'mensal <day>' or 'mensal $'")),
            },
            _ => Err(invalid("unknown schedule form")),
        }
    }

    /// Returns true for the weekly family of schedules.
    pub fn is_weekly(&self) -> bool {
        matches!(self, ScheduleDescriptor::Weekly { .. })
    }

    /// Returns the week interval for weekly schedules.
    pub fn interval_weeks(&self) -> Option<u32> {
        match self {
            ScheduleDescriptor::Weekly { interval_weeks, .. } => Some(*interval_weeks),
            _ => None,
        }
    }
}

fn is_weekly_keyword(token: &str) -> bool {
    token == WEEKLY_KEYWORD || token == "weekly"
}

fn is_monthly_keyword(token: &str) -> bool {
    token == MONTHLY_KEYWORD || token == "monthly"
}

fn parse_in_range(token: &str, min: u32, max: u32) -> Option<u32> {
    // u32::from_str also takes a leading '+'
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token
        .parse::<u32>()
        .ok()
        .filter(|value| (min..=max).contains(value))
}

fn parse_weekday(token: &str) -> Option<u32> {
    parse_in_range(token, 1, 7)
}

impl fmt::Display for ScheduleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleDescriptor::Weekly {
                interval_weeks: 1,
                weekday,
            } => write!(f, "{} {}", WEEKLY_KEYWORD, weekday),
            ScheduleDescriptor::Weekly {
                interval_weeks,
                weekday,
            } => write!(f, "{} {} {}", WEEKLY_KEYWORD, interval_weeks, weekday),
            ScheduleDescriptor::MonthlyDay { day } => write!(f, "{} {}", MONTHLY_KEYWORD, day),
            ScheduleDescriptor::MonthlyLastBusinessDay => {
                write!(f, "{} {}", MONTHLY_KEYWORD, LAST_BUSINESS_DAY_TOKEN)
            }
        }
    }
}

impl FromStr for ScheduleDescriptor {
    type Err = PayrollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ScheduleDescriptor {
    type Error = PayrollError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ScheduleDescriptor> for String {
    fn from(value: ScheduleDescriptor) -> Self {
        value.to_string()
    }
}
