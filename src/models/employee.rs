//! Employee model and related types.
//!
//! This module defines the [`Employee`] struct together with the
//! category-specific [`Compensation`], the optional [`UnionMembership`] and
//! the [`PaymentMethod`] used when the employee is paid.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{SaleRecord, ServiceFeeEntry, TimeCard};
use crate::error::{PayrollError, PayrollResult};
use crate::schedule::ScheduleDescriptor;

/// The employee category, which decides how gross pay is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Paid per hour worked, with overtime above 8 hours a day.
    Hourly,
    /// Paid a fixed monthly salary.
    Salaried,
    /// Paid a fixed salary plus a commission on sales.
    Commissioned,
}

impl Category {
    /// The schedule assigned to new employees of this category.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::Category;
    ///
    /// assert_eq!(Category::Hourly.default_schedule().to_string(), "semanal 5");
    /// assert_eq!(Category::Salaried.default_schedule().to_string(), "mensal $");
    /// assert_eq!(Category::Commissioned.default_schedule().to_string(), "semanal 2 5");
    /// ```
    pub fn default_schedule(&self) -> ScheduleDescriptor {
        match self {
            Category::Hourly => ScheduleDescriptor::WEEKLY_FRIDAY,
            Category::Salaried => ScheduleDescriptor::MONTHLY_LAST_BUSINESS_DAY,
            Category::Commissioned => ScheduleDescriptor::BIWEEKLY_FRIDAY,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Hourly => write!(f, "hourly"),
            Category::Salaried => write!(f, "salaried"),
            Category::Commissioned => write!(f, "commissioned"),
        }
    }
}

/// Category-specific pay terms.
///
/// The commission rate only exists on the commissioned variant, so an
/// employee can never carry a commission rate under another category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum Compensation {
    /// Hourly pay.
    Hourly {
        /// Pay per ordinary hour.
        hourly_rate: Decimal,
    },
    /// Monthly salary.
    Salaried {
        /// Salary per month.
        monthly_salary: Decimal,
    },
    /// Monthly salary plus commission.
    Commissioned {
        /// Salary per month, prorated to the pay interval.
        monthly_salary: Decimal,
        /// Fraction of period sales paid as commission.
        commission_rate: Decimal,
    },
}

impl Compensation {
    /// Builds hourly terms, rejecting a negative rate.
    pub fn hourly(hourly_rate: Decimal) -> PayrollResult<Self> {
        Ok(Compensation::Hourly {
            hourly_rate: require_non_negative("hourly rate", hourly_rate)?,
        })
    }

    /// Builds salaried terms, rejecting a negative salary.
    pub fn salaried(monthly_salary: Decimal) -> PayrollResult<Self> {
        Ok(Compensation::Salaried {
            monthly_salary: require_non_negative("salary", monthly_salary)?,
        })
    }

    /// Builds commissioned terms, rejecting negative values.
    pub fn commissioned(monthly_salary: Decimal, commission_rate: Decimal) -> PayrollResult<Self> {
        Ok(Compensation::Commissioned {
            monthly_salary: require_non_negative("salary", monthly_salary)?,
            commission_rate: require_non_negative("commission rate", commission_rate)?,
        })
    }

    /// The category these terms belong to.
    pub fn category(&self) -> Category {
        match self {
            Compensation::Hourly { .. } => Category::Hourly,
            Compensation::Salaried { .. } => Category::Salaried,
            Compensation::Commissioned { .. } => Category::Commissioned,
        }
    }

    /// The hourly rate or monthly salary, depending on category.
    pub fn rate(&self) -> Decimal {
        match self {
            Compensation::Hourly { hourly_rate } => *hourly_rate,
            Compensation::Salaried { monthly_salary }
            | Compensation::Commissioned { monthly_salary, .. } => *monthly_salary,
        }
    }

    /// The commission rate, present only for commissioned employees.
    pub fn commission_rate(&self) -> Option<Decimal> {
        match self {
            Compensation::Commissioned {
                commission_rate, ..
            } => Some(*commission_rate),
            _ => None,
        }
    }
}

fn require_non_negative(field: &str, value: Decimal) -> PayrollResult<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(PayrollError::InvalidAmount {
            field: field.to_string(),
            message: "must not be negative".to_string(),
        });
    }
    Ok(value)
}

/// Union membership details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnionMembership {
    /// The member's union id, unique across the directory.
    pub union_id: String,
    /// Dues charged for every day since the last payment.
    pub daily_due: Decimal,
}

impl UnionMembership {
    /// Creates a membership, rejecting negative dues.
    pub fn new(union_id: impl Into<String>, daily_due: Decimal) -> PayrollResult<Self> {
        Ok(Self {
            union_id: union_id.into(),
            daily_due: require_non_negative("daily due", daily_due)?,
        })
    }
}

/// How an employee receives their pay.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Collected in person.
    #[default]
    InHand,
    /// Mailed to the employee's address.
    Mail,
    /// Deposited in a bank account.
    Bank {
        /// Bank name.
        bank: String,
        /// Branch identifier.
        agency: String,
        /// Checking account number.
        account: String,
    },
}

impl PaymentMethod {
    /// The description printed next to a payroll report row.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::PaymentMethod;
    ///
    /// let bank = PaymentMethod::Bank {
    ///     bank: "Banco do Brasil".to_string(),
    ///     agency: "1234".to_string(),
    ///     account: "56789-0".to_string(),
    /// };
    /// assert_eq!(bank.describe("Rua A"), "Banco do Brasil, Ag. 1234 CC 56789-0");
    /// assert_eq!(PaymentMethod::Mail.describe("Rua A"), "Correios, Rua A");
    /// assert_eq!(PaymentMethod::InHand.describe("Rua A"), "Em maos");
    /// ```
    pub fn describe(&self, address: &str) -> String {
        match self {
            PaymentMethod::InHand => "Em maos".to_string(),
            PaymentMethod::Mail => format!("Correios, {}", address),
            PaymentMethod::Bank {
                bank,
                agency,
                account,
            } => format!("{}, Ag. {} CC {}", bank, agency, account),
        }
    }
}

/// An employee in the directory.
///
/// Ledger entries (time cards, sales, service fees) are owned by the
/// employee and only ever appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Stable id, e.g. `EMP3`.
    pub id: String,
    /// Display name; reports sort by it case-insensitively.
    pub name: String,
    /// Postal address.
    pub address: String,
    /// Category-specific pay terms.
    pub compensation: Compensation,
    /// Union membership, if any.
    #[serde(default)]
    pub union: Option<UnionMembership>,
    /// How pay is delivered.
    #[serde(default)]
    pub payment_method: PaymentMethod,
    /// When the employee is paid.
    pub schedule: ScheduleDescriptor,
    /// Hours worked (hourly employees).
    #[serde(default)]
    pub time_cards: Vec<TimeCard>,
    /// Sales made (commissioned employees).
    #[serde(default)]
    pub sales: Vec<SaleRecord>,
    /// Union service fees charged.
    #[serde(default)]
    pub service_fees: Vec<ServiceFeeEntry>,
}

impl Employee {
    /// Creates an employee with the category's default schedule, paid in
    /// hand and outside the union.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        compensation: Compensation,
    ) -> Self {
        let schedule = compensation.category().default_schedule();
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            compensation,
            union: None,
            payment_method: PaymentMethod::InHand,
            schedule,
            time_cards: Vec::new(),
            sales: Vec::new(),
            service_fees: Vec::new(),
        }
    }

    /// The employee's category.
    pub fn category(&self) -> Category {
        self.compensation.category()
    }

    /// Returns true if the employee belongs to the union.
    pub fn is_union_member(&self) -> bool {
        self.union.is_some()
    }

    /// The employee's union id, if a member.
    pub fn union_id(&self) -> Option<&str> {
        self.union.as_ref().map(|m| m.union_id.as_str())
    }

    /// The report description of how this employee is paid.
    pub fn payment_description(&self) -> String {
        self.payment_method.describe(&self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_commissioned() -> Employee {
        Employee::new(
            "EMP1",
            "Ana",
            "Rua das Flores, 10",
            Compensation::commissioned(dec("1000.00"), dec("0.10")).unwrap(),
        )
    }

    #[test]
    fn test_new_employee_defaults() {
        let employee = create_commissioned();
        assert_eq!(employee.category(), Category::Commissioned);
        assert_eq!(employee.schedule, ScheduleDescriptor::BIWEEKLY_FRIDAY);
        assert_eq!(employee.payment_method, PaymentMethod::InHand);
        assert!(!employee.is_union_member());
        assert!(employee.time_cards.is_empty());
    }

    #[test]
    fn test_commission_rate_only_for_commissioned() {
        let hourly = Compensation::hourly(dec("10")).unwrap();
        let salaried = Compensation::salaried(dec("2000")).unwrap();
        let commissioned = Compensation::commissioned(dec("1000"), dec("0.1")).unwrap();

        assert_eq!(hourly.commission_rate(), None);
        assert_eq!(salaried.commission_rate(), None);
        assert_eq!(commissioned.commission_rate(), Some(dec("0.1")));
    }

    #[test]
    fn test_rate_depends_on_category() {
        assert_eq!(Compensation::hourly(dec("12.5")).unwrap().rate(), dec("12.5"));
        assert_eq!(
            Compensation::commissioned(dec("900"), dec("0.1")).unwrap().rate(),
            dec("900")
        );
    }

    #[test]
    fn test_negative_values_rejected() {
        assert!(Compensation::hourly(dec("-1")).is_err());
        assert!(Compensation::salaried(dec("-0.01")).is_err());
        assert!(Compensation::commissioned(dec("1000"), dec("-0.1")).is_err());
        assert!(UnionMembership::new("S1", dec("-2")).is_err());
    }

    #[test]
    fn test_zero_values_accepted() {
        assert!(Compensation::salaried(Decimal::ZERO).is_ok());
        assert!(UnionMembership::new("S1", Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_union_id_accessor() {
        let mut employee = create_commissioned();
        employee.union = Some(UnionMembership::new("S-7", dec("1.50")).unwrap());
        assert!(employee.is_union_member());
        assert_eq!(employee.union_id(), Some("S-7"));
    }

    #[test]
    fn test_payment_description_uses_address_for_mail() {
        let mut employee = create_commissioned();
        employee.payment_method = PaymentMethod::Mail;
        assert_eq!(employee.payment_description(), "Correios, Rua das Flores, 10");
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut employee = create_commissioned();
        employee.union = Some(UnionMembership::new("S-1", dec("2.00")).unwrap());
        employee.payment_method = PaymentMethod::Bank {
            bank: "Caixa".to_string(),
            agency: "001".to_string(),
            account: "123-4".to_string(),
        };

        let json = serde_json::to_string(&employee).unwrap();
        assert!(json.contains("\"category\":\"commissioned\""));
        assert!(json.contains("\"schedule\":\"semanal 2 5\""));
        assert!(json.contains("\"method\":\"bank\""));

        let back: Employee = serde_json::from_str(&json).unwrap();
        assert_eq!(back, employee);
    }

    #[test]
    fn test_category_display() {
        assert_eq!(Category::Hourly.to_string(), "hourly");
        assert_eq!(Category::Commissioned.to_string(), "commissioned");
    }
}
