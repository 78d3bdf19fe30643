//! The payroll engine facade.
//!
//! [`PayrollSystem`] owns the live state through its [`TransactionLog`].
//! Every mutating command runs inside [`TransactionLog::execute`], so it is
//! atomic and undoable. Queries read the live state directly.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::calculation::{HoursSplit, calculate_payroll, checked_total, summarize_hours};
use crate::config::{ConfigLoader, PayrollConfig};
use crate::error::{PayrollError, PayrollResult};
use crate::models::{
    Category, Compensation, Employee, PayPeriod, PaymentMethod, PayrollRun, SaleRecord,
    ServiceFeeEntry, TimeCard, UnionMembership,
};
use crate::report::render_report;
use crate::storage::{self, PersistedState};
use crate::transaction::{PayrollState, ResetOutcome, TransactionLog};

/// Target of [`PayrollSystem::change_category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewCategory {
    /// Become hourly at the given rate.
    Hourly {
        /// Pay per ordinary hour.
        hourly_rate: Decimal,
    },
    /// Become salaried, keeping the current rate as the monthly salary.
    Salaried,
    /// Become commissioned, keeping the current rate as the monthly salary.
    Commissioned {
        /// Fraction of period sales paid as commission.
        commission_rate: Decimal,
    },
}

/// A single payroll engine instance.
///
/// # Example
///
/// ```
/// use payroll_engine::config::PayrollConfig;
/// use payroll_engine::models::Compensation;
/// use payroll_engine::system::PayrollSystem;
/// use rust_decimal::Decimal;
///
/// let dir = tempfile::tempdir().unwrap();
/// let mut system = PayrollSystem::new(PayrollConfig::with_storage_path(dir.path().join("state.json")));
///
/// let id = system
///     .hire("Ana", "Rua 1", Compensation::salaried(Decimal::from(2000)).unwrap())
///     .unwrap();
/// assert_eq!(id, "EMP1");
///
/// system.undo().unwrap();
/// assert_eq!(system.employee_count(), 0);
/// ```
#[derive(Debug)]
pub struct PayrollSystem {
    config: PayrollConfig,
    log: TransactionLog,
}

impl PayrollSystem {
    /// Starts an engine, loading persisted state when configured to.
    ///
    /// A missing state file starts empty. An unreadable or corrupt one is
    /// logged and also starts empty.
    pub fn new(config: PayrollConfig) -> Self {
        let state = if config.load_on_start {
            Self::load_state(&config.storage_path)
        } else {
            PayrollState::new()
        };
        info!(
            storage_path = %config.storage_path.display(),
            employees = state.directory.len(),
            "Payroll system started"
        );
        Self {
            config,
            log: TransactionLog::with_state(state),
        }
    }

    /// Loads the configuration file at `config_path` and starts an engine.
    pub fn open<P: AsRef<Path>>(config_path: P) -> PayrollResult<Self> {
        let config = ConfigLoader::load(config_path)?.into_config();
        Ok(Self::new(config))
    }

    fn load_state(path: &Path) -> PayrollState {
        match storage::load(path).and_then(|loaded| loaded.map(PersistedState::into_state).transpose()) {
            Ok(Some(state)) => state,
            Ok(None) => PayrollState::new(),
            Err(error) => {
                warn!(path = %path.display(), error = %error, "Could not load payroll state; starting empty");
                PayrollState::new()
            }
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// The live state.
    pub fn state(&self) -> &PayrollState {
        self.log.state()
    }

    /// Returns true until [`shutdown`](Self::shutdown).
    pub fn is_active(&self) -> bool {
        self.log.is_active()
    }

    /// Hires an employee and returns the new id.
    ///
    /// The employee starts on the category's default schedule, paid in hand
    /// and outside the union.
    pub fn hire(&mut self, name: &str, address: &str, compensation: Compensation) -> PayrollResult<String> {
        self.log.execute("hire", |state| {
            let id = state.directory.allocate_id();
            state
                .directory
                .insert(Employee::new(id.clone(), name, address, compensation));
            Ok(id)
        })
    }

    /// Removes an employee.
    pub fn dismiss(&mut self, id: &str) -> PayrollResult<()> {
        self.log
            .execute("dismiss", |state| state.directory.remove(id).map(|_| ()))
    }

    /// Records hours worked by an hourly employee.
    pub fn post_timecard(&mut self, id: &str, date: NaiveDate, hours: Decimal) -> PayrollResult<()> {
        self.log.execute("post_timecard", |state| {
            let employee = state.directory.get_mut(id)?;
            require_category(employee, Category::Hourly)?;
            employee.time_cards.push(TimeCard::new(date, hours)?);
            Ok(())
        })
    }

    /// Records a sale made by a commissioned employee.
    pub fn post_sale(&mut self, id: &str, date: NaiveDate, amount: Decimal) -> PayrollResult<()> {
        self.log.execute("post_sale", |state| {
            let employee = state.directory.get_mut(id)?;
            require_category(employee, Category::Commissioned)?;
            employee.sales.push(SaleRecord::new(date, amount)?);
            Ok(())
        })
    }

    /// Charges a union service fee to the member holding `union_id`.
    pub fn post_service_fee(&mut self, union_id: &str, date: NaiveDate, amount: Decimal) -> PayrollResult<()> {
        self.log.execute("post_service_fee", |state| {
            let fee = ServiceFeeEntry::new(date, amount)?;
            state
                .directory
                .find_union_member_mut(union_id)?
                .service_fees
                .push(fee);
            Ok(())
        })
    }

    /// Renames an employee.
    pub fn set_name(&mut self, id: &str, name: &str) -> PayrollResult<()> {
        self.log.execute("set_name", |state| {
            state.directory.get_mut(id)?.name = name.to_string();
            Ok(())
        })
    }

    /// Changes an employee's address.
    pub fn set_address(&mut self, id: &str, address: &str) -> PayrollResult<()> {
        self.log.execute("set_address", |state| {
            state.directory.get_mut(id)?.address = address.to_string();
            Ok(())
        })
    }

    /// Sets the hourly rate or monthly salary, depending on category.
    pub fn set_rate(&mut self, id: &str, rate: Decimal) -> PayrollResult<()> {
        self.log.execute("set_rate", |state| {
            let employee = state.directory.get_mut(id)?;
            employee.compensation = match employee.compensation {
                Compensation::Hourly { .. } => Compensation::hourly(rate)?,
                Compensation::Salaried { .. } => Compensation::salaried(rate)?,
                Compensation::Commissioned {
                    commission_rate, ..
                } => Compensation::commissioned(rate, commission_rate)?,
            };
            Ok(())
        })
    }

    /// Sets a commissioned employee's commission rate.
    pub fn set_commission_rate(&mut self, id: &str, commission_rate: Decimal) -> PayrollResult<()> {
        self.log.execute("set_commission_rate", |state| {
            let employee = state.directory.get_mut(id)?;
            require_category(employee, Category::Commissioned)?;
            employee.compensation =
                Compensation::commissioned(employee.compensation.rate(), commission_rate)?;
            Ok(())
        })
    }

    /// Moves an employee to another category.
    ///
    /// The commission rate only survives on the commissioned variant, and
    /// the schedule resets to the new category's default.
    pub fn change_category(&mut self, id: &str, category: NewCategory) -> PayrollResult<()> {
        self.log.execute("change_category", |state| {
            let employee = state.directory.get_mut(id)?;
            let current_rate = employee.compensation.rate();
            employee.compensation = match category {
                NewCategory::Hourly { hourly_rate } => Compensation::hourly(hourly_rate)?,
                NewCategory::Salaried => Compensation::salaried(current_rate)?,
                NewCategory::Commissioned { commission_rate } => {
                    Compensation::commissioned(current_rate, commission_rate)?
                }
            };
            employee.schedule = employee.category().default_schedule();
            Ok(())
        })
    }

    /// Joins or leaves the union.
    ///
    /// `Some((union_id, daily_due))` makes the employee a member; the union
    /// id must not be held by anyone else. `None` ends membership.
    pub fn set_union_membership(&mut self, id: &str, membership: Option<(&str, Decimal)>) -> PayrollResult<()> {
        self.log.execute("set_union_membership", |state| {
            let union = match membership {
                Some((union_id, daily_due)) => {
                    state.directory.ensure_union_id_available(union_id, id)?;
                    Some(UnionMembership::new(union_id, daily_due)?)
                }
                None => None,
            };
            state.directory.get_mut(id)?.union = union;
            Ok(())
        })
    }

    /// Changes how an employee is paid.
    pub fn set_payment_method(&mut self, id: &str, method: PaymentMethod) -> PayrollResult<()> {
        self.log.execute("set_payment_method", |state| {
            state.directory.get_mut(id)?.payment_method = method;
            Ok(())
        })
    }

    /// Assigns a registered schedule to an employee.
    pub fn set_schedule(&mut self, id: &str, schedule: &str) -> PayrollResult<()> {
        self.log.execute("set_schedule", |state| {
            let descriptor = state.catalog.lookup(schedule)?;
            state.directory.get_mut(id)?.schedule = descriptor;
            Ok(())
        })
    }

    /// Registers a custom schedule and returns its canonical form.
    pub fn register_schedule(&mut self, schedule: &str) -> PayrollResult<String> {
        self.log
            .execute("register_schedule", |state| state.catalog.register(schedule))
    }

    /// Runs payroll for `pay_date` and writes the report to `output_path`.
    ///
    /// The run does not change any employee, but it is recorded in the undo
    /// history like every other command. A run whose amounts leave the
    /// decimal range fails before anything is written.
    pub fn run_payroll(&mut self, pay_date: NaiveDate, output_path: &Path) -> PayrollResult<PayrollRun> {
        self.log.execute("run_payroll", |state| {
            let run = calculate_payroll(&state.directory, pay_date)?;
            let report = render_report(&run)?;
            fs::write(output_path, report).map_err(|e| PayrollError::Storage {
                path: output_path.display().to_string(),
                message: e.to_string(),
            })?;
            info!(
                run_id = %run.run_id,
                output = %output_path.display(),
                "Payroll report written"
            );
            Ok(run)
        })
    }

    /// Reverts the most recent command.
    pub fn undo(&mut self) -> PayrollResult<()> {
        self.log.undo()
    }

    /// Re-applies the most recently undone command.
    pub fn redo(&mut self) -> PayrollResult<()> {
        self.log.redo()
    }

    /// Saves the directory and custom schedules, then closes the system.
    ///
    /// The system closes even if saving fails; the save error is logged and
    /// returned.
    pub fn shutdown(&mut self) -> PayrollResult<()> {
        let persisted = PersistedState::from_state(self.log.state());
        let saved = storage::save(&self.config.storage_path, &persisted);
        if let Err(error) = &saved {
            warn!(error = %error, "Failed to persist payroll state during shutdown");
        }
        self.log.close();
        info!(employees = persisted.employees.len(), "Payroll system shut down");
        saved
    }

    /// Clears every employee and custom schedule and deletes the saved state.
    ///
    /// After a shutdown this reopens the system with no history. Otherwise
    /// the reset itself can be undone.
    pub fn reset(&mut self) -> ResetOutcome {
        let outcome = self.log.reset();
        if let Err(error) = storage::wipe(&self.config.storage_path) {
            warn!(error = %error, "Saved payroll state could not be removed during reset");
        }
        outcome
    }

    /// Looks up an employee.
    pub fn employee(&self, id: &str) -> PayrollResult<&Employee> {
        self.state().directory.get(id)
    }

    /// The id of the `index`-th (1-based) employee with this name.
    pub fn find_by_name(&self, name: &str, index: usize) -> PayrollResult<String> {
        self.state().directory.find_by_name(name, index)
    }

    /// Number of employees.
    pub fn employee_count(&self) -> usize {
        self.state().directory.len()
    }

    /// Canonical forms of every registered schedule.
    pub fn schedules(&self) -> Vec<String> {
        self.state().catalog.schedules()
    }

    /// Ordinary hours an hourly employee worked in `[start, end)`.
    pub fn normal_hours(&self, id: &str, start: NaiveDate, end: NaiveDate) -> PayrollResult<Decimal> {
        Ok(self.hours_in(id, start, end)?.ordinary_hours)
    }

    /// Overtime hours an hourly employee worked in `[start, end)`.
    pub fn overtime_hours(&self, id: &str, start: NaiveDate, end: NaiveDate) -> PayrollResult<Decimal> {
        Ok(self.hours_in(id, start, end)?.overtime_hours)
    }

    fn hours_in(&self, id: &str, start: NaiveDate, end: NaiveDate) -> PayrollResult<HoursSplit> {
        let employee = self.employee(id)?;
        require_category(employee, Category::Hourly)?;
        let period = PayPeriod::half_open(start, end)?;
        summarize_hours(&employee.time_cards, &period)
    }

    /// Sum of a commissioned employee's sales in `[start, end)`.
    pub fn sales_total(&self, id: &str, start: NaiveDate, end: NaiveDate) -> PayrollResult<Decimal> {
        let employee = self.employee(id)?;
        require_category(employee, Category::Commissioned)?;
        let period = PayPeriod::half_open(start, end)?;
        checked_total(
            "sale amount",
            employee
                .sales
                .iter()
                .filter(|sale| period.contains_date(sale.date()))
                .map(SaleRecord::amount),
        )
    }

    /// Sum of service fees charged to a union member in `[start, end)`.
    pub fn service_fees_total(&self, id: &str, start: NaiveDate, end: NaiveDate) -> PayrollResult<Decimal> {
        let employee = self.employee(id)?;
        if !employee.is_union_member() {
            return Err(PayrollError::NotUnionMember { id: id.to_string() });
        }
        let period = PayPeriod::half_open(start, end)?;
        checked_total(
            "service fee",
            employee
                .service_fees
                .iter()
                .filter(|fee| period.contains_date(fee.date()))
                .map(ServiceFeeEntry::amount),
        )
    }

    /// Computes the run for `pay_date` without recording anything.
    pub fn preview_payroll(&self, pay_date: NaiveDate) -> PayrollResult<PayrollRun> {
        calculate_payroll(&self.state().directory, pay_date)
    }

    /// Gross pay across everyone due on `pay_date`.
    pub fn total_payroll(&self, pay_date: NaiveDate) -> PayrollResult<Decimal> {
        self.preview_payroll(pay_date)?.total_gross()
    }

    /// The report `run_payroll` would write for `pay_date`.
    pub fn payroll_report(&self, pay_date: NaiveDate) -> PayrollResult<String> {
        render_report(&self.preview_payroll(pay_date)?)
    }
}

fn require_category(employee: &Employee, expected: Category) -> PayrollResult<()> {
    if employee.category() != expected {
        return Err(PayrollError::CategoryMismatch {
            id: employee.id.clone(),
            expected: expected.to_string(),
        });
    }
    Ok(())
}
