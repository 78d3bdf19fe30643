//! JSON persistence of the employee directory and custom schedules.
//!
//! Built-in schedules are never written; they are re-seeded whenever state
//! is rebuilt from disk.

use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::directory::Directory;
use crate::error::{PayrollError, PayrollResult};
use crate::models::Employee;
use crate::schedule::ScheduleCatalog;
use crate::transaction::PayrollState;

/// The on-disk document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    /// Counter for the next employee id.
    pub next_id: u64,
    /// Every employee with their ledgers.
    #[serde(default)]
    pub employees: Vec<Employee>,
    /// Canonical forms of user-registered schedules.
    #[serde(default)]
    pub custom_schedules: Vec<String>,
}

impl PersistedState {
    /// Captures the persistable parts of `state`.
    pub fn from_state(state: &PayrollState) -> Self {
        Self {
            next_id: state.directory.next_id(),
            employees: state.directory.iter().cloned().collect(),
            custom_schedules: state.catalog.custom_schedules(),
        }
    }

    /// Rebuilds live state, re-registering the custom schedules on top of
    /// the built-ins.
    ///
    /// # Errors
    ///
    /// [`PayrollError::InvalidScheduleSyntax`] if a stored schedule no longer
    /// parses, [`PayrollError::DuplicateUnionId`] if two stored employees
    /// share a union id.
    pub fn into_state(self) -> PayrollResult<PayrollState> {
        let mut catalog = ScheduleCatalog::new();
        for schedule in &self.custom_schedules {
            match catalog.register(schedule) {
                Ok(_) => {}
                Err(PayrollError::ScheduleAlreadyExists { schedule }) => {
                    debug!(%schedule, "Skipping duplicate stored schedule");
                }
                Err(error) => return Err(error),
            }
        }
        Ok(PayrollState {
            directory: Directory::from_parts(self.employees, self.next_id)?,
            catalog,
        })
    }
}

fn storage_error(path: &Path, message: impl ToString) -> PayrollError {
    PayrollError::Storage {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

/// Writes `state` to `path`, creating parent directories as needed.
pub fn save(path: &Path, state: &PersistedState) -> PayrollResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| storage_error(path, e))?;
    }
    let content = serde_json::to_string_pretty(state).map_err(|e| storage_error(path, e))?;
    fs::write(path, content).map_err(|e| storage_error(path, e))?;
    debug!(
        path = %path.display(),
        employees = state.employees.len(),
        custom_schedules = state.custom_schedules.len(),
        "Saved payroll state"
    );
    Ok(())
}

/// Reads the state at `path`. A missing file is `Ok(None)`.
pub fn load(path: &Path) -> PayrollResult<Option<PersistedState>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(storage_error(path, e)),
    };
    let state: PersistedState =
        serde_json::from_str(&content).map_err(|e| storage_error(path, e))?;
    debug!(
        path = %path.display(),
        employees = state.employees.len(),
        "Loaded payroll state"
    );
    Ok(Some(state))
}

/// Deletes the file at `path`. A missing file is not an error.
pub fn wipe(path: &Path) -> PayrollResult<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "Wiped payroll state");
            Ok(())
        }
        Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to wipe payroll state");
            Err(storage_error(path, e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Compensation, PaymentMethod, TimeCard, UnionMembership};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_state() -> PayrollState {
        let mut state = PayrollState::new();
        let id = state.directory.allocate_id();
        let mut employee = Employee::new(
            id,
            "Ana",
            "Rua 1",
            Compensation::hourly(dec("12.50")).unwrap(),
        );
        employee.union = Some(UnionMembership::new("S1", dec("0.75")).unwrap());
        employee.payment_method = PaymentMethod::Bank {
            bank: "Banco".to_string(),
            agency: "001".to_string(),
            account: "123-4".to_string(),
        };
        employee.time_cards.push(
            TimeCard::new(NaiveDate::from_ymd_opt(2005, 1, 3).unwrap(), dec("8.5")).unwrap(),
        );
        state.directory.insert(employee);
        state.catalog.register("mensal 10").unwrap();
        state
    }

    #[test]
    fn test_save_then_load_restores_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");
        let state = sample_state();

        save(&path, &PersistedState::from_state(&state)).unwrap();
        let restored = load(&path).unwrap().unwrap().into_state().unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_shared_union_id_in_file_is_rejected() {
        let mut persisted = PersistedState::from_state(&sample_state());
        let mut twin = persisted.employees[0].clone();
        twin.id = "EMP2".to_string();
        persisted.employees.push(twin);
        persisted.next_id = 3;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        save(&path, &persisted).unwrap();
        let result = load(&path).unwrap().unwrap().into_state();
        assert!(matches!(result, Err(PayrollError::DuplicateUnionId { .. })));
    }

    #[test]
    fn test_built_ins_not_written() {
        let persisted = PersistedState::from_state(&sample_state());
        assert_eq!(persisted.custom_schedules, vec!["mensal 10".to_string()]);
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load(&dir.path().join("absent.json")).unwrap(), None);
    }

    #[test]
    fn test_load_corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load(&path), Err(PayrollError::Storage { .. })));
    }

    #[test]
    fn test_wipe_removes_file_and_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        save(&path, &PersistedState::from_state(&PayrollState::new())).unwrap();

        wipe(&path).unwrap();
        assert!(!path.exists());
        wipe(&path).unwrap();
    }
}
