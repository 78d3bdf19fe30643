//! Copies of the mutable payroll state.

use crate::directory::Directory;
use crate::schedule::ScheduleCatalog;

/// Everything a command may change: the employee directory (including its
/// id counter) and the schedule catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PayrollState {
    /// The employee directory.
    pub directory: Directory,
    /// Registered payment schedules.
    pub catalog: ScheduleCatalog,
}

impl PayrollState {
    /// Empty directory and built-in schedules only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every employee and custom schedule.
    pub fn wipe(&mut self) {
        self.directory.clear();
        self.catalog.reset();
    }
}

/// A deep copy of [`PayrollState`] held on the undo or redo stack.
///
/// A snapshot taken by an in-session reset may also carry the undo stack as
/// it was before that reset. Restoring such a snapshot reinstates that
/// history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    state: PayrollState,
    history: Option<Vec<Snapshot>>,
}

impl Snapshot {
    /// Copies the current state.
    pub fn capture(state: &PayrollState) -> Self {
        Self {
            state: PayrollState {
                directory: state.directory.clone(),
                catalog: state.catalog.snapshot(),
            },
            history: None,
        }
    }

    /// Attaches an undo history to be reinstated on restore.
    pub fn with_history(mut self, history: Vec<Snapshot>) -> Self {
        self.history = Some(history);
        self
    }

    /// The captured state.
    pub fn state(&self) -> &PayrollState {
        &self.state
    }

    /// The attached history, if any.
    pub fn history(&self) -> Option<&[Snapshot]> {
        self.history.as_deref()
    }

    /// Splits the snapshot into its state and attached history.
    pub fn into_parts(self) -> (PayrollState, Option<Vec<Snapshot>>) {
        (self.state, self.history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Compensation, Employee};
    use rust_decimal::Decimal;

    fn state_with_employee() -> PayrollState {
        let mut state = PayrollState::new();
        let id = state.directory.allocate_id();
        state.directory.insert(Employee::new(
            id,
            "Ana",
            "Rua 1",
            Compensation::hourly(Decimal::from(10)).unwrap(),
        ));
        state.catalog.register("mensal 10").unwrap();
        state
    }

    #[test]
    fn test_capture_does_not_alias_live_state() {
        let mut state = state_with_employee();
        let snapshot = Snapshot::capture(&state);

        state.directory.get_mut("EMP1").unwrap().name = "Changed".to_string();
        state.catalog.register("mensal 11").unwrap();

        assert_eq!(snapshot.state().directory.get("EMP1").unwrap().name, "Ana");
        assert!(!snapshot.state().catalog.contains("mensal 11"));
    }

    #[test]
    fn test_wipe_keeps_built_in_schedules() {
        let mut state = state_with_employee();
        state.wipe();
        assert!(state.directory.is_empty());
        assert!(state.catalog.custom_schedules().is_empty());
        assert!(state.catalog.contains("semanal 5"));
    }

    #[test]
    fn test_history_round_trip() {
        let state = state_with_employee();
        let inner = Snapshot::capture(&PayrollState::new());
        let snapshot = Snapshot::capture(&state).with_history(vec![inner.clone()]);

        assert_eq!(snapshot.history(), Some(&[inner][..]));
        let (restored, history) = snapshot.into_parts();
        assert_eq!(restored, state);
        assert_eq!(history.map(|h| h.len()), Some(1));
    }
}
