//! Undo/redo history and the active/closed lifecycle.

use tracing::{debug, info, warn};

use super::snapshot::{PayrollState, Snapshot};
use crate::error::{PayrollError, PayrollResult};

/// Which path a [`TransactionLog::reset`] took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// The log was closed; it is active again with no history.
    Reopened,
    /// The log was active; the pre-reset state is one undo away.
    Cleared {
        /// Whether the pre-reset undo history was kept behind that undo.
        history_kept: bool,
    },
}

/// Owns the live [`PayrollState`] and its undo/redo stacks.
///
/// Every mutation goes through [`execute`](Self::execute), which either
/// commits the change and records the prior state for undo, or rolls the
/// state back entirely.
///
/// # Example
///
/// ```
/// use payroll_engine::transaction::TransactionLog;
///
/// let mut log = TransactionLog::new();
/// log.execute("register_schedule", |state| state.catalog.register("mensal 10"))
///     .unwrap();
/// assert!(log.state().catalog.contains("mensal 10"));
///
/// log.undo().unwrap();
/// assert!(!log.state().catalog.contains("mensal 10"));
/// log.redo().unwrap();
/// assert!(log.state().catalog.contains("mensal 10"));
/// ```
#[derive(Debug)]
pub struct TransactionLog {
    state: PayrollState,
    undo: Vec<Snapshot>,
    redo: Vec<Snapshot>,
    active: bool,
    discard_history_on_reset: bool,
}

impl Default for TransactionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionLog {
    /// An active log over empty state.
    pub fn new() -> Self {
        Self::with_state(PayrollState::new())
    }

    /// An active log over previously loaded state, with no history.
    pub fn with_state(state: PayrollState) -> Self {
        Self {
            state,
            undo: Vec::new(),
            redo: Vec::new(),
            active: true,
            discard_history_on_reset: true,
        }
    }

    /// The live state.
    pub fn state(&self) -> &PayrollState {
        &self.state
    }

    /// Returns true until [`close`](Self::close) is called.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Number of steps [`undo`](Self::undo) can take.
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Number of steps [`redo`](Self::redo) can take.
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    fn ensure_active(&self) -> PayrollResult<()> {
        if self.active {
            Ok(())
        } else {
            Err(PayrollError::SystemClosed)
        }
    }

    /// Runs `command` against the live state.
    ///
    /// On success the pre-command state is pushed for undo and the redo
    /// stack is cleared. On failure the state is restored exactly and the
    /// command's error is returned unchanged.
    ///
    /// # Errors
    ///
    /// [`PayrollError::SystemClosed`] if the log is closed, otherwise
    /// whatever `command` returns.
    pub fn execute<T, F>(&mut self, command: &str, operation: F) -> PayrollResult<T>
    where
        F: FnOnce(&mut PayrollState) -> PayrollResult<T>,
    {
        self.ensure_active()?;
        let before = Snapshot::capture(&self.state);

        match operation(&mut self.state) {
            Ok(value) => {
                self.undo.push(before);
                self.redo.clear();
                debug!(command, undo_depth = self.undo.len(), "Command committed");
                Ok(value)
            }
            Err(error) => {
                let (state, _) = before.into_parts();
                self.state = state;
                warn!(command, error = %error, "Command failed; state rolled back");
                Err(error)
            }
        }
    }

    /// Restores the state from before the most recent command.
    pub fn undo(&mut self) -> PayrollResult<()> {
        self.ensure_active()?;
        let previous = self.undo.pop().ok_or(PayrollError::NothingToUndo)?;
        self.redo.push(Snapshot::capture(&self.state));
        self.restore(previous);
        info!(
            undo_depth = self.undo.len(),
            redo_depth = self.redo.len(),
            "Undo"
        );
        Ok(())
    }

    /// Re-applies the most recently undone command.
    pub fn redo(&mut self) -> PayrollResult<()> {
        self.ensure_active()?;
        let next = self.redo.pop().ok_or(PayrollError::NothingToRedo)?;
        self.undo.push(Snapshot::capture(&self.state));
        self.restore(next);
        info!(
            undo_depth = self.undo.len(),
            redo_depth = self.redo.len(),
            "Redo"
        );
        Ok(())
    }

    fn restore(&mut self, snapshot: Snapshot) {
        let (state, history) = snapshot.into_parts();
        self.state = state;
        if let Some(history) = history {
            debug!(depth = history.len(), "Reinstating pre-reset history");
            self.undo = history;
        }
    }

    /// Closes the log: history is dropped, further commands fail with
    /// [`PayrollError::SystemClosed`], and the next reset discards history.
    pub fn close(&mut self) {
        self.active = false;
        self.undo.clear();
        self.redo.clear();
        self.discard_history_on_reset = true;
        info!("Transaction log closed");
    }

    /// Empties the live state.
    ///
    /// From the closed state this simply reopens the log with no history.
    /// From the active state the pre-reset state is pushed as a single undo
    /// step. The first reset of a session, or the first after a close, drops
    /// the older history; a later reset keeps it behind that step so undoing
    /// the reset brings it back.
    pub fn reset(&mut self) -> ResetOutcome {
        if !self.active {
            self.state.wipe();
            self.active = true;
            self.undo.clear();
            self.redo.clear();
            self.discard_history_on_reset = false;
            info!("Transaction log reopened by reset");
            return ResetOutcome::Reopened;
        }

        let history_kept = !self.discard_history_on_reset;
        let history = if history_kept {
            std::mem::take(&mut self.undo)
        } else {
            Vec::new()
        };
        let before = Snapshot::capture(&self.state).with_history(history);

        self.state.wipe();
        self.undo.clear();
        self.redo.clear();
        self.undo.push(before);
        self.discard_history_on_reset = false;
        info!(history_kept, "State reset");
        ResetOutcome::Cleared { history_kept }
    }
}
