//! Snapshotting, undo/redo and the reset/shutdown lifecycle.

mod log;
mod snapshot;

pub use log::{ResetOutcome, TransactionLog};
pub use snapshot::{PayrollState, Snapshot};
