//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while running commands against
//! the employee directory.

use chrono::NaiveDate;
use thiserror::Error;

/// Broad classification of a [`PayrollError`].
///
/// Callers that only care about the class of failure (for example to map it
/// onto an exit code) can match on this instead of on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-range input.
    Validation,
    /// A referenced entity does not exist.
    NotFound,
    /// The command is not allowed in the current lifecycle state.
    State,
    /// Persistence or configuration I/O failed.
    Io,
}

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::{ErrorKind, PayrollError};
///
/// let error = PayrollError::EmployeeNotFound {
///     id: "EMP42".to_string(),
/// };
/// assert_eq!(error.to_string(), "Employee not found: EMP42");
/// assert_eq!(error.kind(), ErrorKind::NotFound);
/// ```
#[derive(Debug, Error)]
pub enum PayrollError {
    /// A schedule descriptor did not match the grammar or broke a numeric range.
    #[error("Invalid schedule '{text}': {message}")]
    InvalidScheduleSyntax {
        /// The raw descriptor text.
        text: String,
        /// What was wrong with it.
        message: String,
    },

    /// A schedule with the same normalized form is already registered.
    #[error("Schedule already exists: {schedule}")]
    ScheduleAlreadyExists {
        /// The canonical form of the existing schedule.
        schedule: String,
    },

    /// No registered schedule matches the requested text.
    #[error("Schedule unavailable: {text}")]
    ScheduleUnavailable {
        /// The text that was looked up.
        text: String,
    },

    /// A numeric input was outside its allowed range.
    #[error("Invalid {field}: {message}")]
    InvalidAmount {
        /// The field that was invalid (e.g. "hours").
        field: String,
        /// A description of the violated constraint.
        message: String,
    },

    /// A query range started after it ended.
    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange {
        /// The start of the range.
        start: NaiveDate,
        /// The end of the range.
        end: NaiveDate,
    },

    /// Another union member already holds this union id.
    #[error("Union id already in use: {union_id}")]
    DuplicateUnionId {
        /// The conflicting union id.
        union_id: String,
    },

    /// The operation requires a different employee category.
    #[error("Employee {id} is not {expected}")]
    CategoryMismatch {
        /// The employee id.
        id: String,
        /// The category the operation requires.
        expected: String,
    },

    /// The operation requires union membership.
    #[error("Employee {id} is not a union member")]
    NotUnionMember {
        /// The employee id.
        id: String,
    },

    /// No employee has the given id.
    #[error("Employee not found: {id}")]
    EmployeeNotFound {
        /// The id that was not found.
        id: String,
    },

    /// No union member has the given union id.
    #[error("Union member not found: {union_id}")]
    UnionMemberNotFound {
        /// The union id that was not found.
        union_id: String,
    },

    /// No employee has the given name.
    #[error("No employee named '{name}'")]
    NameNotFound {
        /// The name that was looked up.
        name: String,
    },

    /// The 1-based index does not select one of the employees with this name.
    #[error("Invalid index {index} for name '{name}'")]
    InvalidNameIndex {
        /// The name that was looked up.
        name: String,
        /// The requested index.
        index: usize,
    },

    /// Commands are rejected after shutdown until the next reset.
    #[error("System is closed; no commands accepted after shutdown")]
    SystemClosed,

    /// The undo history is empty.
    #[error("Nothing to undo")]
    NothingToUndo,

    /// The redo history is empty.
    #[error("Nothing to redo")]
    NothingToRedo,

    /// Reading or writing persisted state failed.
    #[error("Storage error at '{path}': {message}")]
    Storage {
        /// The storage path involved.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl PayrollError {
    /// Returns the broad class this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PayrollError::InvalidScheduleSyntax { .. }
            | PayrollError::ScheduleAlreadyExists { .. }
            | PayrollError::InvalidAmount { .. }
            | PayrollError::InvalidDateRange { .. }
            | PayrollError::DuplicateUnionId { .. }
            | PayrollError::CategoryMismatch { .. }
            | PayrollError::NotUnionMember { .. }
            | PayrollError::InvalidNameIndex { .. } => ErrorKind::Validation,
            PayrollError::ScheduleUnavailable { .. }
            | PayrollError::EmployeeNotFound { .. }
            | PayrollError::UnionMemberNotFound { .. }
            | PayrollError::NameNotFound { .. } => ErrorKind::NotFound,
            PayrollError::SystemClosed
            | PayrollError::NothingToUndo
            | PayrollError::NothingToRedo => ErrorKind::State,
            PayrollError::Storage { .. }
            | PayrollError::ConfigNotFound { .. }
            | PayrollError::ConfigParseError { .. } => ErrorKind::Io,
        }
    }
}

/// A type alias for Results that return PayrollError.
pub type PayrollResult<T> = Result<T, PayrollError>;
