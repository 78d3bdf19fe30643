//! Payment schedules.
//!
//! This module provides the [`ScheduleDescriptor`] type, which parses and
//! canonicalizes schedule text, and the [`ScheduleCatalog`] holding the
//! built-in and user-registered schedules.

mod catalog;
mod descriptor;

pub use catalog::ScheduleCatalog;
pub use descriptor::{MAX_DAY_OF_MONTH, MAX_INTERVAL_WEEKS, ScheduleDescriptor};
