//! Payroll engine for hourly, salaried and commissioned employees.
//!
//! This crate provides payment schedules, payroll runs with exact
//! fixed-point rounding, union dues and service fee deductions, and full
//! undo/redo over an in-memory employee directory.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod directory;
pub mod error;
pub mod models;
pub mod report;
pub mod schedule;
pub mod storage;
pub mod system;
pub mod transaction;
