//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod employee;
mod ledger;
mod pay_period;
mod payroll_run;

pub use employee::{Category, Compensation, Employee, PaymentMethod, UnionMembership};
pub use ledger::{SaleRecord, ServiceFeeEntry, TimeCard};
pub use pay_period::PayPeriod;
pub use payroll_run::{
    CommissionedPayment, CommissionedTotals, HourlyPayment, HourlyTotals, NetPay, PaidEmployee,
    PayrollRun, SalariedPayment,
};
