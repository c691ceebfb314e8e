//! Core data models for the payroll ledger.
//!
//! This module contains all the domain models used throughout the service.

mod activity;
mod attendance;
mod calculation_result;
mod company;
mod employee;
mod ledger;
mod pay_period;

pub use activity::{AuditAction, AuditEntry, ChatMessage, Role, Session};
pub use attendance::{Attendance, WorkDay};
pub use calculation_result::{
    AuditStep, AuditTrace, AuditWarning, PayCalculation, PayCategory, PayLine, PayrollRecord,
    PaySummary,
};
pub use company::{AdminAccount, Company, Department};
pub use employee::{Employee, WageChange};
pub use ledger::{Adjustment, AdjustmentKind, Loan, LoanStatus};
pub use pay_period::{PayFrequency, PayPeriod};
