//! Multi-tenant attendance and payroll ledger.
//!
//! Companies register, add departments and employees, mark daily attendance
//! and close pay periods. Pay for a period is `days present × daily wage`
//! plus bonuses, minus deductions and salary-advance repayments. Closed
//! periods are archived as payroll records, and every change is written to
//! a per-company audit log.
//!
//! The crate is layered bottom-up:
//! - [`models`]: the stored entities and calculation results
//! - [`calculation`]: pure pay, loan balance and attendance functions
//! - [`store`]: the [`store::PayrollStore`] persistence trait and an in-memory backend
//! - [`service`]: tenant-scoped business operations with role checks
//! - [`api`]: the axum HTTP surface

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
