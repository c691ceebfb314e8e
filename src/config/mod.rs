//! Configuration loading and management for the payroll ledger.
//!
//! This module provides functionality to load the service configuration from
//! YAML files: server settings, storage settings, and the business rules
//! applied to every company.
//!
//! # Example
//!
//! ```no_run
//! use payroll_ledger::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("Service: {}", config.settings().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{AppConfig, AppSettings, PolicyConfig, ServerSettings, StorageSettings};
