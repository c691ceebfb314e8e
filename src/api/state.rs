//! Application state for the payroll ledger API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::service::PayrollService;
use crate::store::PayrollStore;

/// Shared application state.
///
/// Contains resources that are shared across all request handlers: the
/// loaded configuration and the payroll service built from it.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
    service: Arc<PayrollService>,
}

impl AppState {
    /// Creates the application state over `store` using the loaded configuration.
    pub fn new(config: ConfigLoader, store: Arc<dyn PayrollStore>) -> Self {
        let service = PayrollService::new(
            store,
            config.policy().clone(),
            config.settings().server.session_ttl_minutes,
        );
        Self {
            config: Arc::new(config),
            service: Arc::new(service),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the payroll service.
    pub fn service(&self) -> &PayrollService {
        &self.service
    }
}
