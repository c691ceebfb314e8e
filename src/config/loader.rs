//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the service
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;

use crate::error::{PayrollError, PayrollResult};

use super::types::{AppConfig, AppSettings, PolicyConfig};

/// Loads and provides access to the service configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/
/// ├── app.yaml     # Service name, server and storage settings
/// └── policy.yaml  # Business rules (PIN length, loan limits, ...)
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_ledger::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config").unwrap();
/// println!("Binding to {}", loader.settings().server.bind_address);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if either file is missing, contains invalid YAML, or
    /// holds a policy value that cannot work (e.g. a zero-length PIN).
    pub fn load<P: AsRef<Path>>(path: P) -> PayrollResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<AppSettings>(&path.join("app.yaml"))?;

        let policy_path = path.join("policy.yaml");
        let policy = Self::load_yaml::<PolicyConfig>(&policy_path)?;
        Self::validate_policy(&policy, &policy_path)?;

        Ok(Self {
            config: AppConfig::new(settings, policy),
        })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: AppConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> PayrollResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| PayrollError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| PayrollError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate_policy(policy: &PolicyConfig, path: &Path) -> PayrollResult<()> {
        let invalid = |message: &str| PayrollError::ConfigParseError {
            path: path.display().to_string(),
            message: message.to_string(),
        };

        if policy.pin_length == 0 {
            return Err(invalid("pin_length must be at least 1"));
        }
        if policy.max_chat_message_length == 0 {
            return Err(invalid("max_chat_message_length must be at least 1"));
        }
        if policy.default_list_limit == 0 {
            return Err(invalid("default_list_limit must be at least 1"));
        }
        if policy.max_amount <= Decimal::ZERO {
            return Err(invalid("max_amount must be greater than zero"));
        }
        Ok(())
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the service settings.
    pub fn settings(&self) -> &AppSettings {
        self.config.settings()
    }

    /// Returns the business rules.
    pub fn policy(&self) -> &PolicyConfig {
        self.config.policy()
    }
}
