//! Configuration types for the payroll ledger.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Service metadata and runtime settings from `app.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    /// The service name reported by `/health`.
    pub name: String,
    /// HTTP server settings.
    pub server: ServerSettings,
    /// Document store settings.
    #[serde(default)]
    pub storage: StorageSettings,
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Address the server binds to (e.g. "0.0.0.0:8080").
    pub bind_address: String,
    /// How long a session token stays valid.
    pub session_ttl_minutes: u32,
}

/// Document store settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageSettings {
    /// JSON file every mutation is mirrored to. In-memory only when absent.
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}

/// Business rules from `policy.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    /// Minimum length of an administrator password.
    pub min_password_length: usize,
    /// Exact number of digits in a department manager PIN.
    pub pin_length: usize,
    /// Maximum number of active loans one employee may hold.
    pub max_active_loans_per_employee: usize,
    /// Maximum number of characters in a chat message.
    pub max_chat_message_length: usize,
    /// Number of chat messages or audit entries returned when no limit is given.
    pub default_list_limit: usize,
    /// Largest accepted wage, adjustment or loan amount.
    pub max_amount: Decimal,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            min_password_length: 8,
            pin_length: 4,
            max_active_loans_per_employee: 1,
            max_chat_message_length: 1000,
            default_list_limit: 50,
            max_amount: Decimal::from(1_000_000),
        }
    }
}

/// The complete configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct AppConfig {
    settings: AppSettings,
    policy: PolicyConfig,
}

impl AppConfig {
    /// Creates a new AppConfig from its component parts.
    pub fn new(settings: AppSettings, policy: PolicyConfig) -> Self {
        Self { settings, policy }
    }

    /// Returns the service settings.
    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Returns the business rules.
    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(
            AppSettings {
                name: "payroll-ledger".to_string(),
                server: ServerSettings {
                    bind_address: "127.0.0.1:8080".to_string(),
                    session_ttl_minutes: 480,
                },
                storage: StorageSettings::default(),
            },
            PolicyConfig::default(),
        )
    }
}
