//! Company (tenant), department and account models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PayFrequency;

/// A company registered with the service. Every other record is scoped to one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Unique identifier for the company.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Login handle, unique across all companies.
    pub slug: String,
    /// How often employees are paid.
    pub pay_frequency: PayFrequency,
    /// First day of the pay period currently open for attendance.
    pub current_period_start: NaiveDate,
    /// When the company registered.
    pub created_at: DateTime<Utc>,
}

/// A group of employees run by a manager who signs in with a PIN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Unique identifier for the department.
    pub id: Uuid,
    /// The owning company.
    pub company_id: Uuid,
    /// Department name.
    pub name: String,
    /// Name of the manager who marks attendance for this department.
    pub manager_name: String,
    /// Argon2 hash of the manager's PIN. Never returned by the API.
    pub pin_hash: String,
    /// When the department was created.
    pub created_at: DateTime<Utc>,
}

/// An administrator login for a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminAccount {
    /// Unique identifier for the account.
    pub id: Uuid,
    /// The owning company.
    pub company_id: Uuid,
    /// Administrator's display name.
    pub name: String,
    /// Login email, compared case-insensitively.
    pub email: String,
    /// Argon2 hash of the password.
    pub password_hash: String,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}
