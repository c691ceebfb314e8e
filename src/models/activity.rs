//! Chat messages, audit log entries and sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A message in a company's internal chat channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique identifier for the message.
    pub id: Uuid,
    /// The owning company.
    pub company_id: Uuid,
    /// Display name of the sender.
    pub author: String,
    /// Message text.
    pub body: String,
    /// When the message was posted.
    pub sent_at: DateTime<Utc>,
}

/// The kind of change an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A company registered.
    CompanyRegistered,
    /// A department was created.
    DepartmentCreated,
    /// An employee was added.
    EmployeeAdded,
    /// An employee's details were edited.
    EmployeeUpdated,
    /// An employee was deactivated.
    EmployeeDeactivated,
    /// A new daily wage was scheduled.
    WageChanged,
    /// Attendance was marked for a day.
    AttendanceMarked,
    /// A bonus or deduction was added.
    AdjustmentAdded,
    /// A bonus or deduction was removed.
    AdjustmentRemoved,
    /// A loan was issued.
    LoanCreated,
    /// A loan was cancelled.
    LoanCancelled,
    /// A loan was fully repaid during period close.
    LoanCompleted,
    /// A pay period was closed and archived.
    PeriodClosed,
}

/// An entry in a company's audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique identifier for the entry.
    pub id: Uuid,
    /// The owning company.
    pub company_id: Uuid,
    /// Display name of whoever performed the action.
    pub actor: String,
    /// What happened.
    pub action: AuditAction,
    /// Id of the affected record.
    pub target: Uuid,
    /// Action-specific details.
    pub details: serde_json::Value,
    /// When the action was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// What a signed-in user may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Role {
    /// Full access to the company.
    Admin,
    /// Attendance for one department only.
    Manager {
        /// The department the manager runs.
        department_id: Uuid,
    },
}

/// An authenticated session bound to one company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token.
    pub token: Uuid,
    /// The company the session acts on.
    pub company_id: Uuid,
    /// What the session may do.
    pub role: Role,
    /// Name recorded as the actor in audit entries.
    pub display_name: String,
    /// When the session stops being accepted.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Returns true for administrator sessions.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Returns the managed department for manager sessions.
    pub fn managed_department(&self) -> Option<Uuid> {
        match self.role {
            Role::Admin => None,
            Role::Manager { department_id } => Some(department_id),
        }
    }
}
