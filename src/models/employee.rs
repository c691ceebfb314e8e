//! Employee model and related types.
//!
//! This module defines the Employee struct and its wage history.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Attendance;

/// A change to an employee's daily wage taking effect on a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WageChange {
    /// The first date the new wage applies to.
    pub effective_date: NaiveDate,
    /// The new daily wage.
    pub daily_wage: Decimal,
}

/// Represents an employee of a company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: Uuid,
    /// The company the employee belongs to.
    pub company_id: Uuid,
    /// The department the employee works in, if any.
    #[serde(default)]
    pub department_id: Option<Uuid>,
    /// The employee's display name.
    pub name: String,
    /// Job title or position.
    #[serde(default)]
    pub position: Option<String>,
    /// The daily wage the employee was hired on.
    pub daily_wage: Decimal,
    /// Later wage changes, sorted by effective date ascending.
    #[serde(default)]
    pub wage_history: Vec<WageChange>,
    /// Attendance for the current pay period.
    #[serde(default)]
    pub attendance: Attendance,
    /// False once the employee has been deactivated.
    pub active: bool,
    /// The date the employee was hired.
    pub hired_on: NaiveDate,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl Employee {
    /// Records a wage change, keeping the history ordered by effective date.
    ///
    /// A change on a date that already has one replaces it.
    pub fn record_wage_change(&mut self, change: WageChange) {
        self.wage_history
            .retain(|c| c.effective_date != change.effective_date);
        let position = self
            .wage_history
            .partition_point(|c| c.effective_date < change.effective_date);
        self.wage_history.insert(position, change);
    }

    /// Returns true if the employee is assigned to `department_id`.
    pub fn in_department(&self, department_id: Uuid) -> bool {
        self.department_id == Some(department_id)
    }
}
