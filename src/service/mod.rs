//! Business operations of the payroll ledger.
//!
//! [`PayrollService`] is the single entry point the HTTP layer calls. Every
//! operation takes the caller's [`Session`], is scoped to the session's
//! company, checks the session's role, and records an audit entry when it
//! changes anything.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::config::PolicyConfig;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{
    AdjustmentKind, AuditAction, AuditEntry, Company, Loan, PayFrequency, PayPeriod, Session,
};
use crate::store::PayrollStore;

mod activity;
mod auth;
mod credentials;
mod ledger;
mod payroll;
mod roster;

pub use credentials::{hash_secret, verify_secret};
pub use payroll::PayrollPreview;

/// Longest accepted name, reason or position.
const MAX_TEXT_LENGTH: usize = 120;

/// Details needed to register a new company and its first administrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRegistration {
    /// Company display name.
    pub name: String,
    /// Login handle: lowercase letters, digits and dashes.
    pub slug: String,
    /// How often employees are paid.
    pub pay_frequency: PayFrequency,
    /// First day of the first pay period.
    pub period_start: NaiveDate,
    /// Administrator's display name.
    pub admin_name: String,
    /// Administrator's login email.
    pub admin_email: String,
    /// Administrator's password.
    pub admin_password: String,
}

/// A new department.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDepartment {
    /// Department name, unique within the company.
    pub name: String,
    /// Manager's display name.
    pub manager_name: String,
    /// Manager's numeric PIN.
    pub pin: String,
}

/// A new employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEmployee {
    /// Display name.
    pub name: String,
    /// Job title.
    #[serde(default)]
    pub position: Option<String>,
    /// Department to assign the employee to.
    #[serde(default)]
    pub department_id: Option<Uuid>,
    /// Starting daily wage.
    pub daily_wage: Decimal,
    /// Hiring date; today when absent.
    #[serde(default)]
    pub hired_on: Option<NaiveDate>,
}

/// Changes to an employee's details. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New job title.
    #[serde(default)]
    pub position: Option<String>,
    /// New department.
    #[serde(default)]
    pub department_id: Option<Uuid>,
    /// Removes the employee from their department.
    #[serde(default)]
    pub clear_department: bool,
}

/// A new bonus or deduction for the current period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAdjustment {
    /// The employee whose pay is adjusted.
    pub employee_id: Uuid,
    /// Bonus or deduction.
    pub kind: AdjustmentKind,
    /// Positive amount.
    pub amount: Decimal,
    /// Reason shown on the pay line.
    pub reason: String,
}

/// A new salary advance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLoan {
    /// The borrowing employee.
    pub employee_id: Uuid,
    /// Amount advanced.
    pub amount: Decimal,
    /// Amount deducted each period.
    pub repayment_amount: Decimal,
    /// Date repayments count from; the current period start when absent.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Optional note.
    #[serde(default)]
    pub note: Option<String>,
}

/// A loan together with its balance as of the current period start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanView {
    /// The loan.
    #[serde(flatten)]
    pub loan: Loan,
    /// Outstanding balance at the start of the open pay period.
    pub balance: Decimal,
}

/// A newly registered company with a signed-in administrator session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    /// The company.
    pub company: Company,
    /// Session for the administrator.
    pub session: Session,
}

/// Runs every payroll operation against a [`PayrollStore`].
pub struct PayrollService {
    store: Arc<dyn PayrollStore>,
    policy: PolicyConfig,
    session_ttl: Duration,
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl PayrollService {
    /// Creates a service over `store` applying `policy`.
    pub fn new(store: Arc<dyn PayrollStore>, policy: PolicyConfig, session_ttl_minutes: u32) -> Self {
        Self {
            store,
            policy,
            session_ttl: Duration::minutes(i64::from(session_ttl_minutes)),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the business rules in effect.
    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Returns the company the session belongs to.
    pub async fn company(&self, session: &Session) -> PayrollResult<Company> {
        self.store.get_company(session.company_id).await
    }

    async fn audit(
        &self,
        session: &Session,
        action: AuditAction,
        target: Uuid,
        details: serde_json::Value,
    ) -> PayrollResult<()> {
        self.audit_as(session.company_id, &session.display_name, action, target, details)
            .await
    }

    async fn audit_as(
        &self,
        company_id: Uuid,
        actor: &str,
        action: AuditAction,
        target: Uuid,
        details: serde_json::Value,
    ) -> PayrollResult<()> {
        debug!(company_id = %company_id, actor, ?action, target = %target, "Recording audit entry");
        self.store
            .append_audit(AuditEntry {
                id: Uuid::new_v4(),
                company_id,
                actor: actor.to_string(),
                action,
                target,
                details,
                recorded_at: Utc::now(),
            })
            .await
    }
}

/// The company's open pay period.
fn current_period(company: &Company) -> PayrollResult<PayPeriod> {
    company
        .pay_frequency
        .period_starting(company.current_period_start)
}

fn require_admin(session: &Session) -> PayrollResult<()> {
    if session.is_admin() {
        Ok(())
    } else {
        Err(PayrollError::forbidden("only administrators may do this"))
    }
}

/// Trims `value` and checks it is non-empty and not too long.
fn required_text(field: &str, value: &str) -> PayrollResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PayrollError::validation(field, "must not be empty"));
    }
    if trimmed.chars().count() > MAX_TEXT_LENGTH {
        return Err(PayrollError::validation(
            field,
            format!("must be at most {} characters", MAX_TEXT_LENGTH),
        ));
    }
    Ok(trimmed.to_string())
}

fn optional_text(field: &str, value: Option<&str>) -> PayrollResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => required_text(field, text).map(Some),
    }
}

/// Checks a money amount is positive, at most `max`, with at most two decimal places.
fn positive_amount(field: &str, amount: Decimal, max: Decimal) -> PayrollResult<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(PayrollError::validation(field, "must be greater than zero"));
    }
    if amount > max {
        return Err(PayrollError::validation(
            field,
            format!("must not exceed {}", max),
        ));
    }
    if amount.normalize().scale() > 2 {
        return Err(PayrollError::validation(
            field,
            "must have at most two decimal places",
        ));
    }
    Ok(amount)
}

fn expires_at(ttl: Duration) -> DateTime<Utc> {
    Utc::now() + ttl
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_trims() {
        assert_eq!(required_text("name", "  Ana ").unwrap(), "Ana");
        assert!(required_text("name", "   ").is_err());
        assert!(required_text("name", &"x".repeat(MAX_TEXT_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_optional_text_blank_is_none() {
        assert_eq!(optional_text("position", Some("  ")).unwrap(), None);
        assert_eq!(optional_text("position", None).unwrap(), None);
        assert_eq!(
            optional_text("position", Some("Driver")).unwrap(),
            Some("Driver".to_string())
        );
    }

    #[test]
    fn test_positive_amount() {
        let max = Decimal::from(1000);
        assert!(positive_amount("amount", Decimal::new(1050, 2), max).is_ok());
        assert!(positive_amount("amount", Decimal::new(10500, 3), max).is_ok());
        assert!(positive_amount("amount", Decimal::new(10501, 3), max).is_err());
        assert!(positive_amount("amount", Decimal::ZERO, max).is_err());
        assert!(positive_amount("amount", Decimal::from(-5), max).is_err());
    }

    #[test]
    fn test_positive_amount_rejects_above_max() {
        let max = Decimal::from(1000);
        assert!(positive_amount("amount", max, max).is_ok());
        assert!(matches!(
            positive_amount("amount", Decimal::new(100001, 2), max),
            Err(PayrollError::Validation { ref field, .. }) if field == "amount"
        ));
        assert!(positive_amount("amount", Decimal::MAX, max).is_err());
    }
}
