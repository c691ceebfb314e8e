//! Days-present counting and daily wage lookup.
//!
//! These are the two inputs to base pay: how many days the employee was
//! marked present, and which daily wage applies at the end of the period.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{Attendance, AuditStep, Employee, WorkDay};

/// The result of counting days present, including the audit step.
#[derive(Debug, Clone)]
pub struct DaysPresentResult {
    /// Number of days marked present.
    pub days_present: u32,
    /// The audit step recording the count.
    pub audit_step: AuditStep,
}

/// The result of a wage lookup, including the wage and audit step.
#[derive(Debug, Clone)]
pub struct WageLookupResult {
    /// The daily wage in effect.
    pub daily_wage: Decimal,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
}

/// Counts the days marked present in an attendance map.
///
/// # Examples
///
/// ```
/// use payroll_ledger::calculation::days_present;
/// use payroll_ledger::models::{Attendance, WorkDay};
///
/// let attendance: Attendance = [
///     (WorkDay::Monday, true),
///     (WorkDay::Tuesday, false),
///     (WorkDay::Wednesday, true),
/// ]
/// .into_iter()
/// .collect();
///
/// assert_eq!(days_present(&attendance), 2);
/// ```
pub fn days_present(attendance: &Attendance) -> u32 {
    attendance.iter().filter(|(_, present)| *present).count() as u32
}

/// Counts days present and records an audit step for it.
pub fn count_days_present(employee: &Employee, step_number: u32) -> DaysPresentResult {
    let present_days: Vec<String> = WorkDay::ALL
        .iter()
        .filter(|day| employee.attendance.is_present(**day))
        .map(ToString::to_string)
        .collect();
    let count = days_present(&employee.attendance);

    let audit_step = AuditStep {
        step_number,
        rule_id: "days_present".to_string(),
        rule_name: "Days Present".to_string(),
        input: serde_json::json!({
            "employee_id": employee.id,
            "attendance": employee.attendance,
        }),
        output: serde_json::json!({
            "days_present": count,
            "present_days": present_days,
        }),
        reasoning: if count == 0 {
            "No days marked present in this period".to_string()
        } else {
            format!("Present on {} day(s): {}", count, present_days.join(", "))
        },
    };

    DaysPresentResult {
        days_present: count,
        audit_step,
    }
}

/// Returns the daily wage that applies to `employee` on `as_of`.
///
/// The latest wage change effective on or before `as_of` wins. When no change
/// applies yet, the hiring wage is used.
///
/// # Examples
///
/// ```
/// use payroll_ledger::calculation::current_wage;
/// use payroll_ledger::models::{Attendance, Employee, WageChange};
/// use chrono::{NaiveDate, Utc};
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let employee = Employee {
///     id: Uuid::new_v4(),
///     company_id: Uuid::new_v4(),
///     department_id: None,
///     name: "Ana".to_string(),
///     position: None,
///     daily_wage: Decimal::from(100),
///     wage_history: vec![WageChange {
///         effective_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
///         daily_wage: Decimal::from(120),
///     }],
///     attendance: Attendance::default(),
///     active: true,
///     hired_on: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     created_at: Utc::now(),
/// };
///
/// assert_eq!(current_wage(&employee, NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()), Decimal::from(100));
/// assert_eq!(current_wage(&employee, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()), Decimal::from(120));
/// ```
pub fn current_wage(employee: &Employee, as_of: NaiveDate) -> Decimal {
    employee
        .wage_history
        .iter()
        .rfind(|change| change.effective_date <= as_of)
        .map(|change| change.daily_wage)
        .unwrap_or(employee.daily_wage)
}

/// Looks up the daily wage on `as_of` and records an audit step for it.
pub fn lookup_wage(employee: &Employee, as_of: NaiveDate, step_number: u32) -> WageLookupResult {
    let applied_change = employee
        .wage_history
        .iter()
        .rfind(|change| change.effective_date <= as_of);
    let daily_wage = current_wage(employee, as_of);

    let (source, reasoning) = match applied_change {
        Some(change) => (
            "wage_history",
            format!(
                "Wage change effective {} applies on {}: ${} per day",
                change.effective_date, as_of, daily_wage
            ),
        ),
        None => (
            "hiring_wage",
            format!("No wage change effective by {}; using hiring wage ${} per day", as_of, daily_wage),
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "wage_lookup".to_string(),
        rule_name: "Daily Wage Lookup".to_string(),
        input: serde_json::json!({
            "employee_id": employee.id,
            "as_of": as_of.to_string(),
            "wage_changes": employee.wage_history.len(),
        }),
        output: serde_json::json!({
            "daily_wage": daily_wage.to_string(),
            "source": source,
        }),
        reasoning,
    };

    WageLookupResult {
        daily_wage,
        audit_step,
    }
}
