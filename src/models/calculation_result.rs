//! Pay calculation result models.
//!
//! This module contains the [`PayCalculation`] type and its associated structures
//! that capture every output of a period pay calculation, including pay lines,
//! totals and an audit trace, plus the [`PayrollRecord`] that archives a closed
//! period.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PayPeriod;

/// Represents the category of a pay line.
///
/// # Example
///
/// ```
/// use payroll_ledger::models::PayCategory;
///
/// let category = PayCategory::LoanRepayment;
/// assert_eq!(serde_json::to_string(&category).unwrap(), "\"loan_repayment\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayCategory {
    /// Days present multiplied by the daily wage.
    BaseWage,
    /// A bonus adjustment.
    Bonus,
    /// A manual deduction adjustment.
    Deduction,
    /// A scheduled loan repayment.
    LoanRepayment,
}

impl PayCategory {
    /// Returns true for categories that reduce pay.
    pub fn is_deduction(self) -> bool {
        matches!(self, PayCategory::Deduction | PayCategory::LoanRepayment)
    }
}

/// Represents a single line item in a pay calculation.
///
/// `amount` is always positive; the category decides whether it adds to or
/// subtracts from net pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayLine {
    /// The category of the line.
    pub category: PayCategory,
    /// Human-readable description (adjustment reason, loan reference, ...).
    pub description: String,
    /// The amount of the line.
    pub amount: Decimal,
    /// The adjustment or loan this line came from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<Uuid>,
}

impl PayLine {
    /// Returns the amount with the sign it contributes to net pay.
    pub fn signed_amount(&self) -> Decimal {
        if self.category.is_deduction() {
            -self.amount
        } else {
            self.amount
        }
    }
}

/// Aggregated totals for a pay calculation.
///
/// # Example
///
/// ```
/// use payroll_ledger::models::PaySummary;
/// use rust_decimal::Decimal;
///
/// let totals = PaySummary {
///     days_present: 5,
///     daily_wage: Decimal::from(100),
///     base_pay: Decimal::from(500),
///     bonuses_total: Decimal::from(50),
///     deductions_total: Decimal::from(20),
///     loan_repayments_total: Decimal::from(30),
///     net_pay: Decimal::from(500),
/// };
/// assert_eq!(
///     totals.net_pay,
///     totals.base_pay + totals.bonuses_total - totals.deductions_total - totals.loan_repayments_total
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaySummary {
    /// Number of days marked present.
    pub days_present: u32,
    /// The daily wage in effect at the end of the period.
    pub daily_wage: Decimal,
    /// `days_present × daily_wage`.
    pub base_pay: Decimal,
    /// Sum of bonus adjustments.
    pub bonuses_total: Decimal,
    /// Sum of manual deduction adjustments.
    pub deductions_total: Decimal,
    /// Sum of loan repayments due in the period.
    pub loan_repayments_total: Decimal,
    /// Base pay plus bonuses minus all deductions.
    pub net_pay: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate potential issues that don't prevent calculation
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// The result of calculating one employee's pay for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayCalculation {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The employee the calculation is for.
    pub employee_id: Uuid,
    /// The employee's name at calculation time.
    pub employee_name: String,
    /// The pay period for this calculation.
    pub pay_period: PayPeriod,
    /// Individual pay lines making up the calculation.
    pub pay_lines: Vec<PayLine>,
    /// Aggregated totals.
    pub totals: PaySummary,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

/// An archived, closed pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// Unique identifier for the record.
    pub id: Uuid,
    /// The owning company.
    pub company_id: Uuid,
    /// The period that was closed.
    pub pay_period: PayPeriod,
    /// When the period was closed.
    pub closed_at: DateTime<Utc>,
    /// Display name of the administrator who closed it.
    pub closed_by: String,
    /// One calculation per employee that was active at closing time.
    pub calculations: Vec<PayCalculation>,
    /// Sum of net pay across all calculations.
    pub total_net_pay: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn line(category: PayCategory, amount: &str) -> PayLine {
        PayLine {
            category,
            description: "test".to_string(),
            amount: dec(amount),
            source_id: None,
        }
    }

    #[test]
    fn test_signed_amount_by_category() {
        assert_eq!(line(PayCategory::BaseWage, "500").signed_amount(), dec("500"));
        assert_eq!(line(PayCategory::Bonus, "25").signed_amount(), dec("25"));
        assert_eq!(line(PayCategory::Deduction, "10").signed_amount(), dec("-10"));
        assert_eq!(line(PayCategory::LoanRepayment, "40").signed_amount(), dec("-40"));
    }

    #[test]
    fn test_net_pay_equals_sum_of_signed_lines() {
        let lines = vec![
            line(PayCategory::BaseWage, "600.00"),
            line(PayCategory::Bonus, "50.00"),
            line(PayCategory::Deduction, "15.50"),
            line(PayCategory::LoanRepayment, "100.00"),
        ];
        let net: Decimal = lines.iter().map(PayLine::signed_amount).sum();
        assert_eq!(net, dec("534.50"));
    }

    #[test]
    fn test_pay_line_serialization_skips_missing_source() {
        let json = serde_json::to_string(&line(PayCategory::BaseWage, "600.00")).unwrap();
        assert!(json.contains("\"category\":\"base_wage\""));
        assert!(json.contains("\"amount\":\"600.00\""));
        assert!(!json.contains("source_id"));
    }

    #[test]
    fn test_pay_line_deserialization() {
        let json = r#"{
            "category": "loan_repayment",
            "description": "Loan repayment",
            "amount": "50.00",
            "source_id": "6f1c1a52-3a5e-4a4e-9a43-0e7e3f6a9d11"
        }"#;
        let pay_line: PayLine = serde_json::from_str(json).unwrap();
        assert_eq!(pay_line.category, PayCategory::LoanRepayment);
        assert!(pay_line.source_id.is_some());
    }

    #[test]
    fn test_audit_trace_default_is_empty() {
        let trace = AuditTrace::default();
        assert!(trace.steps.is_empty());
        assert!(trace.warnings.is_empty());
        assert_eq!(trace.duration_us, 0);
    }
}
