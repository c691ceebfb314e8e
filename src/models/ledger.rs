//! Adjustment and loan models.
//!
//! Adjustments are one-off bonuses or deductions attached to a single pay period.
//! Loans are salary advances repaid through a fixed deduction every period.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether an adjustment adds to or subtracts from pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    /// Added to pay.
    Bonus,
    /// Subtracted from pay.
    Deduction,
}

/// A bonus or deduction applied to an employee's pay for one period.
///
/// # Example
///
/// ```
/// use payroll_ledger::models::{Adjustment, AdjustmentKind};
/// use chrono::{NaiveDate, Utc};
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let bonus = Adjustment {
///     id: Uuid::new_v4(),
///     company_id: Uuid::new_v4(),
///     employee_id: Uuid::new_v4(),
///     kind: AdjustmentKind::Bonus,
///     amount: Decimal::new(5000, 2),
///     reason: "Perfect attendance".to_string(),
///     period_start: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
///     created_at: Utc::now(),
/// };
/// assert_eq!(bonus.signed_amount(), Decimal::new(5000, 2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    /// Unique identifier for the adjustment.
    pub id: Uuid,
    /// The owning company.
    pub company_id: Uuid,
    /// The employee whose pay is adjusted.
    pub employee_id: Uuid,
    /// Bonus or deduction.
    pub kind: AdjustmentKind,
    /// Positive amount of the adjustment.
    pub amount: Decimal,
    /// Free-text reason shown on the pay line.
    pub reason: String,
    /// Start date of the pay period this adjustment belongs to.
    pub period_start: NaiveDate,
    /// When the adjustment was created.
    pub created_at: DateTime<Utc>,
}

impl Adjustment {
    /// Returns the amount with the sign it contributes to net pay.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            AdjustmentKind::Bonus => self.amount,
            AdjustmentKind::Deduction => -self.amount,
        }
    }
}

/// Lifecycle state of a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    /// Repayments are being deducted every period.
    Active,
    /// Fully repaid.
    Completed,
    /// Stopped before being repaid; no further deductions.
    Cancelled,
}

/// A salary advance repaid via fixed per-period deductions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    /// Unique identifier for the loan.
    pub id: Uuid,
    /// The owning company.
    pub company_id: Uuid,
    /// The borrowing employee.
    pub employee_id: Uuid,
    /// The amount advanced.
    pub amount: Decimal,
    /// The amount deducted each pay period.
    pub repayment_amount: Decimal,
    /// The date repayments start counting from.
    pub start_date: NaiveDate,
    /// Current status.
    pub status: LoanStatus,
    /// The date the loan was cancelled, if it was.
    #[serde(default)]
    pub cancelled_on: Option<NaiveDate>,
    /// Optional note from the administrator.
    #[serde(default)]
    pub note: Option<String>,
    /// When the loan was created.
    pub created_at: DateTime<Utc>,
}

impl Loan {
    /// Returns true while repayments are still being deducted.
    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjustment(kind: AdjustmentKind, amount: Decimal) -> Adjustment {
        Adjustment {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            kind,
            amount,
            reason: "test".to_string(),
            period_start: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_deduction_signed_amount_is_negative() {
        let deduction = adjustment(AdjustmentKind::Deduction, Decimal::from(20));
        assert_eq!(deduction.signed_amount(), Decimal::from(-20));
    }

    #[test]
    fn test_adjustment_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&AdjustmentKind::Deduction).unwrap(),
            "\"deduction\""
        );
    }

    #[test]
    fn test_deserialize_loan_without_optional_fields() {
        let json = r#"{
            "id": "6f1c1a52-3a5e-4a4e-9a43-0e7e3f6a9d11",
            "company_id": "0b0f6b2c-6d8e-4b36-8d3e-5c1f9a2b7e40",
            "employee_id": "1d3a6c4e-8f1b-4d2a-9c5e-7b3f2a1e0d9c",
            "amount": "500.00",
            "repayment_amount": "50.00",
            "start_date": "2026-01-05",
            "status": "active",
            "created_at": "2026-01-05T09:00:00Z"
        }"#;

        let loan: Loan = serde_json::from_str(json).unwrap();
        assert!(loan.is_active());
        assert!(loan.cancelled_on.is_none());
        assert_eq!(loan.amount, Decimal::new(50000, 2));
    }
}
