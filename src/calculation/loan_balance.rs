//! Loan balance tracking.
//!
//! A loan is repaid by a fixed deduction for every pay period that elapses after
//! its start date while it is active. The balance is never stored; it is derived
//! from the loan terms, the company's pay frequency and a reference date.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::PayrollResult;
use super::checked_sum;
use crate::models::{AuditStep, Loan, LoanStatus, PayCategory, PayFrequency, PayLine, PayPeriod};

/// The result of computing the loan repayments due in one pay period.
#[derive(Debug, Clone)]
pub struct LoanRepaymentResult {
    /// One pay line per loan with a non-zero repayment.
    pub pay_lines: Vec<PayLine>,
    /// Sum of all repayments.
    pub total: Decimal,
    /// The audit step recording the repayments.
    pub audit_step: AuditStep,
}

/// Returns the outstanding balance of `loan` on `as_of`.
///
/// `balance = amount − repayment_amount × elapsed periods since start_date`,
/// clamped at zero. Repayments stop accruing on the cancellation date of a
/// cancelled loan, and a completed loan has nothing outstanding.
///
/// # Examples
///
/// ```
/// use payroll_ledger::calculation::loan_balance;
/// use payroll_ledger::models::{Loan, LoanStatus, PayFrequency};
/// use chrono::{NaiveDate, Utc};
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let loan = Loan {
///     id: Uuid::new_v4(),
///     company_id: Uuid::new_v4(),
///     employee_id: Uuid::new_v4(),
///     amount: Decimal::from(300),
///     repayment_amount: Decimal::from(100),
///     start_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
///     status: LoanStatus::Active,
///     cancelled_on: None,
///     note: None,
///     created_at: Utc::now(),
/// };
///
/// let as_of = NaiveDate::from_ymd_opt(2026, 1, 19).unwrap();
/// assert_eq!(loan_balance(&loan, PayFrequency::Weekly, as_of), Decimal::from(100));
/// ```
pub fn loan_balance(loan: &Loan, frequency: PayFrequency, as_of: NaiveDate) -> Decimal {
    let accrual_end = match loan.status {
        LoanStatus::Completed => return Decimal::ZERO,
        LoanStatus::Active => as_of,
        LoanStatus::Cancelled => loan.cancelled_on.map_or(as_of, |c| c.min(as_of)),
    };

    let elapsed = frequency.elapsed_periods(loan.start_date, accrual_end);
    // Repaid past the representable range means repaid in full
    match loan.repayment_amount.checked_mul(Decimal::from(elapsed)) {
        Some(repaid) => (loan.amount - repaid).max(Decimal::ZERO),
        None => Decimal::ZERO,
    }
}

/// Returns the repayment deducted for `loan` when `period` is paid.
///
/// This is the drop in balance between the first day of the period and the
/// first day after it, so repayments over consecutive periods add up to
/// exactly `amount − balance`.
pub fn loan_repayment_for_period(
    loan: &Loan,
    frequency: PayFrequency,
    period: &PayPeriod,
) -> PayrollResult<Decimal> {
    let opening = loan_balance(loan, frequency, period.start_date);
    let closing = loan_balance(loan, frequency, period.next_start()?);
    Ok(opening - closing)
}

/// Computes the repayments due across all of an employee's loans for `period`.
pub fn calculate_loan_repayments(
    loans: &[Loan],
    frequency: PayFrequency,
    period: &PayPeriod,
    step_number: u32,
) -> PayrollResult<LoanRepaymentResult> {
    let mut pay_lines = Vec::new();
    let mut details = Vec::new();

    for loan in loans {
        let repayment = loan_repayment_for_period(loan, frequency, period)?;
        let remaining = loan_balance(loan, frequency, period.next_start()?);

        details.push(serde_json::json!({
            "loan_id": loan.id,
            "status": loan.status,
            "repayment": repayment.to_string(),
            "remaining_balance": remaining.to_string(),
        }));

        if repayment > Decimal::ZERO {
            pay_lines.push(PayLine {
                category: PayCategory::LoanRepayment,
                description: format!("Loan repayment ({} remaining)", remaining),
                amount: repayment,
                source_id: Some(loan.id),
            });
        }
    }

    let total = checked_sum("loan repayments", pay_lines.iter().map(|line| line.amount))?;

    let reasoning = if pay_lines.is_empty() {
        "No loan repayments due in this period".to_string()
    } else {
        format!(
            "{} loan repayment(s) due totalling ${}",
            pay_lines.len(),
            total
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "loan_repayments".to_string(),
        rule_name: "Loan Repayments".to_string(),
        input: serde_json::json!({
            "loans": loans.len(),
            "pay_frequency": frequency,
            "period_start": period.start_date.to_string(),
            "period_end": period.end_date.to_string(),
        }),
        output: serde_json::json!({
            "total": total.to_string(),
            "loans": details,
        }),
        reasoning,
    };

    Ok(LoanRepaymentResult {
        pay_lines,
        total,
        audit_step,
    })
}
