//! Period pay calculation.
//!
//! Combines days present, the daily wage, the period's adjustments and loan
//! repayments into a single [`PayCalculation`]:
//!
//! `net = days_present × daily_wage + Σ bonuses − Σ deductions − Σ loan repayments`

use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::PayrollResult;
use crate::models::{
    Adjustment, AdjustmentKind, AuditStep, AuditTrace, AuditWarning, Employee, Loan, PayCalculation,
    PayCategory, PayFrequency, PayLine, PayPeriod, PaySummary,
};

use super::loan_balance::calculate_loan_repayments;
use super::{checked_sum, overflow};
use super::wage::{count_days_present, lookup_wage};

/// Everything needed to compute one employee's pay for one period.
#[derive(Debug, Clone, Copy)]
pub struct PeriodPayInput<'a> {
    /// The employee being paid.
    pub employee: &'a Employee,
    /// The period being paid.
    pub period: &'a PayPeriod,
    /// The company's pay frequency, used for loan repayments.
    pub frequency: PayFrequency,
    /// Adjustments for this employee. Adjustments of other periods are ignored.
    pub adjustments: &'a [Adjustment],
    /// Loans for this employee.
    pub loans: &'a [Loan],
}

/// Calculates an employee's pay for a period.
///
/// The daily wage is the one in effect on the period's end date. Net pay is not
/// clamped: a negative result is returned as-is with a `NEGATIVE_NET_PAY`
/// warning in the audit trace.
///
/// # Examples
///
/// ```
/// use payroll_ledger::calculation::{calculate_period_pay, PeriodPayInput};
/// use payroll_ledger::models::{Attendance, Employee, PayFrequency, WorkDay};
/// use chrono::{NaiveDate, Utc};
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let mut employee = Employee {
///     id: Uuid::new_v4(),
///     company_id: Uuid::new_v4(),
///     department_id: None,
///     name: "Ana".to_string(),
///     position: None,
///     daily_wage: Decimal::from(100),
///     wage_history: vec![],
///     attendance: Attendance::default(),
///     active: true,
///     hired_on: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     created_at: Utc::now(),
/// };
/// employee.attendance.mark(WorkDay::Monday, true);
/// employee.attendance.mark(WorkDay::Tuesday, true);
///
/// let period = PayFrequency::Weekly
///     .period_starting(NaiveDate::from_ymd_opt(2026, 1, 5).unwrap())
///     .unwrap();
/// let result = calculate_period_pay(PeriodPayInput {
///     employee: &employee,
///     period: &period,
///     frequency: PayFrequency::Weekly,
///     adjustments: &[],
///     loans: &[],
/// })
/// .unwrap();
///
/// assert_eq!(result.totals.net_pay, Decimal::from(200));
/// ```
pub fn calculate_period_pay(input: PeriodPayInput<'_>) -> PayrollResult<PayCalculation> {
    let start_time = Instant::now();
    let PeriodPayInput {
        employee,
        period,
        frequency,
        adjustments,
        loans,
    } = input;

    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut pay_lines: Vec<PayLine> = Vec::new();
    let mut step_number: u32 = 1;

    let days = count_days_present(employee, step_number);
    steps.push(days.audit_step);
    step_number += 1;

    let wage = lookup_wage(employee, period.end_date, step_number);
    steps.push(wage.audit_step);
    step_number += 1;

    let base_pay = Decimal::from(days.days_present)
        .checked_mul(wage.daily_wage)
        .ok_or_else(|| overflow("base pay"))?;
    steps.push(AuditStep {
        step_number,
        rule_id: "base_pay".to_string(),
        rule_name: "Base Pay".to_string(),
        input: serde_json::json!({
            "days_present": days.days_present,
            "daily_wage": wage.daily_wage.to_string(),
        }),
        output: serde_json::json!({
            "base_pay": base_pay.to_string(),
        }),
        reasoning: format!(
            "{} day(s) × ${} = ${}",
            days.days_present, wage.daily_wage, base_pay
        ),
    });
    step_number += 1;

    if base_pay > Decimal::ZERO {
        pay_lines.push(PayLine {
            category: PayCategory::BaseWage,
            description: format!("{} day(s) at ${} per day", days.days_present, wage.daily_wage),
            amount: base_pay,
            source_id: None,
        });
    }

    // Adjustments belong to exactly one period
    let period_adjustments: Vec<&Adjustment> = adjustments
        .iter()
        .filter(|a| a.employee_id == employee.id && a.period_start == period.start_date)
        .collect();

    let bonuses_total = checked_sum(
        "bonuses",
        period_adjustments
            .iter()
            .filter(|a| a.kind == AdjustmentKind::Bonus)
            .map(|a| a.amount),
    )?;
    let deductions_total = checked_sum(
        "deductions",
        period_adjustments
            .iter()
            .filter(|a| a.kind == AdjustmentKind::Deduction)
            .map(|a| a.amount),
    )?;
    for adjustment in &period_adjustments {
        let category = match adjustment.kind {
            AdjustmentKind::Bonus => PayCategory::Bonus,
            AdjustmentKind::Deduction => PayCategory::Deduction,
        };
        pay_lines.push(PayLine {
            category,
            description: adjustment.reason.clone(),
            amount: adjustment.amount,
            source_id: Some(adjustment.id),
        });
    }

    let own_adjustments = adjustments
        .iter()
        .filter(|a| a.employee_id == employee.id)
        .count();
    let ignored = own_adjustments - period_adjustments.len();
    steps.push(AuditStep {
        step_number,
        rule_id: "adjustments".to_string(),
        rule_name: "Bonuses and Deductions".to_string(),
        input: serde_json::json!({
            "adjustments": own_adjustments,
            "period_start": period.start_date.to_string(),
        }),
        output: serde_json::json!({
            "applied": period_adjustments.len(),
            "ignored": ignored,
            "bonuses_total": bonuses_total.to_string(),
            "deductions_total": deductions_total.to_string(),
        }),
        reasoning: format!(
            "Applied {} adjustment(s): +${} bonuses, -${} deductions",
            period_adjustments.len(),
            bonuses_total,
            deductions_total
        ),
    });
    step_number += 1;

    let employee_loans: Vec<Loan> = loans
        .iter()
        .filter(|loan| loan.employee_id == employee.id)
        .cloned()
        .collect();
    let repayments = calculate_loan_repayments(&employee_loans, frequency, period, step_number)?;
    steps.push(repayments.audit_step);
    step_number += 1;
    let loan_repayments_total = repayments.total;
    pay_lines.extend(repayments.pay_lines);

    let net_pay = base_pay
        .checked_add(bonuses_total)
        .and_then(|pay| pay.checked_sub(deductions_total))
        .and_then(|pay| pay.checked_sub(loan_repayments_total))
        .ok_or_else(|| overflow("net pay"))?;
    steps.push(AuditStep {
        step_number,
        rule_id: "net_pay".to_string(),
        rule_name: "Net Pay".to_string(),
        input: serde_json::json!({
            "base_pay": base_pay.to_string(),
            "bonuses_total": bonuses_total.to_string(),
            "deductions_total": deductions_total.to_string(),
            "loan_repayments_total": loan_repayments_total.to_string(),
        }),
        output: serde_json::json!({
            "net_pay": net_pay.to_string(),
        }),
        reasoning: format!(
            "${} + ${} - ${} - ${} = ${}",
            base_pay, bonuses_total, deductions_total, loan_repayments_total, net_pay
        ),
    });

    if net_pay < Decimal::ZERO {
        warnings.push(AuditWarning {
            code: "NEGATIVE_NET_PAY".to_string(),
            message: format!(
                "Deductions exceed earnings for {}: net pay is ${}",
                employee.name, net_pay
            ),
            severity: "high".to_string(),
        });
    }

    if !employee.active {
        warnings.push(AuditWarning {
            code: "INACTIVE_EMPLOYEE".to_string(),
            message: format!("{} is no longer active", employee.name),
            severity: "low".to_string(),
        });
    }

    Ok(PayCalculation {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        employee_id: employee.id,
        employee_name: employee.name.clone(),
        pay_period: period.clone(),
        pay_lines,
        totals: PaySummary {
            days_present: days.days_present,
            daily_wage: wage.daily_wage,
            base_pay,
            bonuses_total,
            deductions_total,
            loan_repayments_total,
            net_pay,
        },
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us: start_time.elapsed().as_micros() as u64,
        },
    })
}
