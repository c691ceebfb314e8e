//! Payroll preview, period close and archived records.

use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use super::{PayrollService, current_period, require_admin};
use crate::calculation::{PeriodPayInput, calculate_period_pay, checked_sum, loan_balance};
use crate::error::PayrollResult;
use crate::models::{
    AuditAction, Company, LoanStatus, PayCalculation, PayPeriod, PayrollRecord, Session,
};
use crate::store::PeriodClose;

/// Pay of every active employee for the open period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollPreview {
    /// The open pay period.
    pub pay_period: PayPeriod,
    /// One calculation per active employee, ordered by name.
    pub calculations: Vec<PayCalculation>,
    /// Sum of every net pay.
    pub total_net_pay: Decimal,
}

impl PayrollService {
    /// Calculates the open period's pay without changing anything.
    pub async fn preview_payroll(&self, session: &Session) -> PayrollResult<PayrollPreview> {
        require_admin(session)?;
        let company = self.company(session).await?;
        self.calculate_open_period(&company).await
    }

    /// Archives the open period and starts the next one.
    ///
    /// Loans repaid in full become completed, every employee's attendance is
    /// cleared and the company's period start moves to the day after the
    /// closed period ends.
    pub async fn close_pay_period(&self, session: &Session) -> PayrollResult<PayrollRecord> {
        require_admin(session)?;
        let mut company = self.company(session).await?;
        let preview = self.calculate_open_period(&company).await?;
        let next_start = preview.pay_period.next_start()?;

        let completed: Vec<_> = self
            .store
            .list_loans(company.id)
            .await?
            .into_iter()
            .filter(|loan| {
                loan.is_active()
                    && loan_balance(loan, company.pay_frequency, next_start) == Decimal::ZERO
            })
            .map(|mut loan| {
                loan.status = LoanStatus::Completed;
                loan
            })
            .collect();

        let employees = self
            .store
            .list_employees(company.id)
            .await?
            .into_iter()
            .map(|mut employee| {
                employee.attendance.reset();
                employee
            })
            .collect();

        let record = PayrollRecord {
            id: Uuid::new_v4(),
            company_id: company.id,
            pay_period: preview.pay_period,
            closed_at: Utc::now(),
            closed_by: session.display_name.clone(),
            calculations: preview.calculations,
            total_net_pay: preview.total_net_pay,
        };
        company.current_period_start = next_start;

        self.store
            .commit_period_close(PeriodClose {
                company: company.clone(),
                record: record.clone(),
                employees,
                loans: completed.clone(),
            })
            .await?;
        info!(
            company_id = %company.id,
            record_id = %record.id,
            period_start = %record.pay_period.start_date,
            total_net_pay = %record.total_net_pay,
            "Pay period closed"
        );

        for loan in &completed {
            self.audit(
                session,
                AuditAction::LoanCompleted,
                loan.id,
                json!({ "employee_id": loan.employee_id, "amount": loan.amount }),
            )
            .await?;
        }
        self.audit(
            session,
            AuditAction::PeriodClosed,
            record.id,
            json!({
                "start_date": record.pay_period.start_date,
                "end_date": record.pay_period.end_date,
                "employees": record.calculations.len(),
                "total_net_pay": record.total_net_pay,
            }),
        )
        .await?;

        Ok(record)
    }

    /// Lists archived periods, most recent first.
    pub async fn list_payroll_records(&self, session: &Session) -> PayrollResult<Vec<PayrollRecord>> {
        require_admin(session)?;
        self.store.list_records(session.company_id).await
    }

    /// Gets one archived period.
    pub async fn get_payroll_record(&self, session: &Session, record_id: Uuid) -> PayrollResult<PayrollRecord> {
        require_admin(session)?;
        self.store.get_record(session.company_id, record_id).await
    }

    async fn calculate_open_period(&self, company: &Company) -> PayrollResult<PayrollPreview> {
        let start = Instant::now();
        let period = current_period(company)?;
        let employees = self.store.list_employees(company.id).await?;
        let adjustments = self
            .store
            .list_adjustments(company.id, period.start_date)
            .await?;
        let loans = self.store.list_loans(company.id).await?;

        let calculations = employees
            .iter()
            .filter(|employee| employee.active)
            .map(|employee| {
                calculate_period_pay(PeriodPayInput {
                    employee,
                    period: &period,
                    frequency: company.pay_frequency,
                    adjustments: &adjustments,
                    loans: &loans,
                })
            })
            .collect::<PayrollResult<Vec<_>>>()?;

        let negative = calculations
            .iter()
            .filter(|c| c.totals.net_pay < Decimal::ZERO)
            .count();
        if negative > 0 {
            warn!(company_id = %company.id, employees = negative, "Negative net pay in period");
        }

        let total_net_pay = checked_sum("total net pay", calculations.iter().map(|c| c.totals.net_pay))?;
        info!(
            company_id = %company.id,
            employees = calculations.len(),
            duration_us = start.elapsed().as_micros() as u64,
            "Payroll calculated"
        );

        Ok(PayrollPreview {
            pay_period: period,
            calculations,
            total_net_pay,
        })
    }
}
