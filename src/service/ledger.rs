//! Bonuses, deductions and salary advances.

use chrono::Utc;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::{
    LoanView, NewAdjustment, NewLoan, PayrollService, optional_text, positive_amount,
    require_admin, required_text,
};
use crate::calculation::loan_balance;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{Adjustment, AuditAction, Company, Employee, Loan, LoanStatus, Session};

impl PayrollService {
    /// Adds a bonus or deduction to the open pay period.
    pub async fn add_adjustment(&self, session: &Session, request: NewAdjustment) -> PayrollResult<Adjustment> {
        require_admin(session)?;
        let amount = positive_amount("amount", request.amount, self.policy.max_amount)?;
        let reason = required_text("reason", &request.reason)?;
        let employee = self.active_employee(session, request.employee_id).await?;
        let company = self.company(session).await?;

        let adjustment = Adjustment {
            id: Uuid::new_v4(),
            company_id: session.company_id,
            employee_id: employee.id,
            kind: request.kind,
            amount,
            reason,
            period_start: company.current_period_start,
            created_at: Utc::now(),
        };
        self.store.insert_adjustment(adjustment.clone()).await?;

        self.audit(
            session,
            AuditAction::AdjustmentAdded,
            adjustment.id,
            json!({
                "employee_id": adjustment.employee_id,
                "kind": adjustment.kind,
                "amount": adjustment.amount,
            }),
        )
        .await?;
        Ok(adjustment)
    }

    /// Lists the adjustments of the open pay period.
    pub async fn list_adjustments(&self, session: &Session) -> PayrollResult<Vec<Adjustment>> {
        require_admin(session)?;
        let company = self.company(session).await?;
        self.store
            .list_adjustments(session.company_id, company.current_period_start)
            .await
    }

    /// Removes an adjustment of the open pay period.
    ///
    /// Adjustments of closed periods are part of an archived record and stay.
    pub async fn remove_adjustment(&self, session: &Session, adjustment_id: Uuid) -> PayrollResult<Adjustment> {
        require_admin(session)?;
        let company = self.company(session).await?;
        let adjustment = self.store.get_adjustment(session.company_id, adjustment_id).await?;
        if adjustment.period_start != company.current_period_start {
            return Err(PayrollError::Conflict {
                message: "adjustments of a closed pay period cannot be removed".to_string(),
            });
        }

        let adjustment = self.store.remove_adjustment(session.company_id, adjustment_id).await?;
        self.audit(
            session,
            AuditAction::AdjustmentRemoved,
            adjustment.id,
            json!({ "employee_id": adjustment.employee_id, "amount": adjustment.amount }),
        )
        .await?;
        Ok(adjustment)
    }

    /// Advances money to an employee, repaid from each following pay period.
    pub async fn create_loan(&self, session: &Session, request: NewLoan) -> PayrollResult<LoanView> {
        require_admin(session)?;
        let amount = positive_amount("amount", request.amount, self.policy.max_amount)?;
        let repayment_amount = positive_amount(
            "repayment_amount",
            request.repayment_amount,
            self.policy.max_amount,
        )?;
        if repayment_amount > amount {
            return Err(PayrollError::validation(
                "repayment_amount",
                "must not exceed the loan amount",
            ));
        }
        let note = optional_text("note", request.note.as_deref())?;
        let employee = self.active_employee(session, request.employee_id).await?;
        let company = self.company(session).await?;
        let start_date = request.start_date.unwrap_or(company.current_period_start);
        if start_date < company.current_period_start {
            return Err(PayrollError::validation(
                "start_date",
                format!(
                    "must not be before the open pay period starting {}",
                    company.current_period_start
                ),
            ));
        }

        let limit = self.policy.max_active_loans_per_employee;
        let active = self
            .store
            .list_loans(session.company_id)
            .await?
            .iter()
            .filter(|l| l.employee_id == employee.id && l.is_active())
            .count();
        if active >= limit {
            return Err(PayrollError::Conflict {
                message: format!(
                    "employee already has {} active loan(s), the limit is {}",
                    active, limit
                ),
            });
        }

        let loan = Loan {
            id: Uuid::new_v4(),
            company_id: session.company_id,
            employee_id: employee.id,
            amount,
            repayment_amount,
            start_date,
            status: LoanStatus::Active,
            cancelled_on: None,
            note,
            created_at: Utc::now(),
        };
        self.store.insert_loan(loan.clone()).await?;
        info!(company_id = %session.company_id, loan_id = %loan.id, employee_id = %employee.id, "Loan created");

        self.audit(
            session,
            AuditAction::LoanCreated,
            loan.id,
            json!({
                "employee_id": loan.employee_id,
                "amount": loan.amount,
                "repayment_amount": loan.repayment_amount,
            }),
        )
        .await?;
        Ok(loan_view(loan, &company))
    }

    /// Cancels an active loan.
    ///
    /// Nothing is repaid from the open pay period onwards; periods already
    /// closed keep their repayments.
    pub async fn cancel_loan(&self, session: &Session, loan_id: Uuid) -> PayrollResult<LoanView> {
        require_admin(session)?;
        let mut loan = self.store.get_loan(session.company_id, loan_id).await?;
        if !loan.is_active() {
            return Err(PayrollError::Conflict {
                message: format!("loan {} is not active", loan.id),
            });
        }

        let company = self.company(session).await?;
        loan.status = LoanStatus::Cancelled;
        loan.cancelled_on = Some(company.current_period_start);
        self.store.update_loan(loan.clone()).await?;

        let view = loan_view(loan, &company);
        self.audit(
            session,
            AuditAction::LoanCancelled,
            view.loan.id,
            json!({ "balance": view.balance }),
        )
        .await?;
        Ok(view)
    }

    /// Lists every loan of the company with its current balance.
    pub async fn list_loans(&self, session: &Session) -> PayrollResult<Vec<LoanView>> {
        require_admin(session)?;
        let company = self.company(session).await?;
        let loans = self.store.list_loans(session.company_id).await?;
        Ok(loans.into_iter().map(|loan| loan_view(loan, &company)).collect())
    }

    /// Gets one loan with its current balance.
    pub async fn get_loan(&self, session: &Session, loan_id: Uuid) -> PayrollResult<LoanView> {
        require_admin(session)?;
        let company = self.company(session).await?;
        let loan = self.store.get_loan(session.company_id, loan_id).await?;
        Ok(loan_view(loan, &company))
    }

    async fn active_employee(&self, session: &Session, employee_id: Uuid) -> PayrollResult<Employee> {
        let employee = self.store.get_employee(session.company_id, employee_id).await?;
        if !employee.active {
            return Err(PayrollError::validation(
                "employee_id",
                "employee is inactive",
            ));
        }
        Ok(employee)
    }
}

fn loan_view(loan: Loan, company: &Company) -> LoanView {
    let balance = loan_balance(&loan, company.pay_frequency, company.current_period_start);
    LoanView { loan, balance }
}
