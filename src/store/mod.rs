//! Document store for the payroll ledger.
//!
//! All persistence goes through the [`PayrollStore`] trait. Every lookup other
//! than the company-level ones takes the caller's `company_id` and treats a
//! record of another company as missing.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::PayrollResult;
use crate::models::{
    AdminAccount, Adjustment, AuditEntry, ChatMessage, Company, Department, Employee, Loan,
    PayrollRecord,
};

mod memory;

pub use memory::InMemoryStore;

/// Everything written when a pay period is closed.
///
/// Applied as one batch so that a failed close leaves nothing half-archived.
#[derive(Debug, Clone)]
pub struct PeriodClose {
    /// The company with its period start advanced.
    pub company: Company,
    /// The archived period.
    pub record: PayrollRecord,
    /// Employees with their attendance reset.
    pub employees: Vec<Employee>,
    /// Loans whose status changed during the close.
    pub loans: Vec<Loan>,
}

/// Tenant-scoped persistence for every payroll collection.
#[async_trait]
pub trait PayrollStore: Send + Sync {
    /// Stores a new company with its first administrator.
    ///
    /// Fails with `Conflict` when the slug is taken.
    async fn insert_company(&self, company: Company, admin: AdminAccount) -> PayrollResult<()>;

    /// Gets a company by id.
    async fn get_company(&self, id: Uuid) -> PayrollResult<Company>;

    /// Gets a company by its login slug.
    async fn find_company_by_slug(&self, slug: &str) -> PayrollResult<Company>;

    /// Finds an administrator by email, compared case-insensitively.
    async fn find_admin(&self, company_id: Uuid, email: &str)
    -> PayrollResult<Option<AdminAccount>>;

    /// Stores a new department.
    async fn insert_department(&self, department: Department) -> PayrollResult<()>;

    /// Gets a department of the company.
    async fn get_department(&self, company_id: Uuid, id: Uuid) -> PayrollResult<Department>;

    /// Lists the company's departments ordered by name.
    async fn list_departments(&self, company_id: Uuid) -> PayrollResult<Vec<Department>>;

    /// Stores a new employee.
    async fn insert_employee(&self, employee: Employee) -> PayrollResult<()>;

    /// Gets an employee of the company.
    async fn get_employee(&self, company_id: Uuid, id: Uuid) -> PayrollResult<Employee>;

    /// Replaces an existing employee.
    async fn update_employee(&self, employee: Employee) -> PayrollResult<()>;

    /// Lists the company's employees ordered by name.
    async fn list_employees(&self, company_id: Uuid) -> PayrollResult<Vec<Employee>>;

    /// Stores a new adjustment.
    async fn insert_adjustment(&self, adjustment: Adjustment) -> PayrollResult<()>;

    /// Gets an adjustment of the company.
    async fn get_adjustment(&self, company_id: Uuid, id: Uuid) -> PayrollResult<Adjustment>;

    /// Removes an adjustment and returns it.
    async fn remove_adjustment(&self, company_id: Uuid, id: Uuid) -> PayrollResult<Adjustment>;

    /// Lists the company's adjustments for the period starting on `period_start`.
    async fn list_adjustments(
        &self,
        company_id: Uuid,
        period_start: NaiveDate,
    ) -> PayrollResult<Vec<Adjustment>>;

    /// Stores a new loan.
    async fn insert_loan(&self, loan: Loan) -> PayrollResult<()>;

    /// Gets a loan of the company.
    async fn get_loan(&self, company_id: Uuid, id: Uuid) -> PayrollResult<Loan>;

    /// Replaces an existing loan.
    async fn update_loan(&self, loan: Loan) -> PayrollResult<()>;

    /// Lists the company's loans, oldest first.
    async fn list_loans(&self, company_id: Uuid) -> PayrollResult<Vec<Loan>>;

    /// Applies every write of a period close as one batch.
    async fn commit_period_close(&self, close: PeriodClose) -> PayrollResult<()>;

    /// Gets an archived period of the company.
    async fn get_record(&self, company_id: Uuid, id: Uuid) -> PayrollResult<PayrollRecord>;

    /// Lists the company's archived periods, most recent first.
    async fn list_records(&self, company_id: Uuid) -> PayrollResult<Vec<PayrollRecord>>;

    /// Stores a chat message.
    async fn insert_message(&self, message: ChatMessage) -> PayrollResult<()>;

    /// Returns the company's `limit` most recent messages in the order they were sent.
    async fn list_messages(&self, company_id: Uuid, limit: usize)
    -> PayrollResult<Vec<ChatMessage>>;

    /// Appends an audit entry.
    async fn append_audit(&self, entry: AuditEntry) -> PayrollResult<()>;

    /// Returns the company's `limit` most recent audit entries, newest first.
    async fn list_audit(&self, company_id: Uuid, limit: usize) -> PayrollResult<Vec<AuditEntry>>;
}
