//! In-memory document store with an optional JSON snapshot.
//!
//! Collections live in a single [`Tables`] value behind a `tokio` read/write
//! lock. When a snapshot path is configured, every mutation rewrites the
//! snapshot file before the write lock is released.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{
    AdminAccount, Adjustment, AuditEntry, ChatMessage, Company, Department, Employee, Loan,
    PayrollRecord,
};

use super::{PayrollStore, PeriodClose};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Tables {
    companies: HashMap<Uuid, Company>,
    admins: HashMap<Uuid, AdminAccount>,
    departments: HashMap<Uuid, Department>,
    employees: HashMap<Uuid, Employee>,
    adjustments: HashMap<Uuid, Adjustment>,
    loans: HashMap<Uuid, Loan>,
    records: HashMap<Uuid, PayrollRecord>,
    // Append-only, kept in insertion order
    messages: Vec<ChatMessage>,
    audit: Vec<AuditEntry>,
}

/// Looks up a record by id and hides it when it belongs to another company.
fn scoped<'a, T, F>(table: &'a HashMap<Uuid, T>, company_id: Uuid, id: Uuid, owner: F) -> Option<&'a T>
where
    F: Fn(&T) -> Uuid,
{
    table.get(&id).filter(|row| owner(row) == company_id)
}

/// A [`PayrollStore`] kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    snapshot_path: Option<PathBuf>,
}

impl InMemoryStore {
    /// Creates an empty store that is never written to disk.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store mirrored to `path`, loading the snapshot if it exists.
    pub async fn with_snapshot(path: impl Into<PathBuf>) -> PayrollResult<Self> {
        let path = path.into();
        let tables = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let tables: Tables =
                    serde_json::from_slice(&bytes).map_err(|e| PayrollError::Storage {
                        message: format!("failed to parse snapshot {}: {}", path.display(), e),
                    })?;
                info!(
                    path = %path.display(),
                    companies = tables.companies.len(),
                    employees = tables.employees.len(),
                    "Loaded store snapshot"
                );
                tables
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No snapshot found, starting empty");
                Tables::default()
            }
            Err(e) => {
                return Err(PayrollError::Storage {
                    message: format!("failed to read snapshot {}: {}", path.display(), e),
                });
            }
        };

        Ok(Self {
            tables: RwLock::new(tables),
            snapshot_path: Some(path),
        })
    }

    async fn persist(&self, tables: &Tables) -> PayrollResult<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        write_snapshot(path, tables).await
    }
}

fn snapshot_error(path: &Path, error: impl std::fmt::Display) -> PayrollError {
    PayrollError::Storage {
        message: format!("failed to write snapshot {}: {}", path.display(), error),
    }
}

async fn write_snapshot(path: &Path, tables: &Tables) -> PayrollResult<()> {
    let bytes = serde_json::to_vec(tables).map_err(|e| snapshot_error(path, e))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| snapshot_error(path, e))?;
    }

    // Write then rename so a crash never leaves a truncated snapshot
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, &bytes)
        .await
        .map_err(|e| snapshot_error(path, e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| snapshot_error(path, e))?;

    debug!(path = %path.display(), bytes = bytes.len(), "Wrote store snapshot");
    Ok(())
}

#[async_trait]
impl PayrollStore for InMemoryStore {
    async fn insert_company(&self, company: Company, admin: AdminAccount) -> PayrollResult<()> {
        let mut tables = self.tables.write().await;
        if tables.companies.values().any(|c| c.slug == company.slug) {
            return Err(PayrollError::Conflict {
                message: format!("company slug '{}' is already registered", company.slug),
            });
        }
        tables.admins.insert(admin.id, admin);
        tables.companies.insert(company.id, company);
        self.persist(&tables).await
    }

    async fn get_company(&self, id: Uuid) -> PayrollResult<Company> {
        let tables = self.tables.read().await;
        tables
            .companies
            .get(&id)
            .cloned()
            .ok_or_else(|| PayrollError::CompanyNotFound { key: id.to_string() })
    }

    async fn find_company_by_slug(&self, slug: &str) -> PayrollResult<Company> {
        let tables = self.tables.read().await;
        tables
            .companies
            .values()
            .find(|c| c.slug == slug)
            .cloned()
            .ok_or_else(|| PayrollError::CompanyNotFound {
                key: slug.to_string(),
            })
    }

    async fn find_admin(
        &self,
        company_id: Uuid,
        email: &str,
    ) -> PayrollResult<Option<AdminAccount>> {
        let tables = self.tables.read().await;
        Ok(tables
            .admins
            .values()
            .find(|a| a.company_id == company_id && a.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn insert_department(&self, department: Department) -> PayrollResult<()> {
        let mut tables = self.tables.write().await;
        if tables.departments.values().any(|d| {
            d.company_id == department.company_id && d.name.eq_ignore_ascii_case(&department.name)
        }) {
            return Err(PayrollError::Conflict {
                message: format!("department '{}' already exists", department.name),
            });
        }
        tables.departments.insert(department.id, department);
        self.persist(&tables).await
    }

    async fn get_department(&self, company_id: Uuid, id: Uuid) -> PayrollResult<Department> {
        let tables = self.tables.read().await;
        scoped(&tables.departments, company_id, id, |d| d.company_id)
            .cloned()
            .ok_or(PayrollError::DepartmentNotFound { id })
    }

    async fn list_departments(&self, company_id: Uuid) -> PayrollResult<Vec<Department>> {
        let tables = self.tables.read().await;
        let mut departments: Vec<Department> = tables
            .departments
            .values()
            .filter(|d| d.company_id == company_id)
            .cloned()
            .collect();
        departments.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(departments)
    }

    async fn insert_employee(&self, employee: Employee) -> PayrollResult<()> {
        let mut tables = self.tables.write().await;
        tables.employees.insert(employee.id, employee);
        self.persist(&tables).await
    }

    async fn get_employee(&self, company_id: Uuid, id: Uuid) -> PayrollResult<Employee> {
        let tables = self.tables.read().await;
        scoped(&tables.employees, company_id, id, |e| e.company_id)
            .cloned()
            .ok_or(PayrollError::EmployeeNotFound { id })
    }

    async fn update_employee(&self, employee: Employee) -> PayrollResult<()> {
        let mut tables = self.tables.write().await;
        if scoped(&tables.employees, employee.company_id, employee.id, |e| e.company_id).is_none() {
            return Err(PayrollError::EmployeeNotFound { id: employee.id });
        }
        tables.employees.insert(employee.id, employee);
        self.persist(&tables).await
    }

    async fn list_employees(&self, company_id: Uuid) -> PayrollResult<Vec<Employee>> {
        let tables = self.tables.read().await;
        let mut employees: Vec<Employee> = tables
            .employees
            .values()
            .filter(|e| e.company_id == company_id)
            .cloned()
            .collect();
        employees.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(employees)
    }

    async fn insert_adjustment(&self, adjustment: Adjustment) -> PayrollResult<()> {
        let mut tables = self.tables.write().await;
        tables.adjustments.insert(adjustment.id, adjustment);
        self.persist(&tables).await
    }

    async fn get_adjustment(&self, company_id: Uuid, id: Uuid) -> PayrollResult<Adjustment> {
        let tables = self.tables.read().await;
        scoped(&tables.adjustments, company_id, id, |a| a.company_id)
            .cloned()
            .ok_or(PayrollError::AdjustmentNotFound { id })
    }

    async fn remove_adjustment(&self, company_id: Uuid, id: Uuid) -> PayrollResult<Adjustment> {
        let mut tables = self.tables.write().await;
        if scoped(&tables.adjustments, company_id, id, |a| a.company_id).is_none() {
            return Err(PayrollError::AdjustmentNotFound { id });
        }
        let removed = tables
            .adjustments
            .remove(&id)
            .ok_or(PayrollError::AdjustmentNotFound { id })?;
        self.persist(&tables).await?;
        Ok(removed)
    }

    async fn list_adjustments(
        &self,
        company_id: Uuid,
        period_start: NaiveDate,
    ) -> PayrollResult<Vec<Adjustment>> {
        let tables = self.tables.read().await;
        let mut adjustments: Vec<Adjustment> = tables
            .adjustments
            .values()
            .filter(|a| a.company_id == company_id && a.period_start == period_start)
            .cloned()
            .collect();
        adjustments.sort_by_key(|a| a.created_at);
        Ok(adjustments)
    }

    async fn insert_loan(&self, loan: Loan) -> PayrollResult<()> {
        let mut tables = self.tables.write().await;
        tables.loans.insert(loan.id, loan);
        self.persist(&tables).await
    }

    async fn get_loan(&self, company_id: Uuid, id: Uuid) -> PayrollResult<Loan> {
        let tables = self.tables.read().await;
        scoped(&tables.loans, company_id, id, |l| l.company_id)
            .cloned()
            .ok_or(PayrollError::LoanNotFound { id })
    }

    async fn update_loan(&self, loan: Loan) -> PayrollResult<()> {
        let mut tables = self.tables.write().await;
        if scoped(&tables.loans, loan.company_id, loan.id, |l| l.company_id).is_none() {
            return Err(PayrollError::LoanNotFound { id: loan.id });
        }
        tables.loans.insert(loan.id, loan);
        self.persist(&tables).await
    }

    async fn list_loans(&self, company_id: Uuid) -> PayrollResult<Vec<Loan>> {
        let tables = self.tables.read().await;
        let mut loans: Vec<Loan> = tables
            .loans
            .values()
            .filter(|l| l.company_id == company_id)
            .cloned()
            .collect();
        loans.sort_by_key(|l| l.created_at);
        Ok(loans)
    }

    async fn commit_period_close(&self, close: PeriodClose) -> PayrollResult<()> {
        let mut tables = self.tables.write().await;
        let company_id = close.company.id;

        if !tables.companies.contains_key(&company_id) {
            return Err(PayrollError::CompanyNotFound {
                key: company_id.to_string(),
            });
        }
        // Validate the whole batch before applying any of it
        if let Some(e) = close.employees.iter().find(|e| e.company_id != company_id) {
            return Err(PayrollError::EmployeeNotFound { id: e.id });
        }
        if let Some(l) = close.loans.iter().find(|l| l.company_id != company_id) {
            return Err(PayrollError::LoanNotFound { id: l.id });
        }

        tables.companies.insert(company_id, close.company);
        tables.records.insert(close.record.id, close.record);
        for employee in close.employees {
            tables.employees.insert(employee.id, employee);
        }
        for loan in close.loans {
            tables.loans.insert(loan.id, loan);
        }
        self.persist(&tables).await
    }

    async fn get_record(&self, company_id: Uuid, id: Uuid) -> PayrollResult<PayrollRecord> {
        let tables = self.tables.read().await;
        scoped(&tables.records, company_id, id, |r| r.company_id)
            .cloned()
            .ok_or(PayrollError::RecordNotFound { id })
    }

    async fn list_records(&self, company_id: Uuid) -> PayrollResult<Vec<PayrollRecord>> {
        let tables = self.tables.read().await;
        let mut records: Vec<PayrollRecord> = tables
            .records
            .values()
            .filter(|r| r.company_id == company_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.pay_period.start_date.cmp(&a.pay_period.start_date));
        Ok(records)
    }

    async fn insert_message(&self, message: ChatMessage) -> PayrollResult<()> {
        let mut tables = self.tables.write().await;
        tables.messages.push(message);
        self.persist(&tables).await
    }

    async fn list_messages(
        &self,
        company_id: Uuid,
        limit: usize,
    ) -> PayrollResult<Vec<ChatMessage>> {
        let tables = self.tables.read().await;
        let mut messages: Vec<ChatMessage> = tables
            .messages
            .iter()
            .rev()
            .filter(|m| m.company_id == company_id)
            .take(limit)
            .cloned()
            .collect();
        messages.reverse();
        Ok(messages)
    }

    async fn append_audit(&self, entry: AuditEntry) -> PayrollResult<()> {
        let mut tables = self.tables.write().await;
        tables.audit.push(entry);
        self.persist(&tables).await
    }

    async fn list_audit(&self, company_id: Uuid, limit: usize) -> PayrollResult<Vec<AuditEntry>> {
        let tables = self.tables.read().await;
        Ok(tables
            .audit
            .iter()
            .rev()
            .filter(|a| a.company_id == company_id)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Attendance, AuditAction, PayFrequency};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn company(slug: &str) -> (Company, AdminAccount) {
        let company = Company {
            id: Uuid::new_v4(),
            name: slug.to_uppercase(),
            slug: slug.to_string(),
            pay_frequency: PayFrequency::Weekly,
            current_period_start: date(2026, 1, 5),
            created_at: Utc::now(),
        };
        let admin = AdminAccount {
            id: Uuid::new_v4(),
            company_id: company.id,
            name: "Admin".to_string(),
            email: format!("admin@{}.test", slug),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        };
        (company, admin)
    }

    fn employee(company_id: Uuid, name: &str) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            company_id,
            department_id: None,
            name: name.to_string(),
            position: None,
            daily_wage: Decimal::from(100),
            wage_history: vec![],
            attendance: Attendance::default(),
            active: true,
            hired_on: date(2025, 1, 1),
            created_at: Utc::now(),
        }
    }

    fn message(company_id: Uuid, body: &str) -> ChatMessage {
        ChatMessage {
            id: Uuid::new_v4(),
            company_id,
            author: "Admin".to_string(),
            body: body.to_string(),
            sent_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_slug_conflicts() {
        let store = InMemoryStore::new();
        let (first, first_admin) = company("acme");
        let (second, second_admin) = company("acme");

        store.insert_company(first, first_admin).await.unwrap();
        let result = store.insert_company(second, second_admin).await;
        assert!(matches!(result, Err(PayrollError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_find_admin_is_case_insensitive_and_scoped() {
        let store = InMemoryStore::new();
        let (acme, acme_admin) = company("acme");
        let (globex, globex_admin) = company("globex");
        store.insert_company(acme.clone(), acme_admin).await.unwrap();
        store.insert_company(globex.clone(), globex_admin).await.unwrap();

        assert!(store.find_admin(acme.id, "ADMIN@acme.test").await.unwrap().is_some());
        assert!(store.find_admin(globex.id, "admin@acme.test").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_records_of_other_company_are_hidden() {
        let store = InMemoryStore::new();
        let (acme, acme_admin) = company("acme");
        let (globex, globex_admin) = company("globex");
        store.insert_company(acme.clone(), acme_admin).await.unwrap();
        store.insert_company(globex.clone(), globex_admin).await.unwrap();

        let ana = employee(acme.id, "Ana");
        store.insert_employee(ana.clone()).await.unwrap();

        assert!(store.get_employee(acme.id, ana.id).await.is_ok());
        assert!(matches!(
            store.get_employee(globex.id, ana.id).await,
            Err(PayrollError::EmployeeNotFound { .. })
        ));
        assert!(store.list_employees(globex.id).await.unwrap().is_empty());

        let mut hijacked = ana.clone();
        hijacked.company_id = globex.id;
        assert!(store.update_employee(hijacked).await.is_err());
    }

    #[tokio::test]
    async fn test_list_employees_sorted_by_name() {
        let store = InMemoryStore::new();
        let company_id = Uuid::new_v4();
        for name in ["Zoe", "Ana", "Marco"] {
            store.insert_employee(employee(company_id, name)).await.unwrap();
        }
        let names: Vec<String> = store
            .list_employees(company_id)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Ana", "Marco", "Zoe"]);
    }

    #[tokio::test]
    async fn test_list_messages_returns_latest_in_order() {
        let store = InMemoryStore::new();
        let company_id = Uuid::new_v4();
        for body in ["one", "two", "three"] {
            store.insert_message(message(company_id, body)).await.unwrap();
        }
        store.insert_message(message(Uuid::new_v4(), "other")).await.unwrap();

        let bodies: Vec<String> = store
            .list_messages(company_id, 2)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.body)
            .collect();
        assert_eq!(bodies, vec!["two", "three"]);
    }

    #[tokio::test]
    async fn test_list_audit_newest_first() {
        let store = InMemoryStore::new();
        let company_id = Uuid::new_v4();
        for action in [AuditAction::EmployeeAdded, AuditAction::WageChanged] {
            store
                .append_audit(AuditEntry {
                    id: Uuid::new_v4(),
                    company_id,
                    actor: "Admin".to_string(),
                    action,
                    target: Uuid::new_v4(),
                    details: serde_json::json!({}),
                    recorded_at: Utc::now(),
                })
                .await
                .unwrap();
        }

        let entries = store.list_audit(company_id, 10).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, AuditAction::WageChanged);
    }

    #[tokio::test]
    async fn test_remove_adjustment_of_other_company_fails() {
        let store = InMemoryStore::new();
        let company_id = Uuid::new_v4();
        let adjustment = Adjustment {
            id: Uuid::new_v4(),
            company_id,
            employee_id: Uuid::new_v4(),
            kind: crate::models::AdjustmentKind::Bonus,
            amount: Decimal::from(10),
            reason: "test".to_string(),
            period_start: date(2026, 1, 5),
            created_at: Utc::now(),
        };
        store.insert_adjustment(adjustment.clone()).await.unwrap();

        assert!(store.remove_adjustment(Uuid::new_v4(), adjustment.id).await.is_err());
        assert_eq!(
            store.list_adjustments(company_id, date(2026, 1, 5)).await.unwrap().len(),
            1
        );
        store.remove_adjustment(company_id, adjustment.id).await.unwrap();
        assert!(store.list_adjustments(company_id, date(2026, 1, 5)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_round_trip() {
        let path = std::env::temp_dir()
            .join(format!("payroll-ledger-snapshot-{}", Uuid::new_v4()))
            .join("snapshot.json");

        let (acme, admin) = company("acme");
        {
            let store = InMemoryStore::with_snapshot(&path).await.unwrap();
            store.insert_company(acme.clone(), admin).await.unwrap();
            store.insert_employee(employee(acme.id, "Ana")).await.unwrap();
        }

        let reloaded = InMemoryStore::with_snapshot(&path).await.unwrap();
        assert_eq!(reloaded.find_company_by_slug("acme").await.unwrap().id, acme.id);
        assert_eq!(reloaded.list_employees(acme.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_a_storage_error() {
        let dir = std::env::temp_dir().join(format!("payroll-ledger-corrupt-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("snapshot.json");
        std::fs::write(&path, b"not json").unwrap();

        let result = InMemoryStore::with_snapshot(&path).await;
        assert!(matches!(result, Err(PayrollError::Storage { .. })));
    }
}
