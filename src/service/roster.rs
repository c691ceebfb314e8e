//! Departments, employees, wages and attendance.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use super::{
    EmployeeUpdate, NewDepartment, NewEmployee, PayrollService, hash_secret, optional_text,
    positive_amount, require_admin, required_text,
};
use crate::calculation::{AttendanceSummary, group_attendance_by_day};
use crate::error::{PayrollError, PayrollResult};
use crate::models::{AuditAction, Department, Employee, Session, WageChange, WorkDay};

impl PayrollService {
    /// Creates a department whose manager signs in with `pin`.
    pub async fn create_department(
        &self,
        session: &Session,
        request: NewDepartment,
    ) -> PayrollResult<Department> {
        require_admin(session)?;
        let name = required_text("name", &request.name)?;
        let manager_name = required_text("manager_name", &request.manager_name)?;

        let pin_length = self.policy.pin_length;
        let pin = request.pin.trim();
        if pin.len() != pin_length || !pin.chars().all(|c| c.is_ascii_digit()) {
            return Err(PayrollError::validation(
                "pin",
                format!("must be exactly {} digits", pin_length),
            ));
        }

        let department = Department {
            id: Uuid::new_v4(),
            company_id: session.company_id,
            name,
            manager_name,
            pin_hash: hash_secret(pin.to_string()).await?,
            created_at: Utc::now(),
        };
        self.store.insert_department(department.clone()).await?;

        self.audit(
            session,
            AuditAction::DepartmentCreated,
            department.id,
            json!({ "name": department.name, "manager_name": department.manager_name }),
        )
        .await?;
        Ok(department)
    }

    /// Lists the company's departments.
    pub async fn list_departments(&self, session: &Session) -> PayrollResult<Vec<Department>> {
        require_admin(session)?;
        self.store.list_departments(session.company_id).await
    }

    /// Adds an employee to the company.
    pub async fn add_employee(&self, session: &Session, request: NewEmployee) -> PayrollResult<Employee> {
        require_admin(session)?;
        let name = required_text("name", &request.name)?;
        let position = optional_text("position", request.position.as_deref())?;
        let daily_wage = positive_amount("daily_wage", request.daily_wage, self.policy.max_amount)?;
        if let Some(department_id) = request.department_id {
            self.store.get_department(session.company_id, department_id).await?;
        }

        let now = Utc::now();
        let employee = Employee {
            id: Uuid::new_v4(),
            company_id: session.company_id,
            department_id: request.department_id,
            name,
            position,
            daily_wage,
            wage_history: Vec::new(),
            attendance: Default::default(),
            active: true,
            hired_on: request.hired_on.unwrap_or_else(|| now.date_naive()),
            created_at: now,
        };
        self.store.insert_employee(employee.clone()).await?;
        info!(company_id = %session.company_id, employee_id = %employee.id, "Employee added");

        self.audit(
            session,
            AuditAction::EmployeeAdded,
            employee.id,
            json!({ "name": employee.name, "daily_wage": employee.daily_wage }),
        )
        .await?;
        Ok(employee)
    }

    /// Applies changes to an employee's name, position or department.
    pub async fn update_employee(
        &self,
        session: &Session,
        employee_id: Uuid,
        update: EmployeeUpdate,
    ) -> PayrollResult<Employee> {
        require_admin(session)?;
        let mut employee = self.store.get_employee(session.company_id, employee_id).await?;

        if let Some(name) = update.name.as_deref() {
            employee.name = required_text("name", name)?;
        }
        if update.position.is_some() {
            employee.position = optional_text("position", update.position.as_deref())?;
        }
        if update.clear_department {
            employee.department_id = None;
        } else if let Some(department_id) = update.department_id {
            self.store.get_department(session.company_id, department_id).await?;
            employee.department_id = Some(department_id);
        }

        self.store.update_employee(employee.clone()).await?;
        self.audit(
            session,
            AuditAction::EmployeeUpdated,
            employee.id,
            json!({
                "name": employee.name,
                "position": employee.position,
                "department_id": employee.department_id,
            }),
        )
        .await?;
        Ok(employee)
    }

    /// Marks an employee inactive. Deactivating twice is a no-op.
    pub async fn deactivate_employee(&self, session: &Session, employee_id: Uuid) -> PayrollResult<Employee> {
        require_admin(session)?;
        let mut employee = self.store.get_employee(session.company_id, employee_id).await?;
        if !employee.active {
            return Ok(employee);
        }

        employee.active = false;
        self.store.update_employee(employee.clone()).await?;
        info!(company_id = %session.company_id, employee_id = %employee.id, "Employee deactivated");

        self.audit(session, AuditAction::EmployeeDeactivated, employee.id, json!({}))
            .await?;
        Ok(employee)
    }

    /// Gets one employee.
    pub async fn get_employee(&self, session: &Session, employee_id: Uuid) -> PayrollResult<Employee> {
        require_admin(session)?;
        self.store.get_employee(session.company_id, employee_id).await
    }

    /// Lists employees visible to the session.
    ///
    /// Managers only see the employees of their own department.
    pub async fn list_employees(&self, session: &Session) -> PayrollResult<Vec<Employee>> {
        let employees = self.store.list_employees(session.company_id).await?;
        Ok(match session.managed_department() {
            None => employees,
            Some(department_id) => employees
                .into_iter()
                .filter(|e| e.in_department(department_id))
                .collect(),
        })
    }

    /// Records a new daily wage taking effect on `effective_date`.
    pub async fn change_wage(
        &self,
        session: &Session,
        employee_id: Uuid,
        daily_wage: Decimal,
        effective_date: NaiveDate,
    ) -> PayrollResult<Employee> {
        require_admin(session)?;
        let daily_wage = positive_amount("daily_wage", daily_wage, self.policy.max_amount)?;
        let mut employee = self.store.get_employee(session.company_id, employee_id).await?;
        if effective_date < employee.hired_on {
            return Err(PayrollError::validation(
                "effective_date",
                "must not be before the hiring date",
            ));
        }

        employee.record_wage_change(WageChange {
            effective_date,
            daily_wage,
        });
        self.store.update_employee(employee.clone()).await?;

        self.audit(
            session,
            AuditAction::WageChanged,
            employee.id,
            json!({ "daily_wage": daily_wage, "effective_date": effective_date }),
        )
        .await?;
        Ok(employee)
    }

    /// Marks an employee present or absent on `day` of the open period.
    ///
    /// Managers may only mark employees of their own department.
    pub async fn mark_attendance(
        &self,
        session: &Session,
        employee_id: Uuid,
        day: WorkDay,
        present: bool,
    ) -> PayrollResult<Employee> {
        let mut employee = self.store.get_employee(session.company_id, employee_id).await?;
        if session
            .managed_department()
            .is_some_and(|department_id| !employee.in_department(department_id))
        {
            return Err(PayrollError::forbidden(
                "managers may only mark attendance in their own department",
            ));
        }
        if !employee.active {
            return Err(PayrollError::validation(
                "employee_id",
                "attendance cannot be marked for an inactive employee",
            ));
        }

        employee.attendance.mark(day, present);
        self.store.update_employee(employee.clone()).await?;

        self.audit(
            session,
            AuditAction::AttendanceMarked,
            employee.id,
            json!({ "day": day, "present": present }),
        )
        .await?;
        Ok(employee)
    }

    /// Groups the open period's attendance by day.
    ///
    /// Managers get a summary of their own department only.
    pub async fn attendance_summary(&self, session: &Session) -> PayrollResult<AttendanceSummary> {
        let employees = self.list_employees(session).await?;
        Ok(group_attendance_by_day(&employees))
    }
}
