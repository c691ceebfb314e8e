//! Attendance-day grouping.
//!
//! Turns per-employee attendance maps into a per-day view of who was present
//! and who was absent, which is what the attendance board displays.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Employee, WorkDay};

/// Who was present and absent on one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAttendance {
    /// Employees marked present.
    pub present: Vec<Uuid>,
    /// Employees not marked present (marked absent or never marked).
    pub absent: Vec<Uuid>,
    /// `present.len()`.
    pub present_count: usize,
    /// `absent.len()`.
    pub absent_count: usize,
}

/// Attendance of a group of employees, keyed by day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// Number of active employees included.
    pub employees: usize,
    /// Per-day breakdown, Monday first.
    pub days: BTreeMap<WorkDay, DayAttendance>,
}

/// Groups the attendance of active employees by day.
///
/// Inactive employees are left out entirely. Every day of the week appears in
/// the result, even when nobody was marked.
///
/// # Examples
///
/// ```
/// use payroll_ledger::calculation::group_attendance_by_day;
/// use payroll_ledger::models::{Attendance, Employee, WorkDay};
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
///
/// let summary = group_attendance_by_day(&[employee]);
/// assert_eq!(summary.days[&WorkDay::Monday].present_count, 1);
/// assert_eq!(summary.days[&WorkDay::Tuesday].absent_count, 1);
/// ```
pub fn group_attendance_by_day(employees: &[Employee]) -> AttendanceSummary {
    let mut days: BTreeMap<WorkDay, DayAttendance> = WorkDay::ALL
        .into_iter()
        .map(|day| (day, DayAttendance::default()))
        .collect();

    let active: Vec<&Employee> = employees.iter().filter(|e| e.active).collect();

    for employee in &active {
        for (day, entry) in days.iter_mut() {
            if employee.attendance.is_present(*day) {
                entry.present.push(employee.id);
            } else {
                entry.absent.push(employee.id);
            }
        }
    }

    for entry in days.values_mut() {
        entry.present_count = entry.present.len();
        entry.absent_count = entry.absent.len();
    }

    AttendanceSummary {
        employees: active.len(),
        days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Attendance;
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    fn create_test_employee(present: &[WorkDay], active: bool) -> Employee {
        Employee {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            department_id: None,
            name: "Employee".to_string(),
            position: None,
            daily_wage: Decimal::from(100),
            wage_history: vec![],
            attendance: present.iter().map(|d| (*d, true)).collect::<Attendance>(),
            active,
            hired_on: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_input_has_all_days() {
        let summary = group_attendance_by_day(&[]);
        assert_eq!(summary.employees, 0);
        assert_eq!(summary.days.len(), 7);
        assert!(summary.days.values().all(|d| d.present.is_empty() && d.absent.is_empty()));
    }

    #[test]
    fn test_groups_present_and_absent() {
        let a = create_test_employee(&[WorkDay::Monday, WorkDay::Tuesday], true);
        let b = create_test_employee(&[WorkDay::Monday], true);
        let summary = group_attendance_by_day(&[a.clone(), b.clone()]);

        let monday = &summary.days[&WorkDay::Monday];
        assert_eq!(monday.present, vec![a.id, b.id]);
        assert_eq!(monday.absent_count, 0);

        let tuesday = &summary.days[&WorkDay::Tuesday];
        assert_eq!(tuesday.present, vec![a.id]);
        assert_eq!(tuesday.absent, vec![b.id]);

        let sunday = &summary.days[&WorkDay::Sunday];
        assert_eq!(sunday.absent_count, 2);
    }

    #[test]
    fn test_inactive_employees_excluded() {
        let active = create_test_employee(&[WorkDay::Friday], true);
        let inactive = create_test_employee(&[WorkDay::Friday], false);
        let summary = group_attendance_by_day(&[active, inactive]);

        assert_eq!(summary.employees, 1);
        assert_eq!(summary.days[&WorkDay::Friday].present_count, 1);
        assert_eq!(summary.days[&WorkDay::Friday].absent_count, 0);
    }

    #[test]
    fn test_counts_match_lists() {
        let employees: Vec<Employee> = (0..5)
            .map(|i| create_test_employee(&WorkDay::ALL[..i], true))
            .collect();
        let summary = group_attendance_by_day(&employees);
        for entry in summary.days.values() {
            assert_eq!(entry.present_count, entry.present.len());
            assert_eq!(entry.absent_count, entry.absent.len());
            assert_eq!(entry.present_count + entry.absent_count, 5);
        }
    }
}
