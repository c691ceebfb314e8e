//! Request types for the payroll ledger API.
//!
//! Bodies that map one-to-one onto a service operation reuse the service's
//! input types; the rest are defined here.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::WorkDay;

pub use crate::service::{
    CompanyRegistration, EmployeeUpdate, NewAdjustment, NewDepartment, NewEmployee, NewLoan,
};

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Company slug.
    pub slug: String,
    /// Administrator email.
    pub email: String,
    /// Administrator password.
    pub password: String,
}

/// Body of `POST /auth/pin`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinLoginRequest {
    /// Company slug.
    pub slug: String,
    /// The department the manager runs.
    pub department_id: Uuid,
    /// The department's PIN.
    pub pin: String,
}

/// Body of `POST /employees/:id/wage`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WageChangeRequest {
    /// New daily wage.
    pub daily_wage: Decimal,
    /// First date the wage applies to.
    pub effective_date: NaiveDate,
}

/// Body of `PUT /employees/:id/attendance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRequest {
    /// Day of the open pay period.
    pub day: WorkDay,
    /// Whether the employee was present.
    pub present: bool,
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Message text.
    pub body: String,
}

/// Query string of the list endpoints that take a limit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    /// Maximum number of entries to return.
    #[serde(default)]
    pub limit: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attendance_request_deserialization() {
        let request: AttendanceRequest =
            serde_json::from_str(r#"{"day": "wednesday", "present": true}"#).unwrap();
        assert_eq!(request.day, WorkDay::Wednesday);
        assert!(request.present);
    }

    #[test]
    fn test_wage_change_accepts_string_and_number() {
        let from_string: WageChangeRequest =
            serde_json::from_str(r#"{"daily_wage": "125.50", "effective_date": "2026-02-01"}"#).unwrap();
        let from_number: WageChangeRequest =
            serde_json::from_str(r#"{"daily_wage": 125.5, "effective_date": "2026-02-01"}"#).unwrap();
        assert_eq!(from_string.daily_wage, from_number.daily_wage);
    }

    #[test]
    fn test_new_employee_optional_fields() {
        let request: NewEmployee =
            serde_json::from_str(r#"{"name": "Ana", "daily_wage": "100"}"#).unwrap();
        assert_eq!(request.department_id, None);
        assert_eq!(request.hired_on, None);
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let result: Result<LoginRequest, _> = serde_json::from_str(r#"{"slug": "acme"}"#);
        let error = result.unwrap_err().to_string();
        assert!(error.contains("missing field"));
    }
}
