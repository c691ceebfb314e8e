//! Response types for the payroll ledger API.
//!
//! This module defines the error response structures, the mapping from
//! [`PayrollError`] to HTTP status codes, and response views that hide
//! stored secrets.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PayrollError;
use crate::models::Department;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    fn not_found(code: &str, message: String) -> Self {
        Self::with_details(
            code,
            message,
            "The record does not exist or belongs to another company",
        )
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Creates an error response with the given status.
    pub fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<PayrollError> for ApiErrorResponse {
    fn from(error: PayrollError) -> Self {
        let message = error.to_string();
        match error {
            PayrollError::ConfigNotFound { .. } | PayrollError::ConfigParseError { .. } => {
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
                )
            }
            PayrollError::CompanyNotFound { .. } => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::new("COMPANY_NOT_FOUND", message),
            ),
            PayrollError::EmployeeNotFound { .. } => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::not_found("EMPLOYEE_NOT_FOUND", message),
            ),
            PayrollError::DepartmentNotFound { .. } => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::not_found("DEPARTMENT_NOT_FOUND", message),
            ),
            PayrollError::AdjustmentNotFound { .. } => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::not_found("ADJUSTMENT_NOT_FOUND", message),
            ),
            PayrollError::LoanNotFound { .. } => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::not_found("LOAN_NOT_FOUND", message),
            ),
            PayrollError::RecordNotFound { .. } => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::not_found("RECORD_NOT_FOUND", message),
            ),
            PayrollError::Validation { field, .. } => Self::new(
                StatusCode::BAD_REQUEST,
                ApiError::with_details("VALIDATION_ERROR", message, field),
            ),
            PayrollError::Conflict { .. } => Self::new(
                StatusCode::CONFLICT,
                ApiError::new("CONFLICT", message),
            ),
            PayrollError::Unauthorized { .. } => Self::new(
                StatusCode::UNAUTHORIZED,
                ApiError::new("UNAUTHORIZED", message),
            ),
            PayrollError::Forbidden { .. } => Self::new(
                StatusCode::FORBIDDEN,
                ApiError::new("FORBIDDEN", message),
            ),
            PayrollError::CalculationError { message } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            ),
            PayrollError::Storage { message } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("STORAGE_ERROR", "Storage failure", message),
            ),
        }
    }
}

/// A department as returned by the API, without the PIN hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentView {
    /// Department id, used by managers to sign in.
    pub id: Uuid,
    /// Department name.
    pub name: String,
    /// Manager's display name.
    pub manager_name: String,
    /// When the department was created.
    pub created_at: DateTime<Utc>,
}

impl From<Department> for DepartmentView {
    fn from(department: Department) -> Self {
        Self {
            id: department.id,
            name: department.name,
            manager_name: department.manager_name,
            created_at: department.created_at,
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
    /// Configured service name.
    pub service: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (PayrollError::validation("amount", "bad"), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (PayrollError::unauthorized("no"), StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            (PayrollError::forbidden("no"), StatusCode::FORBIDDEN, "FORBIDDEN"),
            (
                PayrollError::LoanNotFound { id: Uuid::nil() },
                StatusCode::NOT_FOUND,
                "LOAN_NOT_FOUND",
            ),
            (
                PayrollError::Conflict {
                    message: "taken".to_string(),
                },
                StatusCode::CONFLICT,
                "CONFLICT",
            ),
            (
                PayrollError::Storage {
                    message: "disk full".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
            ),
        ];

        for (error, status, code) in cases {
            let response: ApiErrorResponse = error.into();
            assert_eq!(response.status, status);
            assert_eq!(response.error.code, code);
        }
    }

    #[test]
    fn test_validation_details_name_the_field() {
        let response: ApiErrorResponse = PayrollError::validation("pin", "must be 4 digits").into();
        assert_eq!(response.error.details.as_deref(), Some("pin"));
        assert!(response.error.message.contains("must be 4 digits"));
    }

    #[test]
    fn test_department_view_hides_pin_hash() {
        let department = Department {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            name: "Packing".to_string(),
            manager_name: "Sam".to_string(),
            pin_hash: "$argon2id$secret".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&DepartmentView::from(department)).unwrap();
        assert!(!json.contains("pin"));
        assert!(!json.contains("argon2"));
    }
}
