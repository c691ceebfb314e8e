//! Error types for the payroll ledger.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while managing tenants, attendance
//! and pay.

use thiserror::Error;
use uuid::Uuid;

/// The main error type for the payroll ledger.
///
/// Every library operation returns this error type, so the HTTP layer has a
/// single place where errors are mapped to responses.
///
/// # Example
///
/// ```
/// use payroll_ledger::error::PayrollError;
///
/// let error = PayrollError::ConfigNotFound {
///     path: "/missing/app.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/app.yaml");
/// ```
#[derive(Debug, Error)]
pub enum PayrollError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No company exists with the given id or slug.
    #[error("Company not found: {key}")]
    CompanyNotFound {
        /// The id or slug that was looked up.
        key: String,
    },

    /// No employee with this id exists in the caller's company.
    #[error("Employee not found: {id}")]
    EmployeeNotFound {
        /// The employee id.
        id: Uuid,
    },

    /// No department with this id exists in the caller's company.
    #[error("Department not found: {id}")]
    DepartmentNotFound {
        /// The department id.
        id: Uuid,
    },

    /// No adjustment with this id exists in the caller's company.
    #[error("Adjustment not found: {id}")]
    AdjustmentNotFound {
        /// The adjustment id.
        id: Uuid,
    },

    /// No loan with this id exists in the caller's company.
    #[error("Loan not found: {id}")]
    LoanNotFound {
        /// The loan id.
        id: Uuid,
    },

    /// No archived payroll record with this id exists in the caller's company.
    #[error("Payroll record not found: {id}")]
    RecordNotFound {
        /// The record id.
        id: Uuid,
    },

    /// A field of a request failed validation.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The entity conflicts with an existing one (e.g. a duplicate slug).
    #[error("Conflict: {message}")]
    Conflict {
        /// A description of the conflict.
        message: String,
    },

    /// Credentials or session token were missing, wrong or expired.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// A description of the failure.
        message: String,
    },

    /// The session is valid but not allowed to perform the operation.
    #[error("Forbidden: {message}")]
    Forbidden {
        /// A description of the missing permission.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },

    /// The backing document store failed.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the storage failure.
        message: String,
    },
}

impl PayrollError {
    /// Shorthand for a [`PayrollError::Validation`] error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`PayrollError::Forbidden`] error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Shorthand for a [`PayrollError::Unauthorized`] error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return PayrollError.
pub type PayrollResult<T> = Result<T, PayrollError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = PayrollError::ConfigNotFound {
            path: "/missing/app.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/app.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = PayrollError::ConfigParseError {
            path: "/config/policy.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/policy.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_company_not_found_displays_key() {
        let error = PayrollError::CompanyNotFound {
            key: "acme".to_string(),
        };
        assert_eq!(error.to_string(), "Company not found: acme");
    }

    #[test]
    fn test_employee_not_found_displays_id() {
        let id = Uuid::nil();
        let error = PayrollError::EmployeeNotFound { id };
        assert_eq!(
            error.to_string(),
            "Employee not found: 00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_validation_helper_displays_field_and_message() {
        let error = PayrollError::validation("daily_wage", "must be greater than zero");
        assert_eq!(
            error.to_string(),
            "Invalid field 'daily_wage': must be greater than zero"
        );
    }

    #[test]
    fn test_forbidden_and_unauthorized_helpers() {
        assert_eq!(
            PayrollError::forbidden("admins only").to_string(),
            "Forbidden: admins only"
        );
        assert_eq!(
            PayrollError::unauthorized("bad pin").to_string(),
            "Unauthorized: bad pin"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<PayrollError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_conflict() -> PayrollResult<()> {
            Err(PayrollError::Conflict {
                message: "slug taken".to_string(),
            })
        }

        fn propagates_error() -> PayrollResult<()> {
            returns_conflict()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
