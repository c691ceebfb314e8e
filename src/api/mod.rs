//! HTTP API module for the payroll ledger.
//!
//! This module provides the REST API endpoints for companies, attendance,
//! adjustments, loans, pay periods, chat and the audit log.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{Authenticated, create_router};
pub use request::{
    AttendanceRequest, ChatRequest, ListQuery, LoginRequest, PinLoginRequest, WageChangeRequest,
};
pub use response::{ApiError, ApiErrorResponse, DepartmentView, HealthResponse};
pub use state::AppState;
