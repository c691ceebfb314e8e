//! HTTP request handlers for the payroll ledger API.
//!
//! This module contains the router and the handler functions for all API
//! endpoints. Every handler except health, registration and login requires a
//! `Authorization: Bearer <token>` header carrying a session token.

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::{FromRequestParts, Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header, request::Parts},
    routing::{delete, get, post, put},
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::AttendanceSummary;
use crate::error::PayrollError;
use crate::models::{Adjustment, AuditEntry, ChatMessage, Employee, PayrollRecord, Session};
use crate::service::{LoanView, PayrollPreview, Registration};

use super::request::{
    AttendanceRequest, ChatRequest, CompanyRegistration, EmployeeUpdate, ListQuery, LoginRequest,
    NewAdjustment, NewDepartment, NewEmployee, NewLoan, PinLoginRequest, WageChangeRequest,
};
use super::response::{ApiError, ApiErrorResponse, DepartmentView, HealthResponse};
use super::state::AppState;

type ApiResult<T> = Result<T, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/companies", post(register_company_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/pin", post(pin_login_handler))
        .route(
            "/departments",
            get(list_departments_handler).post(create_department_handler),
        )
        .route(
            "/employees",
            get(list_employees_handler).post(add_employee_handler),
        )
        .route(
            "/employees/:id",
            get(get_employee_handler)
                .patch(update_employee_handler)
                .delete(deactivate_employee_handler),
        )
        .route("/employees/:id/wage", post(change_wage_handler))
        .route("/employees/:id/attendance", put(mark_attendance_handler))
        .route("/attendance/summary", get(attendance_summary_handler))
        .route(
            "/adjustments",
            get(list_adjustments_handler).post(add_adjustment_handler),
        )
        .route("/adjustments/:id", delete(remove_adjustment_handler))
        .route("/loans", get(list_loans_handler).post(create_loan_handler))
        .route("/loans/:id", get(get_loan_handler))
        .route("/loans/:id/cancel", post(cancel_loan_handler))
        .route("/payroll/preview", get(preview_payroll_handler))
        .route("/payroll/close", post(close_pay_period_handler))
        .route("/payroll/records", get(list_records_handler))
        .route("/payroll/records/:id", get(get_record_handler))
        .route("/chat", get(list_messages_handler).post(post_message_handler))
        .route("/audit", get(list_audit_handler))
        .with_state(state)
}

/// The session of the signed-in caller, taken from the bearer token.
pub struct Authenticated(pub Session);

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .and_then(|token| Uuid::parse_str(token.trim()).ok());

        let Some(token) = token else {
            warn!(path = %parts.uri.path(), "Missing or malformed bearer token");
            return Err(PayrollError::unauthorized("missing or malformed bearer token").into());
        };

        let session = state.service().authenticate(token).await.map_err(|err| {
            warn!(path = %parts.uri.path(), error = %err, "Rejected session");
            ApiErrorResponse::from(err)
        })?;
        debug!(company_id = %session.company_id, path = %parts.uri.path(), "Authenticated request");
        Ok(Self(session))
    }
}

/// Unwraps a JSON body, turning rejections into API errors.
fn parse_json<T>(payload: Result<Json<T>, JsonRejection>, correlation_id: Uuid) -> ApiResult<T> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            Err(ApiErrorResponse::new(StatusCode::BAD_REQUEST, error))
        }
    }
}

/// Logs a failed operation and converts its error.
fn reject(correlation_id: Uuid, error: PayrollError) -> ApiErrorResponse {
    warn!(correlation_id = %correlation_id, error = %error, "Request failed");
    error.into()
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: state.config().settings().name.clone(),
    })
}

async fn register_company_handler(
    State(state): State<AppState>,
    payload: Result<Json<CompanyRegistration>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Registration>)> {
    let correlation_id = Uuid::new_v4();
    let request = parse_json(payload, correlation_id)?;
    info!(correlation_id = %correlation_id, slug = %request.slug, "Registering company");

    let registration = state
        .service()
        .register_company(request)
        .await
        .map_err(|e| reject(correlation_id, e))?;
    Ok((StatusCode::CREATED, Json(registration)))
}

async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<Session>> {
    let correlation_id = Uuid::new_v4();
    let request = parse_json(payload, correlation_id)?;
    info!(correlation_id = %correlation_id, slug = %request.slug, "Administrator login");

    state
        .service()
        .login_admin(&request.slug, &request.email, &request.password)
        .await
        .map(Json)
        .map_err(|e| reject(correlation_id, e))
}

async fn pin_login_handler(
    State(state): State<AppState>,
    payload: Result<Json<PinLoginRequest>, JsonRejection>,
) -> ApiResult<Json<Session>> {
    let correlation_id = Uuid::new_v4();
    let request = parse_json(payload, correlation_id)?;
    info!(
        correlation_id = %correlation_id,
        slug = %request.slug,
        department_id = %request.department_id,
        "Manager login"
    );

    state
        .service()
        .login_manager(&request.slug, request.department_id, &request.pin)
        .await
        .map(Json)
        .map_err(|e| reject(correlation_id, e))
}

async fn list_departments_handler(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
) -> ApiResult<Json<Vec<DepartmentView>>> {
    let departments = state.service().list_departments(&session).await?;
    Ok(Json(departments.into_iter().map(Into::into).collect()))
}

async fn create_department_handler(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
    payload: Result<Json<NewDepartment>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<DepartmentView>)> {
    let correlation_id = Uuid::new_v4();
    let request = parse_json(payload, correlation_id)?;
    info!(correlation_id = %correlation_id, company_id = %session.company_id, "Creating department");

    let department = state
        .service()
        .create_department(&session, request)
        .await
        .map_err(|e| reject(correlation_id, e))?;
    Ok((StatusCode::CREATED, Json(department.into())))
}

async fn list_employees_handler(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
) -> ApiResult<Json<Vec<Employee>>> {
    Ok(Json(state.service().list_employees(&session).await?))
}

async fn add_employee_handler(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
    payload: Result<Json<NewEmployee>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    let correlation_id = Uuid::new_v4();
    let request = parse_json(payload, correlation_id)?;
    info!(correlation_id = %correlation_id, company_id = %session.company_id, "Adding employee");

    let employee = state
        .service()
        .add_employee(&session, request)
        .await
        .map_err(|e| reject(correlation_id, e))?;
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn get_employee_handler(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Employee>> {
    Ok(Json(state.service().get_employee(&session, id).await?))
}

async fn update_employee_handler(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
    Path(id): Path<Uuid>,
    payload: Result<Json<EmployeeUpdate>, JsonRejection>,
) -> ApiResult<Json<Employee>> {
    let correlation_id = Uuid::new_v4();
    let update = parse_json(payload, correlation_id)?;
    info!(correlation_id = %correlation_id, employee_id = %id, "Updating employee");

    state
        .service()
        .update_employee(&session, id, update)
        .await
        .map(Json)
        .map_err(|e| reject(correlation_id, e))
}

async fn deactivate_employee_handler(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Employee>> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = %id, "Deactivating employee");

    state
        .service()
        .deactivate_employee(&session, id)
        .await
        .map(Json)
        .map_err(|e| reject(correlation_id, e))
}

async fn change_wage_handler(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
    Path(id): Path<Uuid>,
    payload: Result<Json<WageChangeRequest>, JsonRejection>,
) -> ApiResult<Json<Employee>> {
    let correlation_id = Uuid::new_v4();
    let request = parse_json(payload, correlation_id)?;
    info!(
        correlation_id = %correlation_id,
        employee_id = %id,
        daily_wage = %request.daily_wage,
        "Changing wage"
    );

    state
        .service()
        .change_wage(&session, id, request.daily_wage, request.effective_date)
        .await
        .map(Json)
        .map_err(|e| reject(correlation_id, e))
}

async fn mark_attendance_handler(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
    Path(id): Path<Uuid>,
    payload: Result<Json<AttendanceRequest>, JsonRejection>,
) -> ApiResult<Json<Employee>> {
    let correlation_id = Uuid::new_v4();
    let request = parse_json(payload, correlation_id)?;
    info!(
        correlation_id = %correlation_id,
        employee_id = %id,
        day = %request.day,
        present = request.present,
        "Marking attendance"
    );

    state
        .service()
        .mark_attendance(&session, id, request.day, request.present)
        .await
        .map(Json)
        .map_err(|e| reject(correlation_id, e))
}

async fn attendance_summary_handler(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
) -> ApiResult<Json<AttendanceSummary>> {
    Ok(Json(state.service().attendance_summary(&session).await?))
}

async fn list_adjustments_handler(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
) -> ApiResult<Json<Vec<Adjustment>>> {
    Ok(Json(state.service().list_adjustments(&session).await?))
}

async fn add_adjustment_handler(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
    payload: Result<Json<NewAdjustment>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Adjustment>)> {
    let correlation_id = Uuid::new_v4();
    let request = parse_json(payload, correlation_id)?;
    info!(
        correlation_id = %correlation_id,
        employee_id = %request.employee_id,
        kind = ?request.kind,
        "Adding adjustment"
    );

    let adjustment = state
        .service()
        .add_adjustment(&session, request)
        .await
        .map_err(|e| reject(correlation_id, e))?;
    Ok((StatusCode::CREATED, Json(adjustment)))
}

async fn remove_adjustment_handler(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Adjustment>> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, adjustment_id = %id, "Removing adjustment");

    state
        .service()
        .remove_adjustment(&session, id)
        .await
        .map(Json)
        .map_err(|e| reject(correlation_id, e))
}

async fn list_loans_handler(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
) -> ApiResult<Json<Vec<LoanView>>> {
    Ok(Json(state.service().list_loans(&session).await?))
}

async fn create_loan_handler(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
    payload: Result<Json<NewLoan>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<LoanView>)> {
    let correlation_id = Uuid::new_v4();
    let request = parse_json(payload, correlation_id)?;
    info!(
        correlation_id = %correlation_id,
        employee_id = %request.employee_id,
        amount = %request.amount,
        "Creating loan"
    );

    let loan = state
        .service()
        .create_loan(&session, request)
        .await
        .map_err(|e| reject(correlation_id, e))?;
    Ok((StatusCode::CREATED, Json(loan)))
}

async fn get_loan_handler(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<LoanView>> {
    Ok(Json(state.service().get_loan(&session, id).await?))
}

async fn cancel_loan_handler(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<LoanView>> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, loan_id = %id, "Cancelling loan");

    state
        .service()
        .cancel_loan(&session, id)
        .await
        .map(Json)
        .map_err(|e| reject(correlation_id, e))
}

async fn preview_payroll_handler(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
) -> ApiResult<Json<PayrollPreview>> {
    Ok(Json(state.service().preview_payroll(&session).await?))
}

async fn close_pay_period_handler(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
) -> ApiResult<(StatusCode, Json<PayrollRecord>)> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, company_id = %session.company_id, "Closing pay period");

    let record = state
        .service()
        .close_pay_period(&session)
        .await
        .map_err(|e| reject(correlation_id, e))?;
    info!(
        correlation_id = %correlation_id,
        record_id = %record.id,
        employees = record.calculations.len(),
        "Pay period archived"
    );
    Ok((StatusCode::CREATED, Json(record)))
}

async fn list_records_handler(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
) -> ApiResult<Json<Vec<PayrollRecord>>> {
    Ok(Json(state.service().list_payroll_records(&session).await?))
}

async fn get_record_handler(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PayrollRecord>> {
    Ok(Json(state.service().get_payroll_record(&session, id).await?))
}

async fn list_messages_handler(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<ChatMessage>>> {
    Ok(Json(state.service().list_messages(&session, query.limit).await?))
}

async fn post_message_handler(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ChatMessage>)> {
    let correlation_id = Uuid::new_v4();
    let request = parse_json(payload, correlation_id)?;

    let message = state
        .service()
        .post_message(&session, &request.body)
        .await
        .map_err(|e| reject(correlation_id, e))?;
    debug!(correlation_id = %correlation_id, message_id = %message.id, "Chat message posted");
    Ok((StatusCode::CREATED, Json(message)))
}

async fn list_audit_handler(
    State(state): State<AppState>,
    Authenticated(session): Authenticated,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<AuditEntry>>> {
    Ok(Json(state.service().list_audit(&session, query.limit).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::config::ConfigLoader;
    use crate::store::InMemoryStore;

    fn create_test_state() -> AppState {
        AppState::new(ConfigLoader::default(), Arc::new(InMemoryStore::new()))
    }

    fn registration_body() -> Value {
        json!({
            "name": "Acme Packing",
            "slug": "acme",
            "pay_frequency": "weekly",
            "period_start": "2026-01-05",
            "admin_name": "Rosa Admin",
            "admin_email": "rosa@acme.test",
            "admin_password": "s3cret-pass"
        })
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let router = create_router(create_test_state());
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let (status, body) = send(router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_register_returns_created_session() {
        let router = create_router(create_test_state());
        let (status, body) = send(router, post_json("/companies", &registration_body().to_string())).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["company"]["slug"], "acme");
        assert_eq!(body["session"]["role"]["kind"], "admin");
        assert!(body["session"]["token"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_router(create_test_state());
        let (status, body) = send(router, post_json("/companies", "{ invalid json }")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_value(body).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_field_returns_validation_error() {
        let router = create_router(create_test_state());
        let mut body = registration_body();
        body.as_object_mut().unwrap().remove("slug");

        let (status, body) = send(router, post_json("/companies", &body.to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["message"].as_str().unwrap().contains("slug"));
    }

    #[tokio::test]
    async fn test_missing_content_type_returns_400() {
        let router = create_router(create_test_state());
        let request = Request::builder()
            .method("POST")
            .uri("/companies")
            .body(Body::from(registration_body().to_string()))
            .unwrap();

        let (status, body) = send(router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "MISSING_CONTENT_TYPE");
    }

    #[tokio::test]
    async fn test_missing_token_returns_401() {
        let router = create_router(create_test_state());
        let request = Request::builder().uri("/employees").body(Body::empty()).unwrap();

        let (status, body) = send(router, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_unknown_token_returns_401() {
        let router = create_router(create_test_state());
        let request = Request::builder()
            .uri("/employees")
            .header("Authorization", format!("Bearer {}", Uuid::new_v4()))
            .body(Body::empty())
            .unwrap();

        let (status, _) = send(router, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_bad_login_returns_401() {
        let state = create_test_state();
        let router = create_router(state.clone());
        send(router, post_json("/companies", &registration_body().to_string())).await;

        let login = json!({ "slug": "acme", "email": "rosa@acme.test", "password": "wrong-password" });
        let (status, body) = send(create_router(state), post_json("/auth/login", &login.to_string())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
}
