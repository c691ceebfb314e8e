//! Company registration, login and session lookup.

use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    CompanyRegistration, PayrollService, Registration, expires_at, hash_secret, required_text,
    verify_secret,
};
use crate::error::{PayrollError, PayrollResult};
use crate::models::{AdminAccount, AuditAction, Company, Role, Session};

const MAX_SLUG_LENGTH: usize = 40;

impl PayrollService {
    /// Registers a company with its first administrator and signs them in.
    pub async fn register_company(&self, request: CompanyRegistration) -> PayrollResult<Registration> {
        let name = required_text("name", &request.name)?;
        let slug = validate_slug(&request.slug)?;
        let admin_name = required_text("admin_name", &request.admin_name)?;
        let admin_email = validate_email(&request.admin_email)?;

        let min_length = self.policy.min_password_length;
        if request.admin_password.chars().count() < min_length {
            return Err(PayrollError::validation(
                "admin_password",
                format!("must be at least {} characters", min_length),
            ));
        }
        // Rejects a frequency/start combination that has no representable period.
        request.pay_frequency.period_starting(request.period_start)?;

        let now = Utc::now();
        let company = Company {
            id: Uuid::new_v4(),
            name,
            slug,
            pay_frequency: request.pay_frequency,
            current_period_start: request.period_start,
            created_at: now,
        };
        let admin = AdminAccount {
            id: Uuid::new_v4(),
            company_id: company.id,
            name: admin_name,
            email: admin_email,
            password_hash: hash_secret(request.admin_password.clone()).await?,
            created_at: now,
        };

        self.store.insert_company(company.clone(), admin.clone()).await?;
        info!(company_id = %company.id, slug = %company.slug, "Company registered");

        self.audit_as(
            company.id,
            &admin.name,
            AuditAction::CompanyRegistered,
            company.id,
            json!({ "slug": company.slug, "pay_frequency": company.pay_frequency }),
        )
        .await?;

        let session = self.open_session(company.id, Role::Admin, admin.name).await;
        Ok(Registration { company, session })
    }

    /// Signs an administrator in with email and password.
    pub async fn login_admin(&self, slug: &str, email: &str, password: &str) -> PayrollResult<Session> {
        let company = self.login_company(slug).await?;
        let admin = self.store.find_admin(company.id, email.trim()).await?;

        let verified = match &admin {
            Some(admin) => verify_secret(password.to_string(), admin.password_hash.clone()).await,
            None => false,
        };

        match admin {
            Some(admin) if verified => {
                info!(company_id = %company.id, "Administrator signed in");
                Ok(self.open_session(company.id, Role::Admin, admin.name).await)
            }
            _ => {
                warn!(company_id = %company.id, "Rejected administrator login");
                Err(invalid_credentials())
            }
        }
    }

    /// Signs a department manager in with the department's PIN.
    pub async fn login_manager(&self, slug: &str, department_id: Uuid, pin: &str) -> PayrollResult<Session> {
        let company = self.login_company(slug).await?;
        let department = match self.store.get_department(company.id, department_id).await {
            Ok(department) => department,
            Err(PayrollError::DepartmentNotFound { .. }) => return Err(invalid_credentials()),
            Err(e) => return Err(e),
        };

        if !verify_secret(pin.to_string(), department.pin_hash.clone()).await {
            warn!(company_id = %company.id, department_id = %department.id, "Rejected manager login");
            return Err(invalid_credentials());
        }

        info!(company_id = %company.id, department_id = %department.id, "Manager signed in");
        let role = Role::Manager {
            department_id: department.id,
        };
        Ok(self.open_session(company.id, role, department.manager_name).await)
    }

    /// Resolves a bearer token to its live session.
    pub async fn authenticate(&self, token: Uuid) -> PayrollResult<Session> {
        let session = self.sessions.read().await.get(&token).cloned();
        match session {
            Some(session) if session.expires_at > Utc::now() => Ok(session),
            Some(_) => {
                self.sessions.write().await.remove(&token);
                Err(PayrollError::unauthorized("session expired"))
            }
            None => Err(PayrollError::unauthorized("unknown session")),
        }
    }

    async fn login_company(&self, slug: &str) -> PayrollResult<Company> {
        match self.store.find_company_by_slug(slug.trim()).await {
            Err(PayrollError::CompanyNotFound { .. }) => Err(invalid_credentials()),
            other => other,
        }
    }

    async fn open_session(&self, company_id: Uuid, role: Role, display_name: String) -> Session {
        let session = Session {
            token: Uuid::new_v4(),
            company_id,
            role,
            display_name,
            expires_at: expires_at(self.session_ttl),
        };

        let mut sessions = self.sessions.write().await;
        let now = Utc::now();
        sessions.retain(|_, s| s.expires_at > now);
        sessions.insert(session.token, session.clone());
        session
    }
}

fn invalid_credentials() -> PayrollError {
    PayrollError::unauthorized("invalid credentials")
}

fn validate_slug(slug: &str) -> PayrollResult<String> {
    let slug = slug.trim();
    let allowed = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-';

    if slug.is_empty() || slug.len() > MAX_SLUG_LENGTH {
        return Err(PayrollError::validation(
            "slug",
            format!("must be 1 to {} characters", MAX_SLUG_LENGTH),
        ));
    }
    if !slug.chars().all(allowed) || slug.starts_with('-') || slug.ends_with('-') {
        return Err(PayrollError::validation(
            "slug",
            "must contain only lowercase letters, digits and inner dashes",
        ));
    }
    Ok(slug.to_string())
}

fn validate_email(email: &str) -> PayrollResult<String> {
    let email = required_text("admin_email", email)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(PayrollError::validation("admin_email", "must be an email address")),
    }
}
