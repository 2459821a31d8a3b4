// task-client/src/api/auth.rs
use common::models::auth::{LoginRequest, LoginResponse, RegisterRequest};
use common::models::credential::Credential;
use serde_json::Value;
use std::sync::Arc;

use crate::error::ApiError;
use crate::gateway::{ApiGateway, Method};
use crate::session_guard::SessionGuard;

pub const PASSWORD_MISMATCH: &str = "Passwords do not match";

/// Registration input as collected from the user
#[derive(Clone, Default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Login, registration and logout flows
#[derive(Clone)]
pub struct AuthApi {
    gateway: Arc<ApiGateway>,
    guard: Arc<SessionGuard>,
}

impl AuthApi {
    pub fn new(gateway: Arc<ApiGateway>, guard: Arc<SessionGuard>) -> Self {
        Self { gateway, guard }
    }

    /// Exchange email and password for a credential and establish the session
    pub async fn login(&self, email: &str, password: &str) -> Result<Credential, ApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response: LoginResponse = self.gateway
            .request_json(Method::POST, "/auth/login", Some(&request))
            .await?;

        let credential = response.into_credential().ok_or_else(|| ApiError::InvalidResponse {
            message: "login response did not include a token".into(),
        })?;

        self.guard.establish(credential.clone());
        Ok(credential)
    }

    /// Create an account. Does not log in; callers send the user to login next.
    pub async fn register(&self, form: &RegisterForm) -> Result<Value, ApiError> {
        if form.password != form.confirm_password {
            return Err(ApiError::rejected_locally(PASSWORD_MISMATCH));
        }

        let request = RegisterRequest {
            name: form.name.clone(),
            email: form.email.clone(),
            password: form.password.clone(),
        };

        let created: Value = self.gateway
            .request_json(Method::POST, "/auth/register", Some(&request))
            .await?;

        tracing::info!("Registered account for {}", form.email);
        Ok(created)
    }

    /// Local logout; the service keeps no session to tear down
    pub fn logout(&self) {
        self.guard.invalidate();
    }
}
