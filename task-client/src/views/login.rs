// task-client/src/views/login.rs
use crate::api::AuthApi;
use crate::routes::Route;

use super::{display_message, ViewAction};

const LOGIN_FAILED: &str = "Login failed";

/// Login form state and submit flow
pub struct LoginView {
    auth: AuthApi,
    pub email: String,
    pub password: String,
    error: Option<String>,
    loading: bool,
}

impl LoginView {
    pub fn new(auth: AuthApi) -> Self {
        Self {
            auth,
            email: String::new(),
            password: String::new(),
            error: None,
            loading: false,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub async fn submit(&mut self) -> ViewAction {
        self.error = None;
        self.loading = true;
        let result = self.auth.login(&self.email, &self.password).await;
        self.loading = false;

        match result {
            Ok(_) => {
                self.password.clear();
                ViewAction::Navigate(Route::Dashboard)
            },
            Err(e) => {
                tracing::debug!("Login failed: {}", e);
                self.error = Some(display_message(&e, LOGIN_FAILED));
                ViewAction::Stay
            }
        }
    }
}
