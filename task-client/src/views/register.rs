// task-client/src/views/register.rs
use crate::api::{AuthApi, RegisterForm};
use crate::routes::Route;

use super::{display_message, ViewAction};

const REGISTRATION_FAILED: &str = "Registration failed";

/// Registration form state and submit flow
pub struct RegisterView {
    auth: AuthApi,
    pub form: RegisterForm,
    error: Option<String>,
    loading: bool,
}

impl RegisterView {
    pub fn new(auth: AuthApi) -> Self {
        Self {
            auth,
            form: RegisterForm::default(),
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

    /// On success the user is sent to login; registering does not sign in
    pub async fn submit(&mut self) -> ViewAction {
        self.error = None;
        self.loading = true;
        let result = self.auth.register(&self.form).await;
        self.loading = false;

        match result {
            Ok(_) => ViewAction::Navigate(Route::Login),
            Err(e) => {
                self.error = Some(display_message(&e, REGISTRATION_FAILED));
                ViewAction::Stay
            }
        }
    }
}
