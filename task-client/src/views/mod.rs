// task-client/src/views/mod.rs
pub mod dashboard;
pub mod login;
pub mod register;

pub use dashboard::DashboardView;
pub use login::LoginView;
pub use register::RegisterView;

use crate::error::ApiError;
use crate::routes::Route;

/// What the view layer should do after handling a user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    Stay,
    /// The same action is already in flight; nothing was sent
    Busy,
    Navigate(Route),
}

/// Message shown for a failed call; transport and decoding failures fall
/// back to the view's generic text
pub(crate) fn display_message(err: &ApiError, fallback: &str) -> String {
    match err {
        ApiError::Unauthorized { message } | ApiError::RequestRejected { message, .. }
            if !message.trim().is_empty() => message.clone(),
        _ => fallback.to_string(),
    }
}
