// task-client/src/boundary.rs
use std::future::Future;
use std::sync::Arc;

use crate::error::ApiError;
use crate::routes::Route;
use crate::session_guard::SessionGuard;

/// Proof that a protected view was entered under a live session.
/// Only valid for the session generation it was issued in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    generation: u64,
}

impl Admission {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of entering a protected view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    Admitted(Admission),
    Redirect(Route),
}

/// What a protected view should do with the outcome of one of its calls
#[derive(Debug, Clone)]
pub enum ViewOutcome<T> {
    Render(T),
    Failed(ApiError),
    Redirect(Route),
}

impl<T> ViewOutcome<T> {
    pub fn is_redirect(&self) -> bool {
        matches!(self, ViewOutcome::Redirect(_))
    }
}

/// Route-level gate in front of every protected view
#[derive(Clone)]
pub struct ProtectedBoundary {
    guard: Arc<SessionGuard>,
}

impl ProtectedBoundary {
    pub fn new(guard: Arc<SessionGuard>) -> Self {
        Self { guard }
    }

    /// Check the session on entry. Must be called on every navigation into a
    /// protected view, not cached.
    pub fn enter(&self) -> Gate {
        let snapshot = self.guard.snapshot();
        if snapshot.credential.is_some() {
            Gate::Admitted(Admission {
                generation: snapshot.generation,
            })
        } else {
            tracing::debug!("Protected view entered without a session, redirecting to login");
            Gate::Redirect(Route::Login)
        }
    }

    /// Whether the session an admission was issued under is still live
    pub fn is_current(&self, admission: &Admission) -> bool {
        self.guard.generation() == admission.generation && self.guard.currently_authenticated()
    }

    /// Decide what to do with a call result. A redirect wins over any result
    /// that lands after the session it was issued under has ended.
    pub fn settle<T>(&self, admission: &Admission, result: Result<T, ApiError>) -> ViewOutcome<T> {
        match result {
            Err(ApiError::Unauthorized { .. }) => ViewOutcome::Redirect(Route::Login),
            _ if !self.is_current(admission) => {
                tracing::debug!(
                    "Discarding result from ended session generation {}",
                    admission.generation
                );
                ViewOutcome::Redirect(Route::Login)
            },
            Ok(value) => ViewOutcome::Render(value),
            Err(e) => ViewOutcome::Failed(e),
        }
    }

    /// Render gate: enter, run the view's loader only when admitted, then
    /// settle its result
    pub async fn mount<T, F, Fut>(&self, load: F) -> (Option<Admission>, ViewOutcome<T>)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let admission = match self.enter() {
            Gate::Admitted(admission) => admission,
            Gate::Redirect(route) => return (None, ViewOutcome::Redirect(route)),
        };

        let result = load().await;
        (Some(admission), self.settle(&admission, result))
    }

    /// Resolves once the admitted session ends, for views that stay mounted
    /// while background calls run
    pub async fn wait_for_redirect(&self, admission: &Admission) -> Route {
        let mut rx = self.guard.subscribe();
        loop {
            if !self.is_current(admission) {
                return Route::Login;
            }
            if rx.changed().await.is_err() {
                return Route::Login;
            }
        }
    }
}
