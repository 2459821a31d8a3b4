// task-client/src/routes.rs
use std::fmt;

use crate::boundary::{Admission, Gate, ProtectedBoundary};

/// Views the client knows how to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    CreateTask,
    EditTask(String),
}

/// Outcome of resolving a raw path against the routing table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Route(Route),
    Redirect(Route),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::CreateTask => "/create-task".to_string(),
            Route::EditTask(id) => format!("/edit-task/{}", id),
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Dashboard | Route::CreateTask | Route::EditTask(_))
    }

    /// Map a path to a route. The root and unknown paths redirect to login.
    pub fn resolve(path: &str) -> Resolution {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["login"] => Resolution::Route(Route::Login),
            ["register"] => Resolution::Route(Route::Register),
            ["dashboard"] => Resolution::Route(Route::Dashboard),
            ["create-task"] => Resolution::Route(Route::CreateTask),
            ["edit-task", id] => Resolution::Route(Route::EditTask((*id).to_string())),
            _ => Resolution::Redirect(Route::Login),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Where a navigation ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Show `route`. Protected routes carry the admission they were entered with.
    Render {
        route: Route,
        admission: Option<Admission>,
    },
    Redirect(Route),
}

/// Routing table with the protected boundary applied on every navigation
#[derive(Clone)]
pub struct Router {
    boundary: ProtectedBoundary,
}

impl Router {
    pub fn new(boundary: ProtectedBoundary) -> Self {
        Self { boundary }
    }

    pub fn navigate(&self, path: &str) -> Navigation {
        let route = match Route::resolve(path) {
            Resolution::Route(route) => route,
            Resolution::Redirect(target) => {
                tracing::debug!("No route for {}, redirecting to {}", path, target);
                return Navigation::Redirect(target);
            }
        };

        if !route.is_protected() {
            return Navigation::Render { route, admission: None };
        }

        match self.boundary.enter() {
            Gate::Admitted(admission) => Navigation::Render {
                route,
                admission: Some(admission),
            },
            Gate::Redirect(target) => Navigation::Redirect(target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_table() {
        assert_eq!(Route::resolve("/"), Resolution::Redirect(Route::Login));
        assert_eq!(Route::resolve("/login"), Resolution::Route(Route::Login));
        assert_eq!(Route::resolve("/register/"), Resolution::Route(Route::Register));
        assert_eq!(Route::resolve("/dashboard?tab=all"), Resolution::Route(Route::Dashboard));
        assert_eq!(Route::resolve("/create-task"), Resolution::Route(Route::CreateTask));
        assert_eq!(
            Route::resolve("/edit-task/65f0"),
            Resolution::Route(Route::EditTask("65f0".into()))
        );
        assert_eq!(Route::resolve("/nowhere"), Resolution::Redirect(Route::Login));
        assert_eq!(Route::resolve("/edit-task"), Resolution::Redirect(Route::Login));
    }

    #[test]
    fn test_protected_routes() {
        assert!(!Route::Login.is_protected());
        assert!(!Route::Register.is_protected());
        assert!(Route::Dashboard.is_protected());
        assert!(Route::EditTask("1".into()).is_protected());
        assert_eq!(Route::EditTask("1".into()).to_string(), "/edit-task/1");
    }
}
