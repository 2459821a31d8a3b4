// task-client/src/lib.rs
pub mod api;
pub mod boundary;
pub mod client;
pub mod credential_store;
pub mod error;
pub mod gateway;
pub mod routes;
pub mod session_guard;
pub mod storage;
pub mod views;

pub use boundary::{Admission, Gate, ProtectedBoundary, ViewOutcome};
pub use client::TaskClient;
pub use credential_store::CredentialStore;
pub use error::{ApiError, BuildError, ErrorKind};
pub use gateway::{ApiGateway, Method};
pub use routes::{Navigation, Resolution, Route, Router};
pub use session_guard::{SessionGuard, SessionState};
pub use storage::LocalStorage;
pub use views::ViewAction;
