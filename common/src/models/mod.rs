// common/src/models/mod.rs
pub mod auth;
pub mod credential;
pub mod task;

pub use auth::*;
pub use credential::*;
pub use task::*;
