// task-client/src/api/mod.rs
pub mod auth;
pub mod tasks;

pub use auth::{AuthApi, RegisterForm};
pub use tasks::TasksApi;
