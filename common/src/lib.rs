pub mod config;
pub mod models;
pub mod utils;

pub use self::config::*;
pub use self::models::*;
pub use self::utils::*;
