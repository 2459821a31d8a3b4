// common/src/models/auth.rs
use serde::{Deserialize, Serialize};

use super::credential::{Credential, Subject};

/// Body for `POST /auth/login`
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful `POST /auth/login` payload
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl LoginResponse {
    /// Returns `None` when the service answered without a usable token
    pub fn into_credential(self) -> Option<Credential> {
        Credential::new(
            self.token,
            Subject {
                id: self.id,
                name: self.name,
                email: self.email,
            },
        )
    }
}

/// Body for `POST /auth/register`
#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}
