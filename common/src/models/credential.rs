// common/src/models/credential.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimal identity of the authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Bearer token plus the subject it was issued to.
///
/// A `Credential` always carries a non-empty token; there is no way to
/// construct or deserialize a half-valid one.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCredential")]
pub struct Credential {
    token: String,
    subject: Subject,
}

#[derive(Deserialize)]
struct RawCredential {
    token: String,
    subject: Subject,
}

impl TryFrom<RawCredential> for Credential {
    type Error = &'static str;

    fn try_from(raw: RawCredential) -> Result<Self, Self::Error> {
        Credential::new(raw.token, raw.subject).ok_or("credential token must not be empty")
    }
}

impl Credential {
    /// Returns `None` when the token is empty or blank
    pub fn new(token: impl Into<String>, subject: Subject) -> Option<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return None;
        }
        Some(Self { token, subject })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

// Keep tokens out of logs
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("subject", &self.subject)
            .finish()
    }
}
