// task-client/src/error.rs
use thiserror::Error;

/// Failure classes surfaced to views by every API call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthorized,
    RequestRejected,
    Unreachable,
    InvalidResponse,
}

#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The service answered 401. The session has already been invalidated
    /// by the time the caller sees this.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// Validation or business rejection, message passed through as sent.
    /// `status` is `None` for checks performed before any request is issued.
    #[error("request rejected: {message}")]
    RequestRejected { status: Option<u16>, message: String },

    /// No response was received (DNS, refused connection, timeout)
    #[error("service unreachable: {message}")]
    Unreachable { message: String },

    /// A successful response whose body did not have the expected shape
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Unauthorized { .. } => ErrorKind::Unauthorized,
            ApiError::RequestRejected { .. } => ErrorKind::RequestRejected,
            ApiError::Unreachable { .. } => ErrorKind::Unreachable,
            ApiError::InvalidResponse { .. } => ErrorKind::InvalidResponse,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Unauthorized { message }
            | ApiError::RequestRejected { message, .. }
            | ApiError::Unreachable { message }
            | ApiError::InvalidResponse { message } => message,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    pub(crate) fn rejected_locally(message: impl Into<String>) -> Self {
        ApiError::RequestRejected {
            status: None,
            message: message.into(),
        }
    }

    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            err.to_string()
        };
        ApiError::Unreachable { message }
    }
}

/// Errors raised while wiring the client together
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid base url {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported base url scheme {0:?}, expected http or https")]
    UnsupportedScheme(String),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Config(#[from] common::ConfigError),
}
