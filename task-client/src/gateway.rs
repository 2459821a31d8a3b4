// task-client/src/gateway.rs
use common::Config;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::error::{ApiError, BuildError};
use crate::session_guard::SessionGuard;

pub use reqwest::Method;

/// Single chokepoint for every call to the task service.
///
/// Attaches the stored bearer token, classifies the response and, on 401,
/// invalidates the session before the caller sees the error.
pub struct ApiGateway {
    client: reqwest::Client,
    base_url: Url,
    guard: Arc<SessionGuard>,
}

impl ApiGateway {
    pub fn new(config: &Config, guard: Arc<SessionGuard>) -> Result<Self, BuildError> {
        Self::with_timeout(&config.api_base_url, config.request_timeout(), guard)
    }

    pub fn with_timeout(
        base_url: &str,
        timeout: Duration,
        guard: Arc<SessionGuard>,
    ) -> Result<Self, BuildError> {
        let base_url = parse_base_url(base_url)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;

        tracing::info!("API gateway targeting {} (timeout {:?})", base_url, timeout);

        Ok(Self {
            client,
            base_url,
            guard,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issue `method path` with an optional JSON body and return the decoded
    /// payload. Empty bodies decode to `Value::Null`; non-JSON bodies come
    /// back as `Value::String`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let url = resolve_url(&self.base_url, path);

        // Read the credential right before sending; nothing is kept afterwards
        let snapshot = self.guard.snapshot();
        let mut builder = self.client.request(method.clone(), url);
        if let Some(credential) = &snapshot.credential {
            builder = builder.header(AUTHORIZATION, credential.bearer());
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let authenticated = snapshot.credential.is_some();
        drop(snapshot.credential);

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("{} {} failed before a response arrived: {}", method, path, e);
                return Err(ApiError::from_transport(e));
            }
        };

        let status = response.status();
        let text = response.text().await.map_err(ApiError::from_transport)?;
        tracing::debug!(
            "{} {} -> {} (credentialed: {})",
            method,
            path,
            status.as_u16(),
            authenticated
        );

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("{} {} rejected with 401, invalidating session", method, path);
            self.guard.invalidate_generation(snapshot.generation);
            return Err(ApiError::Unauthorized {
                message: service_message(&text, status),
            });
        }

        if !status.is_success() {
            return Err(ApiError::RequestRejected {
                status: Some(status.as_u16()),
                message: service_message(&text, status),
            });
        }

        Ok(parse_payload(&text))
    }

    /// Typed wrapper over [`ApiGateway::request`]
    pub async fn request_json<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = match body {
            Some(body) => Some(serde_json::to_value(body).map_err(|e| {
                ApiError::rejected_locally(format!("request body could not be encoded: {}", e))
            })?),
            None => None,
        };

        let payload = self.request(method, path, body.as_ref()).await?;
        serde_json::from_value(payload).map_err(|e| ApiError::InvalidResponse {
            message: e.to_string(),
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, BuildError> {
    let url = Url::parse(raw.trim()).map_err(|source| BuildError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(BuildError::UnsupportedScheme(other.to_string())),
    }
}

/// Append `path` to the base address, keeping the base's own path prefix.
/// Each segment is percent-encoded on the way in.
pub(crate) fn resolve_url(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            segments.push(segment);
        }
    }
    url
}

/// Message to show for a non-success response: `message`, then `error`,
/// then the raw body, then the canonical status text
pub(crate) fn service_message(body: &str, status: StatusCode) -> String {
    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(Value::String(message)) = fields.get(key) {
                if !message.is_empty() {
                    return message.clone();
                }
            }
        }
    } else if !body.trim().is_empty() {
        return body.trim().to_string();
    }

    status.canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

pub(crate) fn parse_payload(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}
