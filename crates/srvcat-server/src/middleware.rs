use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use srvcat_core::AppConfig;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::api::ApiError;

pub const APP_KEY_HEADER: &str = "app-key";

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// App-key auth settings used by middleware.
#[derive(Clone)]
pub struct AuthState {
    app_key: Option<Arc<str>>,
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("enabled", &self.enabled())
            .finish()
    }
}

impl AuthState {
    /// Builds auth settings from `SRVCAT_APP_KEY`.
    ///
    /// In development, a missing key disables auth for local iteration.
    /// In non-development envs, a missing key fails startup.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        match config.app_key.as_deref() {
            Some(key) => Ok(Self::with_key(key)),
            None if config.env.is_development() => {
                tracing::warn!("SRVCAT_APP_KEY not set; App-key auth disabled in development");
                Ok(Self::disabled())
            }
            None => anyhow::bail!("SRVCAT_APP_KEY is required outside development"),
        }
    }

    #[must_use]
    pub fn with_key(key: &str) -> Self {
        Self {
            app_key: Some(Arc::from(key)),
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self { app_key: None }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.app_key.is_some()
    }

    fn allows(&self, candidate: &str) -> bool {
        self.app_key
            .as_deref()
            .is_some_and(|key| bool::from(key.as_bytes().ct_eq(candidate.as_bytes())))
    }
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware enforcing the `App-key` header when auth is enabled.
///
/// A missing or blank header is a 400; a key that does not match is a 401.
pub async fn require_app_key(State(auth): State<AuthState>, req: Request, next: Next) -> Response {
    if !auth.enabled() {
        return next.run(req).await;
    }

    match extract_app_key(req.headers()) {
        None => ApiError::new(
            StatusCode::BAD_REQUEST,
            "App-key missing in header",
            "App-key missing in header",
        )
        .into_response(),
        Some(key) if auth.allows(key) => next.run(req).await,
        Some(_) => {
            tracing::warn!("rejected request with invalid App-key");
            ApiError::new(StatusCode::UNAUTHORIZED, "Invalid App-key", "Invalid App-key")
                .into_response()
        }
    }
}

fn extract_app_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(APP_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.trim().is_empty())
}
