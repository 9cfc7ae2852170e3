mod servers;
mod upload;

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use srvcat_core::{AppConfig, CatalogStore, Pagination};
use srvcat_ingest::IngestOptions;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, require_app_key, AuthState, RequestId, APP_KEY_HEADER};

pub struct AppState<S> {
    pub store: Arc<S>,
    pub ingest: IngestOptions,
    /// Upper bound applied to `per_page`; `None` leaves it uncapped.
    pub pagination_limit: Option<i64>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            ingest: self.ingest,
            pagination_limit: self.pagination_limit,
        }
    }
}

impl<S: CatalogStore> AppState<S> {
    pub fn new(store: S, config: &AppConfig) -> Self {
        Self {
            store: Arc::new(store),
            ingest: IngestOptions::from_app_config(config),
            pagination_limit: config.pagination_limit,
        }
    }
}

/// Response envelope shared by every endpoint. Absent parts are omitted.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            data: Some(data),
            pagination: None,
            message: None,
        }
    }

    #[must_use]
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Failure envelope: a human-readable `message` plus the raw `error` text.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub message: String,
    pub error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            error: error.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

pub(super) fn map_store_error(
    req_id: &RequestId,
    message: &str,
    error: &dyn std::error::Error,
) -> ApiError {
    tracing::error!(request_id = %req_id.0, error = %error, "{message}");
    ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, message, error.to_string())
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-csrf-token"),
            HeaderName::from_static(APP_KEY_HEADER),
        ])
        .expose_headers([header::LINK])
        .max_age(Duration::from_secs(300))
}

fn protected_router<S: CatalogStore + 'static>(
    auth: AuthState,
    upload_max_bytes: usize,
) -> Router<AppState<S>> {
    Router::new()
        .route(
            "/api/v1/upload",
            post(upload::upload_catalog::<S>).layer(DefaultBodyLimit::max(upload_max_bytes)),
        )
        .route("/api/v1/servers/list", get(servers::list_servers::<S>))
        .route(
            "/api/v1/servers/hdd-types",
            get(servers::list_hdd_types::<S>),
        )
        .route(
            "/api/v1/servers/locations",
            get(servers::list_locations::<S>),
        )
        .layer(axum::middleware::from_fn_with_state(auth, require_app_key))
}

pub fn build_app<S: CatalogStore + 'static>(
    state: AppState<S>,
    auth: AuthState,
    upload_max_bytes: usize,
) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health::<S>));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth, upload_max_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health<S: CatalogStore + 'static>(State(state): State<AppState<S>>) -> impl IntoResponse {
    match state.store.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::data(HealthData {
                status: "ok",
                database: "ok",
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::data(HealthData {
                    status: "degraded",
                    database: "unavailable",
                })),
            )
        }
    }
}
