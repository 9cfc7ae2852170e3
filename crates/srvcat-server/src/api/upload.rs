use axum::{
    body::Bytes,
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use srvcat_core::CatalogStore;
use srvcat_ingest::{ingest_catalog, ErrorKind, IngestError};

use super::{ApiError, ApiResponse, AppState};
use crate::middleware::RequestId;

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub(super) struct UploadSummary {
    inserted: u64,
}

pub(super) async fn upload_catalog<S: CatalogStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<ApiResponse<UploadSummary>>), ApiError> {
    let mut multipart = multipart.map_err(|e| {
        ApiError::new(StatusCode::BAD_REQUEST, "unable to parse form", e.body_text())
    })?;
    let bytes = read_file_field(&mut multipart).await?;

    let inserted = ingest_catalog(state.store.as_ref(), &bytes, state.ingest)
        .await
        .map_err(|e| map_ingest_error(&req_id, &e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(UploadSummary { inserted }).with_message("Catalog uploaded")),
    ))
}

async fn read_file_field(multipart: &mut Multipart) -> Result<Bytes, ApiError> {
    let form_error = |e: axum::extract::multipart::MultipartError| {
        ApiError::new(e.status(), "unable to parse form", e.body_text())
    };

    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        if field.name() == Some(FILE_FIELD) {
            return field.bytes().await.map_err(form_error);
        }
    }

    Err(ApiError::new(
        StatusCode::BAD_REQUEST,
        "file is required",
        "no \"file\" field in form",
    ))
}

fn map_ingest_error(req_id: &RequestId, error: &IngestError) -> ApiError {
    let status = if error.kind() == ErrorKind::Storage {
        tracing::error!(request_id = %req_id.0, error = %error, "catalog upload failed to store");
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        tracing::warn!(request_id = %req_id.0, error = %error, "catalog upload rejected");
        StatusCode::BAD_REQUEST
    };
    ApiError::new(status, "failed to upload file", error.to_string())
}
