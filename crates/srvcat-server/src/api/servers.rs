use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use srvcat_core::{CatalogListItem, CatalogStore, FilterCriteria, HddType, PageRequest};
use srvcat_ingest::{parse_ram_set, parse_storage_bound};

use super::{map_store_error, ApiError, ApiResponse, AppState};
use crate::middleware::RequestId;

/// Raw list parameters. Everything is read as text so a malformed value
/// falls back to "absent" instead of rejecting the request.
#[derive(Debug, Default)]
pub(super) struct ListQuery {
    pub per_page: Option<String>,
    pub page_no: Option<String>,
    pub min_storage: Option<String>,
    pub max_storage: Option<String>,
    pub ram: Option<String>,
    pub hdd_type: Option<String>,
    pub location: Option<String>,
}

impl ListQuery {
    /// Collects known keys from decoded query pairs. A repeated key keeps its
    /// first value; unknown keys are ignored.
    pub(super) fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "per_page" => &mut query.per_page,
                "page_no" => &mut query.page_no,
                "min_storage" => &mut query.min_storage,
                "max_storage" => &mut query.max_storage,
                "ram" => &mut query.ram,
                "hdd_type" => &mut query.hdd_type,
                "location" => &mut query.location,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    pub(super) fn into_criteria(self, pagination_limit: Option<i64>) -> FilterCriteria {
        let page = PageRequest::new(
            parse_int(self.per_page.as_deref()),
            parse_int(self.page_no.as_deref()),
        )
        .capped(pagination_limit);

        FilterCriteria {
            min_storage_gb: non_empty(self.min_storage.as_deref())
                .and_then(|s| parse_storage_bound(s).ok()),
            max_storage_gb: non_empty(self.max_storage.as_deref())
                .and_then(|s| parse_storage_bound(s).ok()),
            ram_sizes_gb: non_empty(self.ram.as_deref())
                .map(parse_ram_set)
                .unwrap_or_default(),
            hdd_type: non_empty(self.hdd_type.as_deref()).and_then(|s| s.parse::<HddType>().ok()),
            location: self.location.filter(|s| !s.is_empty()),
            page,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

fn parse_int(value: Option<&str>) -> Option<i64> {
    value.and_then(|s| s.trim().parse::<i64>().ok())
}

pub(super) async fn list_servers<S: CatalogStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ApiResponse<Vec<CatalogListItem>>>, ApiError> {
    let criteria = ListQuery::from_pairs(pairs).into_criteria(state.pagination_limit);

    let page = state
        .store
        .query_entries(&criteria)
        .await
        .map_err(|e| map_store_error(&req_id, "unable to fetch servers", &e))?;

    if page.entries.is_empty() {
        return Err(ApiError::new(
            StatusCode::NOT_FOUND,
            "no server found with these configs",
            "server not found",
        ));
    }

    let data: Vec<CatalogListItem> = page.entries.iter().map(CatalogListItem::from).collect();
    Ok(Json(
        ApiResponse::data(data).with_pagination(criteria.page.with_total(page.total)),
    ))
}

pub(super) async fn list_hdd_types<S: CatalogStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<&'static str>>>, ApiError> {
    let types = state
        .store
        .distinct_hdd_types()
        .await
        .map_err(|e| map_store_error(&req_id, "unable to fetch hdd types", &e))?;

    let mut names: Vec<&'static str> = types.into_iter().map(HddType::as_str).collect();
    names.sort_unstable();
    names.dedup();
    Ok(Json(ApiResponse::data(names)))
}

pub(super) async fn list_locations<S: CatalogStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let locations = state
        .store
        .distinct_locations()
        .await
        .map_err(|e| map_store_error(&req_id, "unable to fetch locations", &e))?;

    Ok(Json(ApiResponse::data(locations)))
}
