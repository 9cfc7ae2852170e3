//! Catalog entries, list criteria, and the storage seam they flow through.

use std::future::Future;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::codes::{Currency, HddType, RamType};

pub const DEFAULT_PER_PAGE: i64 = 10;
pub const DEFAULT_PAGE_NO: i64 = 1;

/// A stored inventory item.
///
/// Type columns hold the raw codes read back from storage; unrecognized
/// codes are tolerated here and degrade at display time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: i64,
    pub model: String,
    pub ram_size_gb: i32,
    pub ram_type: i16,
    pub hdd_size_gb: i32,
    pub hdd_count: i32,
    pub hdd_type: i16,
    pub location: String,
    pub price: Decimal,
    pub currency: i16,
}

impl CatalogEntry {
    /// Total raw capacity in GB (`hdd_size_gb * hdd_count`).
    #[must_use]
    pub fn storage_gb(&self) -> i64 {
        i64::from(self.hdd_size_gb) * i64::from(self.hdd_count)
    }
}

/// A validated entry produced by ingestion, not yet assigned an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCatalogEntry {
    pub model: String,
    pub ram_size_gb: i32,
    pub ram_type: RamType,
    pub hdd_size_gb: i32,
    pub hdd_count: i32,
    pub hdd_type: HddType,
    pub location: String,
    pub price: Decimal,
    pub currency: Currency,
}

/// Caller-supplied page size and 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub per_page: i64,
    pub page_no: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            page_no: DEFAULT_PAGE_NO,
        }
    }
}

impl PageRequest {
    /// Missing or non-positive values fall back to 10 per page, page 1.
    #[must_use]
    pub fn new(per_page: Option<i64>, page_no: Option<i64>) -> Self {
        Self {
            per_page: per_page.filter(|n| *n > 0).unwrap_or(DEFAULT_PER_PAGE),
            page_no: page_no.filter(|n| *n > 0).unwrap_or(DEFAULT_PAGE_NO),
        }
    }

    /// Clamps `per_page` to `limit` when one is configured.
    #[must_use]
    pub fn capped(self, limit: Option<i64>) -> Self {
        match limit {
            Some(max) if self.per_page > max => Self {
                per_page: max,
                ..self
            },
            _ => self,
        }
    }

    /// Zero-based row offset: `page_no * per_page - per_page`.
    #[must_use]
    pub fn offset(&self) -> i64 {
        self.page_no
            .saturating_mul(self.per_page)
            .saturating_sub(self.per_page)
    }

    #[must_use]
    pub fn with_total(self, total: i64) -> Pagination {
        Pagination {
            per_page: self.per_page,
            page_no: self.page_no,
            total,
        }
    }
}

/// Pagination block of the list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub per_page: i64,
    pub page_no: i64,
    pub total: i64,
}

/// Optional list filters plus pagination. All present predicates are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Inclusive lower bound on total storage, in GB.
    pub min_storage_gb: Option<i64>,
    /// Inclusive upper bound on total storage, in GB.
    pub max_storage_gb: Option<i64>,
    /// Entry matches if its RAM size equals any of these. Empty means no filter.
    pub ram_sizes_gb: Vec<i32>,
    pub hdd_type: Option<HddType>,
    pub location: Option<String>,
    pub page: PageRequest,
}

impl FilterCriteria {
    /// Evaluates the filter predicates (not pagination) against one entry.
    ///
    /// This is the in-memory form of the SQL `WHERE` clause used by the
    /// Postgres store; stores without a query language filter with it.
    #[must_use]
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        let storage = entry.storage_gb();
        self.min_storage_gb.is_none_or(|min| storage >= min)
            && self.max_storage_gb.is_none_or(|max| storage <= max)
            && (self.ram_sizes_gb.is_empty() || self.ram_sizes_gb.contains(&entry.ram_size_gb))
            && self.hdd_type.is_none_or(|t| t.code() == entry.hdd_type)
            && self
                .location
                .as_deref()
                .is_none_or(|loc| loc == entry.location)
    }
}

/// One page of entries and the number of entries matching the filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogPage {
    pub entries: Vec<CatalogEntry>,
    pub total: i64,
}

/// Persistence collaborator for the catalog.
///
/// `insert_entries` must be atomic: either every entry is stored or none is.
pub trait CatalogStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn insert_entries(
        &self,
        entries: &[NewCatalogEntry],
    ) -> impl Future<Output = Result<u64, Self::Error>> + Send;

    fn distinct_locations(&self) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send;

    fn distinct_hdd_types(&self)
        -> impl Future<Output = Result<Vec<HddType>, Self::Error>> + Send;

    fn query_entries(
        &self,
        criteria: &FilterCriteria,
    ) -> impl Future<Output = Result<CatalogPage, Self::Error>> + Send;

    /// Verifies the backing storage is reachable. Stores with nothing to
    /// check keep the default.
    fn health_check(&self) -> impl Future<Output = Result<(), Self::Error>> + Send {
        async { Ok(()) }
    }
}
