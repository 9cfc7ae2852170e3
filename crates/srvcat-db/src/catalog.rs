//! Database operations for the `server_catalog` table.

use rust_decimal::Decimal;
use sqlx::PgPool;
use srvcat_core::{CatalogEntry, CatalogPage, CatalogStore, FilterCriteria, HddType, NewCatalogEntry};

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `server_catalog` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CatalogRow {
    pub id: i64,
    pub model: String,
    pub ram_size: i32,
    pub ram_type: i16,
    pub hdd_size: i32,
    pub hdd_count: i32,
    pub hdd_type: i16,
    pub location: String,
    pub price: Decimal,
    pub currency: i16,
}

impl From<CatalogRow> for CatalogEntry {
    fn from(row: CatalogRow) -> Self {
        Self {
            id: row.id,
            model: row.model,
            ram_size_gb: row.ram_size,
            ram_type: row.ram_type,
            hdd_size_gb: row.hdd_size,
            hdd_count: row.hdd_count,
            hdd_type: row.hdd_type,
            location: row.location,
            price: row.price,
            currency: row.currency,
        }
    }
}

// Shared by the page and count queries so both see the same rows.
// Must agree with `FilterCriteria::matches`.
const FILTER_SQL: &str = "\
    WHERE ($1::BIGINT IS NULL OR hdd_size::BIGINT * hdd_count >= $1) \
      AND ($2::BIGINT IS NULL OR hdd_size::BIGINT * hdd_count <= $2) \
      AND (cardinality($3::INT[]) = 0 OR ram_size = ANY($3)) \
      AND ($4::SMALLINT IS NULL OR hdd_type = $4) \
      AND ($5::TEXT IS NULL OR location = $5)";

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Insert a validated batch in a single transaction.
///
/// Uses one `INSERT … SELECT * FROM UNNEST(…)` so the batch is written in a
/// single round-trip. Returns the number of rows inserted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails; nothing is committed.
pub async fn insert_catalog_entries(
    pool: &PgPool,
    entries: &[NewCatalogEntry],
) -> Result<u64, DbError> {
    if entries.is_empty() {
        return Ok(0);
    }

    let mut models: Vec<&str> = Vec::with_capacity(entries.len());
    let mut ram_sizes: Vec<i32> = Vec::with_capacity(entries.len());
    let mut ram_types: Vec<i16> = Vec::with_capacity(entries.len());
    let mut hdd_sizes: Vec<i32> = Vec::with_capacity(entries.len());
    let mut hdd_counts: Vec<i32> = Vec::with_capacity(entries.len());
    let mut hdd_types: Vec<i16> = Vec::with_capacity(entries.len());
    let mut locations: Vec<&str> = Vec::with_capacity(entries.len());
    let mut prices: Vec<Decimal> = Vec::with_capacity(entries.len());
    let mut currencies: Vec<i16> = Vec::with_capacity(entries.len());

    for entry in entries {
        models.push(&entry.model);
        ram_sizes.push(entry.ram_size_gb);
        ram_types.push(entry.ram_type.code());
        hdd_sizes.push(entry.hdd_size_gb);
        hdd_counts.push(entry.hdd_count);
        hdd_types.push(entry.hdd_type.code());
        locations.push(&entry.location);
        prices.push(entry.price);
        currencies.push(entry.currency.code());
    }

    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "INSERT INTO server_catalog \
             (model, ram_size, ram_type, hdd_size, hdd_count, hdd_type, location, price, currency) \
         SELECT * FROM UNNEST(\
              $1::text[], $2::int4[], $3::int2[], $4::int4[], $5::int4[], $6::int2[], \
              $7::text[], $8::numeric[], $9::int2[])",
    )
    .bind(&models)
    .bind(&ram_sizes)
    .bind(&ram_types)
    .bind(&hdd_sizes)
    .bind(&hdd_counts)
    .bind(&hdd_types)
    .bind(&locations)
    .bind(&prices)
    .bind(&currencies)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(result.rows_affected())
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Returns every distinct location, alphabetically.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_distinct_locations(pool: &PgPool) -> Result<Vec<String>, DbError> {
    let rows = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT location FROM server_catalog ORDER BY location",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns every distinct HDD type in use.
///
/// Codes with no known [`HddType`] are skipped with a warning.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_distinct_hdd_types(pool: &PgPool) -> Result<Vec<HddType>, DbError> {
    let codes = sqlx::query_scalar::<_, i16>(
        "SELECT DISTINCT hdd_type FROM server_catalog ORDER BY hdd_type",
    )
    .fetch_all(pool)
    .await?;

    Ok(codes
        .into_iter()
        .filter_map(|code| {
            let hdd_type = HddType::from_code(code);
            if hdd_type.is_none() {
                tracing::warn!(code, "skipping unknown hdd_type code");
            }
            hdd_type
        })
        .collect())
}

/// Returns one page of entries matching `criteria`, ordered by id, plus the
/// number of entries matching the filters across all pages.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either query fails.
pub async fn query_catalog_entries(
    pool: &PgPool,
    criteria: &FilterCriteria,
) -> Result<CatalogPage, DbError> {
    let hdd_type = criteria.hdd_type.map(HddType::code);
    let location = criteria.location.as_deref();

    let rows = sqlx::query_as::<_, CatalogRow>(&format!(
        "SELECT id, model, ram_size, ram_type, hdd_size, hdd_count, hdd_type, location, \
                price, currency \
         FROM server_catalog \
         {FILTER_SQL} \
         ORDER BY id ASC \
         LIMIT $6 OFFSET $7"
    ))
    .bind(criteria.min_storage_gb)
    .bind(criteria.max_storage_gb)
    .bind(&criteria.ram_sizes_gb)
    .bind(hdd_type)
    .bind(location)
    .bind(criteria.page.per_page)
    .bind(criteria.page.offset())
    .fetch_all(pool)
    .await?;

    let total = sqlx::query_scalar::<_, i64>(&format!(
        "SELECT COUNT(*) FROM server_catalog {FILTER_SQL}"
    ))
    .bind(criteria.min_storage_gb)
    .bind(criteria.max_storage_gb)
    .bind(&criteria.ram_sizes_gb)
    .bind(hdd_type)
    .bind(location)
    .fetch_one(pool)
    .await?;

    Ok(CatalogPage {
        entries: rows.into_iter().map(CatalogEntry::from).collect(),
        total,
    })
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// [`CatalogStore`] backed by a Postgres pool.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CatalogStore for PgCatalogStore {
    type Error = DbError;

    async fn insert_entries(&self, entries: &[NewCatalogEntry]) -> Result<u64, DbError> {
        insert_catalog_entries(&self.pool, entries).await
    }

    async fn distinct_locations(&self) -> Result<Vec<String>, DbError> {
        list_distinct_locations(&self.pool).await
    }

    async fn distinct_hdd_types(&self) -> Result<Vec<HddType>, DbError> {
        list_distinct_hdd_types(&self.pool).await
    }

    async fn query_entries(&self, criteria: &FilterCriteria) -> Result<CatalogPage, DbError> {
        query_catalog_entries(&self.pool, criteria).await
    }

    async fn health_check(&self) -> Result<(), DbError> {
        crate::health_check(&self.pool).await
    }
}
