//! Turns an uploaded workbook into validated catalog entries and stores them
//! as one batch.
//!
//! Validation is a single synchronous pass over every row. The first problem
//! aborts the upload; nothing reaches the store unless every row is valid.

use srvcat_core::{AppConfig, CatalogStore, Currency, HddType, NewCatalogEntry, RamType};

use crate::error::{Column, FieldError, IngestError};
use crate::parse::{parse_hdd, parse_price, parse_ram};
use crate::sheet::read_first_sheet;

pub const EXPECTED_HEADER: [&str; 5] = ["Model", "RAM", "HDD", "Location", "Price"];
pub const DEFAULT_MAX_ROWS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestOptions {
    /// Maximum number of data rows (header excluded).
    pub max_rows: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
        }
    }
}

impl IngestOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_rows: config.upload_max_rows,
        }
    }
}

/// Parses and validates a workbook without touching storage.
///
/// # Errors
///
/// Returns the first [`IngestError`] encountered.
pub fn parse_catalog(
    bytes: &[u8],
    options: IngestOptions,
) -> Result<Vec<NewCatalogEntry>, IngestError> {
    let rows = read_first_sheet(bytes)?;
    validate_rows(&rows, options)
}

/// Validates sheet rows (header first) into catalog entries.
///
/// The row cap is checked before any row is parsed, and the header before
/// any data row.
///
/// # Errors
///
/// Returns the first [`IngestError`] encountered.
pub fn validate_rows(
    rows: &[Vec<String>],
    options: IngestOptions,
) -> Result<Vec<NewCatalogEntry>, IngestError> {
    let Some((header, data)) = rows.split_first() else {
        return Err(IngestError::NoData);
    };
    if data.is_empty() {
        return Err(IngestError::NoData);
    }
    if data.len() > options.max_rows {
        return Err(IngestError::TooManyRows {
            max: options.max_rows,
            found: data.len(),
        });
    }
    check_header(header)?;

    data.iter()
        .enumerate()
        .map(|(idx, row)| parse_row(idx + 2, row))
        .collect()
}

/// Parses the workbook and stores every entry in a single insert.
///
/// Returns the number of rows the store reports as inserted.
///
/// # Errors
///
/// Returns [`IngestError::Storage`] if the store rejects the batch, or any
/// validation error from [`parse_catalog`] (in which case the store is never
/// called).
pub async fn ingest_catalog<S: CatalogStore>(
    store: &S,
    bytes: &[u8],
    options: IngestOptions,
) -> Result<u64, IngestError> {
    let entries = parse_catalog(bytes, options)?;

    let inserted = store
        .insert_entries(&entries)
        .await
        .map_err(|e| IngestError::Storage(Box::new(e)))?;

    tracing::info!(rows = entries.len(), inserted, "catalog batch stored");
    Ok(inserted)
}

fn check_header(header: &[String]) -> Result<(), IngestError> {
    let matches = EXPECTED_HEADER
        .iter()
        .enumerate()
        .all(|(i, expected)| header.get(i).is_some_and(|h| h.trim() == *expected));
    if matches {
        Ok(())
    } else {
        Err(IngestError::HeaderMismatch)
    }
}

fn parse_row(row: usize, cells: &[String]) -> Result<NewCatalogEntry, IngestError> {
    let [model, ram, hdd, location, price, ..] = cells else {
        return Err(IngestError::ShortRow {
            row,
            found: cells.len(),
        });
    };

    let model = required(row, Column::Model, model)?;

    let (ram_size_gb, ram_type) = cell(row, Column::Ram, ram, |raw| {
        let (size, token) = parse_ram(raw)?;
        Ok((size, token.parse::<RamType>()?))
    })?;

    let (hdd_count, hdd_size_gb, hdd_type) = cell(row, Column::Hdd, hdd, |raw| {
        let (count, size, token) = parse_hdd(raw)?;
        Ok((count, size, token.parse::<HddType>()?))
    })?;

    let location = required(row, Column::Location, location)?;

    let (price, currency) = cell(row, Column::Price, price, |raw| {
        let (amount, symbol) = parse_price(raw)?;
        Ok((amount, Currency::from_symbol(&symbol)?))
    })?;

    Ok(NewCatalogEntry {
        model,
        ram_size_gb,
        ram_type,
        hdd_size_gb,
        hdd_count,
        hdd_type,
        location,
        price,
        currency,
    })
}

fn required(row: usize, column: Column, value: &str) -> Result<String, IngestError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(IngestError::MissingValue { row, column });
    }
    Ok(trimmed.to_string())
}

fn cell<T>(
    row: usize,
    column: Column,
    value: &str,
    parse: impl FnOnce(&str) -> Result<T, FieldError>,
) -> Result<T, IngestError> {
    parse(value).map_err(|source| IngestError::InvalidCell {
        row,
        column,
        value: value.to_string(),
        source,
    })
}
