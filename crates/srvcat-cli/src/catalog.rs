//! Spreadsheet command handlers for the CLI.
//!
//! Both commands run the same validation as the upload endpoint; `import`
//! then stores the batch, `check` stops after validation.

use std::path::Path;

use anyhow::Context;
use srvcat_core::CatalogStore;
use srvcat_ingest::{ingest_catalog, parse_catalog, IngestOptions};

fn read_workbook(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Validate a spreadsheet and return the number of data rows.
///
/// # Errors
///
/// Returns an error if the file cannot be read or any row is invalid.
pub(crate) fn run_check(path: &Path, options: IngestOptions) -> anyhow::Result<usize> {
    let bytes = read_workbook(path)?;
    let entries = parse_catalog(&bytes, options)
        .with_context(|| format!("{} is not a valid catalog", path.display()))?;
    Ok(entries.len())
}

/// Validate a spreadsheet and store every row in a single batch.
///
/// # Errors
///
/// Returns an error if the file cannot be read, any row is invalid, or the
/// store rejects the batch. Nothing is stored in any of these cases.
pub(crate) async fn run_import<S: CatalogStore>(
    store: &S,
    path: &Path,
    options: IngestOptions,
) -> anyhow::Result<u64> {
    let bytes = read_workbook(path)?;
    let inserted = ingest_catalog(store, &bytes, options)
        .await
        .with_context(|| format!("failed to import {}", path.display()))?;
    tracing::info!(path = %path.display(), inserted, "catalog imported");
    Ok(inserted)
}
