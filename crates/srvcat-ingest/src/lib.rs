pub mod error;
pub mod parse;
pub mod pipeline;
mod sheet;

pub use error::{Column, ErrorKind, FieldError, IngestError};
pub use parse::{parse_hdd, parse_price, parse_ram, parse_ram_set, parse_storage_bound};
pub use pipeline::{
    ingest_catalog, parse_catalog, validate_rows, IngestOptions, DEFAULT_MAX_ROWS,
    EXPECTED_HEADER,
};
