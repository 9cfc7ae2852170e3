//! Parsers for the raw text found in catalog cells and list query parameters.
//!
//! Spreadsheet parsers return the type token as text; resolving it to a code
//! is left to [`srvcat_core::codes`].

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::error::FieldError;

const GB_PER_TB: i64 = 1024;

static RAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*GB\s*(\w+)$").expect("valid RAM regex"));

static HDD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+)x(\d+)(TB|GB)([A-Z0-9]+)$").expect("valid HDD regex")
});

static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^\d]+)\s*([\d.]+)$").expect("valid price regex"));

static STORAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d+)(GB|TB)$").expect("valid storage regex"));

/// Parses `"16GB DDR3"` into `(16, "DDR3")`.
///
/// Case-insensitive; whitespace is allowed around `GB`. The returned token
/// is upper-cased.
///
/// # Errors
///
/// Returns [`FieldError::Format`] if the text does not match or the size
/// does not fit in an `i32`.
pub fn parse_ram(input: &str) -> Result<(i32, String), FieldError> {
    let upper = input.trim().to_uppercase();
    let caps = RAM_RE
        .captures(&upper)
        .ok_or_else(|| FieldError::format("RAM", input))?;
    let size = caps[1]
        .parse::<i32>()
        .map_err(|_| FieldError::format("RAM", input))?;
    Ok((size, caps[2].to_string()))
}

/// Parses `"4x1TBSATA2"` into `(4, 1024, "SATA2")`, converting TB to GB.
///
/// # Errors
///
/// Returns [`FieldError::Format`] if the text does not match or a number
/// overflows after conversion.
pub fn parse_hdd(input: &str) -> Result<(i32, i32, String), FieldError> {
    let trimmed = input.trim();
    let caps = HDD_RE
        .captures(trimmed)
        .ok_or_else(|| FieldError::format("HDD", input))?;
    let count = caps[1]
        .parse::<i32>()
        .map_err(|_| FieldError::format("HDD", input))?;
    let size = caps[2]
        .parse::<i64>()
        .map_err(|_| FieldError::format("HDD", input))?;
    let size_gb = to_gb(size, &caps[3])
        .and_then(|gb| i32::try_from(gb).ok())
        .ok_or_else(|| FieldError::format("HDD", input))?;
    Ok((count, size_gb, caps[4].to_uppercase()))
}

/// Parses `"$35.99"` into `(35.99, "$")`.
///
/// The symbol is everything before the first digit, trimmed. `"S$"` is the
/// Singapore dollar, not a dollar sign with a stray prefix.
///
/// # Errors
///
/// Returns [`FieldError::Format`] if there is no symbol, no trailing
/// numeral, or the numeral is not a valid decimal.
pub fn parse_price(input: &str) -> Result<(Decimal, String), FieldError> {
    let trimmed = input.trim();
    let caps = PRICE_RE
        .captures(trimmed)
        .ok_or_else(|| FieldError::format("price", input))?;
    let symbol = caps[1].trim();
    let amount =
        Decimal::from_str(&caps[2]).map_err(|_| FieldError::format("price amount", &caps[2]))?;
    Ok((amount, symbol.to_string()))
}

/// Parses a storage bound such as `"500GB"`, `"2TB"` or `"0"` into GB.
///
/// # Errors
///
/// Returns [`FieldError::Format`] for any other shape.
pub fn parse_storage_bound(input: &str) -> Result<i64, FieldError> {
    let trimmed = input.trim();
    if trimmed == "0" {
        return Ok(0);
    }
    let caps = STORAGE_RE
        .captures(trimmed)
        .ok_or_else(|| FieldError::format("storage", input))?;
    caps[1]
        .parse::<i64>()
        .ok()
        .and_then(|n| to_gb(n, &caps[2]))
        .ok_or_else(|| FieldError::format("storage", input))
}

/// Parses `"16GB,32GB"` into `[16, 32]`.
///
/// Lenient: tokens that do not parse are dropped, duplicates are kept once,
/// and a bare integer is read as GB.
#[must_use]
pub fn parse_ram_set(input: &str) -> Vec<i32> {
    let mut sizes = Vec::new();
    for token in input.split(',') {
        let token = token.trim();
        let digits = strip_suffix_ignore_case(token, "GB").unwrap_or(token).trim();
        if let Ok(size) = digits.parse::<i32>() {
            if !sizes.contains(&size) {
                sizes.push(size);
            }
        }
    }
    sizes
}

fn to_gb(size: i64, unit: &str) -> Option<i64> {
    if unit.eq_ignore_ascii_case("TB") {
        size.checked_mul(GB_PER_TB)
    } else {
        Some(size)
    }
}

fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let split = s.len().checked_sub(suffix.len())?;
    if s.is_char_boundary(split) && s[split..].eq_ignore_ascii_case(suffix) {
        Some(&s[..split])
    } else {
        None
    }
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
