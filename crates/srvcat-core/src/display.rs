//! Renders stored entries back into the display strings used by list responses.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::catalog::CatalogEntry;
use crate::codes::{Currency, HddType, RamType};

const GB_PER_TB: i32 = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogListItem {
    pub model: String,
    pub ram: String,
    pub hdd: String,
    pub location: String,
    pub price: String,
}

impl From<&CatalogEntry> for CatalogListItem {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            model: entry.model.clone(),
            ram: format_ram(entry.ram_size_gb, entry.ram_type),
            hdd: format_hdd(entry.hdd_count, entry.hdd_size_gb, entry.hdd_type),
            location: entry.location.clone(),
            price: format_price(entry.price, entry.currency),
        }
    }
}

/// `16GBDDR3`; an unrecognized type code drops the suffix.
#[must_use]
pub fn format_ram(size_gb: i32, ram_type: i16) -> String {
    let suffix = RamType::from_code(ram_type).map_or("", RamType::as_str);
    format!("{size_gb}GB{suffix}")
}

/// `4x1TBSATA2`; sizes of 1024 GB and up are shown in whole TB.
#[must_use]
pub fn format_hdd(count: i32, size_gb: i32, hdd_type: i16) -> String {
    let (size, unit) = if size_gb >= GB_PER_TB {
        (size_gb / GB_PER_TB, "TB")
    } else {
        (size_gb, "GB")
    };
    let suffix = HddType::from_code(hdd_type).map_or("", HddType::as_str);
    format!("{count}x{size}{unit}{suffix}")
}

/// `€39.99`; an unrecognized currency code renders the amount alone.
#[must_use]
pub fn format_price(price: Decimal, currency: i16) -> String {
    let mut amount = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    amount.rescale(2);
    match Currency::from_code(currency) {
        Some(c) => format!("{}{amount}", c.symbol()),
        None => amount.to_string(),
    }
}
