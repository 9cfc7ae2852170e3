//! Small integer codes stored in the `server_catalog` table and the tokens
//! they stand for.
//!
//! RAM and HDD tokens are matched case-insensitively; currency symbols are
//! matched exactly after trimming whitespace.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Which lookup table a token was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeCategory {
    RamType,
    HddType,
    Currency,
}

impl fmt::Display for CodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeCategory::RamType => write!(f, "RAM type"),
            CodeCategory::HddType => write!(f, "HDD type"),
            CodeCategory::Currency => write!(f, "currency symbol"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {category}: {token:?}")]
pub struct UnknownCode {
    pub category: CodeCategory,
    pub token: String,
}

impl UnknownCode {
    fn new(category: CodeCategory, token: &str) -> Self {
        Self {
            category,
            token: token.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RamType {
    Ddr3,
    Ddr4,
}

impl RamType {
    pub const ALL: [RamType; 2] = [RamType::Ddr3, RamType::Ddr4];

    #[must_use]
    pub fn code(self) -> i16 {
        match self {
            RamType::Ddr3 => 1,
            RamType::Ddr4 => 2,
        }
    }

    #[must_use]
    pub fn from_code(code: i16) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RamType::Ddr3 => "DDR3",
            RamType::Ddr4 => "DDR4",
        }
    }
}

impl FromStr for RamType {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| UnknownCode::new(CodeCategory::RamType, token))
    }
}

impl fmt::Display for RamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum HddType {
    Sata2,
    Sas,
    Ssd,
}

impl HddType {
    pub const ALL: [HddType; 3] = [HddType::Sata2, HddType::Sas, HddType::Ssd];

    #[must_use]
    pub fn code(self) -> i16 {
        match self {
            HddType::Sata2 => 1,
            HddType::Sas => 2,
            HddType::Ssd => 3,
        }
    }

    #[must_use]
    pub fn from_code(code: i16) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HddType::Sata2 => "SATA2",
            HddType::Sas => "SAS",
            HddType::Ssd => "SSD",
        }
    }
}

impl FromStr for HddType {
    type Err = UnknownCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| UnknownCode::new(CodeCategory::HddType, token))
    }
}

impl fmt::Display for HddType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Currency {
    Usd,
    Euro,
    Sgd,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Usd, Currency::Euro, Currency::Sgd];

    #[must_use]
    pub fn code(self) -> i16 {
        match self {
            Currency::Usd => 1,
            Currency::Euro => 2,
            Currency::Sgd => 3,
        }
    }

    #[must_use]
    pub fn from_code(code: i16) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Euro => "€",
            Currency::Sgd => "S$",
        }
    }

    /// Resolves a currency symbol such as `"$"` or `"S$"`.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownCode`] when the trimmed symbol is not one of the
    /// supported symbols. Matching is exact, so `"s$"` is rejected.
    pub fn from_symbol(symbol: &str) -> Result<Self, UnknownCode> {
        let symbol = symbol.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.symbol() == symbol)
            .ok_or_else(|| UnknownCode::new(CodeCategory::Currency, symbol))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
