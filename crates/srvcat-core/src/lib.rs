pub mod app_config;
pub mod catalog;
pub mod codes;
pub mod config;
pub mod display;

pub use app_config::{AppConfig, Environment};
pub use catalog::{
    CatalogEntry, CatalogPage, CatalogStore, FilterCriteria, NewCatalogEntry, PageRequest,
    Pagination, DEFAULT_PAGE_NO, DEFAULT_PER_PAGE,
};
pub use codes::{CodeCategory, Currency, HddType, RamType, UnknownCode};
pub use config::{load_app_config, load_app_config_from_env, log_level_from_env, ConfigError};
pub use display::{format_hdd, format_price, format_ram, CatalogListItem};
