use thiserror::Error;

use crate::app_config::{AppConfig, Environment};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Log filter directive from `SRVCAT_LOG_LEVEL`, defaulting to `info`.
///
/// Does not require any other variable to be set.
#[must_use]
pub fn log_level_from_env() -> String {
    log_level_with(|key| std::env::var(key))
}

fn log_level_with<F>(lookup: F) -> String
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    lookup("SRVCAT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string())
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("SRVCAT_ENV", "development"))?;

    let bind_addr = or_default("SRVCAT_BIND_ADDR", "0.0.0.0:8080")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("SRVCAT_BIND_ADDR", e.to_string()))?;
    let log_level = log_level_with(&lookup);
    let app_key = lookup("SRVCAT_APP_KEY")
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());

    let db_max_connections = parse_u32("SRVCAT_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("SRVCAT_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("SRVCAT_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let upload_max_bytes = parse_usize("SRVCAT_UPLOAD_MAX_BYTES", "10485760")?;
    let upload_max_rows = parse_usize("SRVCAT_UPLOAD_MAX_ROWS", "1000")?;
    if upload_max_rows == 0 {
        return Err(invalid("SRVCAT_UPLOAD_MAX_ROWS", "must be at least 1".into()));
    }

    let pagination_limit = match lookup("SRVCAT_PAGINATION_LIMIT") {
        Ok(raw) => {
            let limit = raw
                .parse::<i64>()
                .map_err(|e| invalid("SRVCAT_PAGINATION_LIMIT", e.to_string()))?;
            if limit < 1 {
                return Err(invalid("SRVCAT_PAGINATION_LIMIT", "must be at least 1".into()));
            }
            Some(limit)
        }
        Err(_) => None,
    };

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        app_key,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        upload_max_bytes,
        upload_max_rows,
        pagination_limit,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "staging" => Ok(Environment::Staging),
        "production" => Ok(Environment::Production),
        "test" => Ok(Environment::Test),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SRVCAT_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
