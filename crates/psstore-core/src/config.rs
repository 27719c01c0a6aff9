use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_STORE_ORIGIN: &str = "https://store.playstation.com";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
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

    let env = parse_environment(&or_default("PSSTORE_ENV", "development"))?;
    let log_level = or_default("PSSTORE_LOG_LEVEL", "info");

    let store_origin = or_default("PSSTORE_STORE_ORIGIN", DEFAULT_STORE_ORIGIN)
        .trim_end_matches('/')
        .to_string();
    if !(store_origin.starts_with("http://") || store_origin.starts_with("https://")) {
        return Err(invalid(
            "PSSTORE_STORE_ORIGIN",
            format!("expected an http(s) origin, got {store_origin:?}"),
        ));
    }

    let request_timeout_secs = parse_u64("PSSTORE_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("PSSTORE_USER_AGENT", "psstore/0.1 (catalog-extractor)");
    let max_retries = parse_u32("PSSTORE_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("PSSTORE_RETRY_BACKOFF_BASE_SECS", "3")?;
    let inter_request_delay_ms = parse_u64("PSSTORE_INTER_REQUEST_DELAY_MS", "1000")?;

    let max_concurrent_pages = or_default("PSSTORE_MAX_CONCURRENT_PAGES", "1")
        .parse::<usize>()
        .map_err(|e| invalid("PSSTORE_MAX_CONCURRENT_PAGES", e.to_string()))?;
    if max_concurrent_pages == 0 {
        return Err(invalid(
            "PSSTORE_MAX_CONCURRENT_PAGES",
            "must be at least 1".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        log_level,
        store_origin,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        inter_request_delay_ms,
        max_concurrent_pages,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PSSTORE_ENV".to_string(),
            reason: format!("unknown environment {other:?}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
