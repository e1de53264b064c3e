use crate::app_config::{AppConfig, ShopCredentials};
use crate::ConfigError;

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
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let credentials = ShopCredentials {
        api_key: require("SHOPIFY_API_KEY")?,
        api_secret: require("SHOPIFY_API_SECRET")?,
        shop_name: require("SHOPIFY_SHOP_NAME")?,
        access_token: require("SHOPIFY_ACCESS_TOKEN")?,
    };

    let location_ids = parse_location_ids("SHOPFEED_LOCATION_IDS", &require("SHOPFEED_LOCATION_IDS")?)?;

    let api_version = or_default("SHOPIFY_API_VERSION", "2024-01");
    let bind_addr = parse_addr("SHOPFEED_BIND_ADDR", "0.0.0.0:4069")?;
    let log_level = or_default("SHOPFEED_LOG_LEVEL", "info");
    let page_size = parse_u32("SHOPFEED_PAGE_SIZE", "250")?;
    let pass_interval_secs = parse_u64("SHOPFEED_PASS_INTERVAL_SECS", "3600")?;
    let working_path = PathBuf::from(or_default("SHOPFEED_WORKING_PATH", "./products.csv"));
    let published_path = PathBuf::from(or_default("SHOPFEED_PUBLISHED_PATH", "./final_products.csv"));

    let request_timeout_secs = parse_u64("SHOPFEED_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("SHOPFEED_USER_AGENT", "shopfeed/0.1 (catalog-export)");
    let max_retries = parse_u32("SHOPFEED_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("SHOPFEED_RETRY_BACKOFF_BASE_SECS", "1")?;
    let bucket_threshold = parse_u32("SHOPFEED_BUCKET_THRESHOLD", "5")?;
    let bucket_pause_secs = parse_u64("SHOPFEED_BUCKET_PAUSE_SECS", "3")?;

    Ok(AppConfig {
        credentials,
        api_version,
        bind_addr,
        log_level,
        location_ids,
        page_size,
        pass_interval_secs,
        working_path,
        published_path,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        bucket_threshold,
        bucket_pause_secs,
    })
}

/// Parse a comma-separated list of numeric location IDs.
///
/// Blank entries (e.g. a trailing comma) are skipped; an empty list is an
/// error because a feed with no counted locations would export all zeros.
fn parse_location_ids(var: &str, raw: &str) -> Result<Vec<i64>, ConfigError> {
    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>().map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("\"{s}\" is not a numeric location id: {e}"),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if ids.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: "expected at least one location id".to_string(),
        });
    }

    Ok(ids)
}
