use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_POSTCODES_BASE_URL: &str = "https://api.postcodes.io";
pub const DEFAULT_NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = "strikemap/0.1 (event-export)";

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
/// Decoupled from the real environment so tests can drive it with a
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let settings_path = PathBuf::from(or_default("STRIKEMAP_SETTINGS_PATH", "./settings.yaml"));
    let output_dir = PathBuf::from(or_default("STRIKEMAP_OUTPUT_DIR", "./output"));
    let log_level = or_default("STRIKEMAP_LOG_LEVEL", "info");
    let user_agent = or_default("STRIKEMAP_USER_AGENT", DEFAULT_USER_AGENT);

    let request_timeout_secs = parse_u64("STRIKEMAP_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "STRIKEMAP_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let postcodes_base_url = parse_base_url(
        "STRIKEMAP_POSTCODES_BASE_URL",
        &or_default("STRIKEMAP_POSTCODES_BASE_URL", DEFAULT_POSTCODES_BASE_URL),
    )?;
    let nominatim_base_url = parse_base_url(
        "STRIKEMAP_NOMINATIM_BASE_URL",
        &or_default("STRIKEMAP_NOMINATIM_BASE_URL", DEFAULT_NOMINATIM_BASE_URL),
    )?;

    let geocode_min_delay_ms = parse_u64("STRIKEMAP_GEOCODE_MIN_DELAY_MS", "1000")?;
    let geocode_dump_path = lookup("STRIKEMAP_GEOCODE_DUMP_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        settings_path,
        output_dir,
        log_level,
        request_timeout_secs,
        user_agent,
        postcodes_base_url,
        nominatim_base_url,
        geocode_min_delay_ms,
        geocode_dump_path,
    })
}

fn parse_base_url(var: &str, raw: &str) -> Result<String, ConfigError> {
    let url = url::Url::parse(raw).map_err(|e| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
