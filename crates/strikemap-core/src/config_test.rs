use std::collections::HashMap;
use std::env::VarError;
use std::path::PathBuf;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
    assert_eq!(cfg.settings_path, PathBuf::from("./settings.yaml"));
    assert_eq!(cfg.output_dir, PathBuf::from("./output"));
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    assert_eq!(cfg.postcodes_base_url, DEFAULT_POSTCODES_BASE_URL);
    assert_eq!(cfg.nominatim_base_url, DEFAULT_NOMINATIM_BASE_URL);
    assert_eq!(cfg.geocode_min_delay_ms, 1000);
    assert!(cfg.geocode_dump_path.is_none());
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("STRIKEMAP_SETTINGS_PATH", "/etc/strikemap/settings.yaml");
    map.insert("STRIKEMAP_OUTPUT_DIR", "/var/lib/strikemap");
    map.insert("STRIKEMAP_REQUEST_TIMEOUT_SECS", "5");
    map.insert("STRIKEMAP_GEOCODE_MIN_DELAY_MS", "1500");
    map.insert("STRIKEMAP_GEOCODE_DUMP_PATH", "pre_geocoded.csv");
    map.insert("STRIKEMAP_POSTCODES_BASE_URL", "http://localhost:8000/");

    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.settings_path,
        PathBuf::from("/etc/strikemap/settings.yaml")
    );
    assert_eq!(cfg.output_dir, PathBuf::from("/var/lib/strikemap"));
    assert_eq!(cfg.request_timeout_secs, 5);
    assert_eq!(cfg.geocode_min_delay_ms, 1500);
    assert_eq!(
        cfg.geocode_dump_path,
        Some(PathBuf::from("pre_geocoded.csv"))
    );
    assert_eq!(cfg.postcodes_base_url, "http://localhost:8000");
}

#[test]
fn blank_dump_path_is_ignored() {
    let mut map = HashMap::new();
    map.insert("STRIKEMAP_GEOCODE_DUMP_PATH", "  ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.geocode_dump_path.is_none());
}

#[test]
fn invalid_delay_is_rejected() {
    let mut map = HashMap::new();
    map.insert("STRIKEMAP_GEOCODE_MIN_DELAY_MS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STRIKEMAP_GEOCODE_MIN_DELAY_MS"),
        "expected InvalidEnvVar(STRIKEMAP_GEOCODE_MIN_DELAY_MS), got: {result:?}"
    );
}

#[test]
fn zero_timeout_is_rejected() {
    let mut map = HashMap::new();
    map.insert("STRIKEMAP_REQUEST_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STRIKEMAP_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(STRIKEMAP_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn non_http_base_url_is_rejected() {
    let mut map = HashMap::new();
    map.insert("STRIKEMAP_NOMINATIM_BASE_URL", "ftp://nominatim.example");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STRIKEMAP_NOMINATIM_BASE_URL"),
        "expected InvalidEnvVar(STRIKEMAP_NOMINATIM_BASE_URL), got: {result:?}"
    );
}

#[test]
fn unparseable_base_url_is_rejected() {
    let mut map = HashMap::new();
    map.insert("STRIKEMAP_POSTCODES_BASE_URL", "not a url");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(
        result,
        Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "STRIKEMAP_POSTCODES_BASE_URL"
    ));
}
