use std::path::PathBuf;

/// Process-level configuration read from the environment.
///
/// Run-specific values (source URL, host, sponsor, limit) live in
/// [`crate::RunSettings`] instead, loaded from the YAML file at
/// `settings_path`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub settings_path: PathBuf,
    pub output_dir: PathBuf,
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub postcodes_base_url: String,
    pub nominatim_base_url: String,
    /// Minimum spacing between consecutive reverse-geocode requests.
    pub geocode_min_delay_ms: u64,
    /// Where to write the `{id, geom}` dump taken before address lookup.
    pub geocode_dump_path: Option<PathBuf>,
}
