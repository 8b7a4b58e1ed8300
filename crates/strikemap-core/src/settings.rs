use std::path::Path;

use serde::Deserialize;

use crate::event::EventContext;
use crate::ConfigError;

/// JSON pointer to the strike array inside the source API payload.
pub const DEFAULT_RECORDS_POINTER: &str = "/pageProps/staticStrikes";

/// Per-run settings loaded from `settings.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct RunSettings {
    /// URL of the strike map JSON endpoint.
    pub source: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub sponsor: String,
    /// Keep only the first `limit` records; useful for sample uploads.
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default = "default_records_pointer")]
    pub records_pointer: String,
}

fn default_records_pointer() -> String {
    DEFAULT_RECORDS_POINTER.to_string()
}

impl RunSettings {
    #[must_use]
    pub fn event_context(&self) -> EventContext {
        EventContext {
            host: self.host.clone(),
            sponsor: self.sponsor.clone(),
        }
    }
}

/// Load and validate run settings from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_settings(path: &Path) -> Result<RunSettings, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SettingsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_settings(&content)
}

/// Parse and validate run settings from YAML text.
///
/// # Errors
///
/// Returns [`ConfigError::SettingsFileParse`] for malformed YAML and
/// [`ConfigError::InvalidSettings`] when a value fails validation.
pub fn parse_settings(content: &str) -> Result<RunSettings, ConfigError> {
    let settings: RunSettings = serde_yaml::from_str(content)?;
    validate_settings(&settings)?;
    Ok(settings)
}

fn validate_settings(settings: &RunSettings) -> Result<(), ConfigError> {
    let source = settings.source.trim();
    if source.is_empty() {
        return Err(ConfigError::InvalidSettings(
            "source must not be empty".to_string(),
        ));
    }

    let url = url::Url::parse(source)
        .map_err(|e| ConfigError::InvalidSettings(format!("source '{source}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidSettings(format!(
            "source '{source}' must use http or https"
        )));
    }

    if !settings.records_pointer.is_empty() && !settings.records_pointer.starts_with('/') {
        return Err(ConfigError::InvalidSettings(format!(
            "records_pointer '{}' must be empty or start with '/'",
            settings.records_pointer
        )));
    }

    Ok(())
}
