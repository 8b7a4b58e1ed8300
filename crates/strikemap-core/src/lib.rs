pub mod app_config;
pub mod config;
pub mod event;
pub mod settings;
pub mod strike;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use event::{project, Event, EventContext};
pub use settings::{load_settings, parse_settings, RunSettings, DEFAULT_RECORDS_POINTER};
pub use strike::{
    Address, Coordinates, PendingStrike, Postcode, PostcodeResult, RawStrike, RecordError, Strike,
    StrikeId,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read settings file {path}: {source}")]
    SettingsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file: {0}")]
    SettingsFileParse(#[from] serde_yaml::Error),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}
