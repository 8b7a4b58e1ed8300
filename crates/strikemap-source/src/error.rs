use strikemap_core::RecordError;
use thiserror::Error;

/// Errors returned while fetching strike records from the source API.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be parsed as JSON.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The payload has no array at the configured pointer.
    #[error("no record array at '{pointer}' in response from {url}")]
    MissingRecords { pointer: String, url: String },

    #[error("record {index} in response from {url} is invalid: {source}")]
    InvalidRecord {
        index: usize,
        url: String,
        #[source]
        source: RecordError,
    },
}
