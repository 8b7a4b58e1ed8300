use thiserror::Error;

/// Errors from bulk postcode enrichment. Any of these aborts the run: the
/// API answers positionally, so a bad batch would misalign the dataset.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("HTTP error for postcode batch {batch}: {source}")]
    Http {
        batch: usize,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} for postcode batch {batch}")]
    UnexpectedStatus { batch: usize, status: u16 },

    #[error("malformed response for postcode batch {batch}: {source}")]
    Deserialize {
        batch: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("postcode batch {batch} sent {sent} coordinates but received {received} results")]
    BatchMismatch {
        batch: usize,
        sent: usize,
        received: usize,
    },

    #[error("failed to build postcodes client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Errors from a single reverse-geocode lookup. Callers treat these as a
/// miss for that record rather than a run failure.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
