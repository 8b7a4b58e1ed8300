//! HTTP client for the strike map JSON endpoint.
//!
//! One GET per run. The strike array sits at a fixed JSON pointer inside the
//! page payload (`/pageProps/staticStrikes` by default). No retries: a failed
//! fetch aborts the run.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use strikemap_core::RawStrike;

use crate::error::FetchError;

/// Client for the strike map source API.
pub struct SourceClient {
    client: Client,
}

impl SourceClient {
    /// Creates a client with the given request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches strike records from `url`.
    ///
    /// The array at `records_pointer` is parsed into [`RawStrike`]s. With
    /// `limit` set only the first `limit` records are kept.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Http`] on network failure.
    /// - [`FetchError::UnexpectedStatus`] on any non-2xx status.
    /// - [`FetchError::Deserialize`] if the body is not JSON.
    /// - [`FetchError::MissingRecords`] if there is no array at `records_pointer`.
    /// - [`FetchError::InvalidRecord`] if a kept record is not an object or has no id.
    pub async fn fetch(
        &self,
        url: &str,
        records_pointer: &str,
        limit: Option<usize>,
    ) -> Result<Vec<RawStrike>, FetchError> {
        let body = self.request_json(url).await?;
        let records = extract_records(body, records_pointer, url)?;
        let total = records.len();

        let kept: Vec<Value> = match limit {
            Some(n) => records.into_iter().take(n).collect(),
            None => records,
        };

        let strikes = kept
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                RawStrike::from_value(value).map_err(|source| FetchError::InvalidRecord {
                    index,
                    url: url.to_owned(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(
            total,
            kept = strikes.len(),
            limit = ?limit,
            "retrieved strikes from the strike map"
        );
        Ok(strikes)
    }

    async fn request_json(&self, url: &str) -> Result<Value, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Deserialize {
            context: url.to_owned(),
            source: e,
        })
    }
}

/// Takes the array at `pointer` out of `body`.
fn extract_records(mut body: Value, pointer: &str, url: &str) -> Result<Vec<Value>, FetchError> {
    match body.pointer_mut(pointer).map(Value::take) {
        Some(Value::Array(records)) => Ok(records),
        _ => Err(FetchError::MissingRecords {
            pointer: pointer.to_owned(),
            url: url.to_owned(),
        }),
    }
}
