//! Bulk reverse postcode lookup against postcodes.io.
//!
//! `POST /postcodes` accepts up to [`POSTCODE_BATCH_SIZE`] geolocations and
//! answers with a `result` array parallel to the request. Results carry no
//! record id, so alignment is purely positional and every batch must come
//! back with exactly as many entries as were sent.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use strikemap_core::{Coordinates, PendingStrike, PostcodeResult, RawStrike};

use crate::error::EnrichmentError;

/// Maximum geolocations per bulk request accepted by postcodes.io.
pub const POSTCODE_BATCH_SIZE: usize = 100;

#[derive(Debug, Serialize)]
struct Geolocation {
    longitude: f64,
    latitude: f64,
}

#[derive(Debug, Serialize)]
struct BulkReverseRequest<'a> {
    geolocations: &'a [Geolocation],
}

#[derive(Debug, Deserialize)]
struct BulkReverseResponse {
    result: Vec<PostcodeResult>,
}

/// Client for the postcodes.io bulk reverse-geocoding endpoint.
pub struct PostcodesClient {
    client: Client,
    endpoint: String,
}

impl PostcodesClient {
    /// Creates a client for `base_url` (e.g. `https://api.postcodes.io`).
    ///
    /// # Errors
    ///
    /// Returns [`EnrichmentError::Client`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, EnrichmentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()
            .map_err(EnrichmentError::Client)?;
        Ok(Self {
            client,
            endpoint: format!("{}/postcodes", base_url.trim_end_matches('/')),
        })
    }

    /// Resolves a postcode for every record, batch by batch, in order.
    ///
    /// Records with no usable location are sent as `0,0` and come back with
    /// an empty postcode.
    ///
    /// # Errors
    ///
    /// Fails on the first batch that errors; see [`EnrichmentError`].
    pub async fn enrich(
        &self,
        records: Vec<RawStrike>,
    ) -> Result<Vec<PendingStrike>, EnrichmentError> {
        let total = records.len();
        let batches = partition(records, POSTCODE_BATCH_SIZE);
        let batch_count = batches.len();
        let mut pending = Vec::with_capacity(total);

        for (batch, records) in batches.into_iter().enumerate() {
            for record in records.iter().filter(|r| r.location().is_none()) {
                tracing::warn!(id = %record.id(), "record has no usable location; geocoding as 0,0");
            }
            let coordinates: Vec<Coordinates> = records.iter().map(RawStrike::coordinates).collect();
            let results = self.lookup_batch(batch, &coordinates).await?;
            pending.extend(
                records
                    .into_iter()
                    .zip(results)
                    .map(|(raw, lookup)| PendingStrike::assemble(raw, lookup)),
            );
            tracing::debug!(batch, batch_count, "postcode batch resolved");
        }

        let resolved = pending.iter().filter(|p| p.postcode().code().is_some()).count();
        tracing::info!(
            total,
            batches = batch_count,
            resolved,
            "encoded strikes from postcodes.io"
        );
        Ok(pending)
    }

    /// Sends one bulk request and returns results in request order.
    ///
    /// # Errors
    ///
    /// - [`EnrichmentError::Http`] on network failure.
    /// - [`EnrichmentError::UnexpectedStatus`] on a non-2xx status.
    /// - [`EnrichmentError::Deserialize`] if the body lacks a `result` array.
    /// - [`EnrichmentError::BatchMismatch`] if the result count differs from
    ///   the number of coordinates sent.
    pub async fn lookup_batch(
        &self,
        batch: usize,
        coordinates: &[Coordinates],
    ) -> Result<Vec<PostcodeResult>, EnrichmentError> {
        let geolocations: Vec<Geolocation> = coordinates
            .iter()
            .map(|c| Geolocation {
                longitude: c.lng,
                latitude: c.lat,
            })
            .collect();

        let response = self
            .client
            .post(&self.endpoint)
            .json(&BulkReverseRequest {
                geolocations: &geolocations,
            })
            .send()
            .await
            .map_err(|source| EnrichmentError::Http { batch, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::UnexpectedStatus {
                batch,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| EnrichmentError::Http { batch, source })?;
        let parsed: BulkReverseResponse = serde_json::from_str(&body)
            .map_err(|source| EnrichmentError::Deserialize { batch, source })?;

        if parsed.result.len() != coordinates.len() {
            return Err(EnrichmentError::BatchMismatch {
                batch,
                sent: coordinates.len(),
                received: parsed.result.len(),
            });
        }
        Ok(parsed.result)
    }
}

/// Splits `items` into consecutive batches of at most `size`, preserving
/// order. A `size` of zero is treated as one.
#[must_use]
pub fn partition<T>(items: Vec<T>, size: usize) -> Vec<Vec<T>> {
    let size = size.max(1);
    let mut batches = Vec::with_capacity(items.len().div_ceil(size));
    let mut iter = items.into_iter().peekable();
    while iter.peek().is_some() {
        batches.push(iter.by_ref().take(size).collect());
    }
    batches
}
