//! Reverse geocoding against a Nominatim server.
//!
//! One coordinate per request. A point Nominatim cannot place comes back as
//! `200 {"error": "Unable to geocode"}`, which maps to `Ok(None)`.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;
use strikemap_core::{Address, Coordinates};

use crate::error::GeocodeError;

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Option<Address>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for Nominatim's `/reverse` endpoint.
pub struct NominatimClient {
    client: Client,
    reverse_url: Url,
}

impl NominatimClient {
    /// Creates a client for `base_url`.
    ///
    /// Nominatim's usage policy requires an identifying `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`GeocodeError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(timeout_secs: u64, user_agent: &str, base_url: &str) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/reverse", base_url.trim_end_matches('/'));
        let reverse_url = Url::parse(&normalised).map_err(|e| GeocodeError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            reverse_url,
        })
    }

    /// Looks up the structured address nearest to `coordinates`.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::Http`] on network failure.
    /// - [`GeocodeError::UnexpectedStatus`] on a non-2xx status.
    /// - [`GeocodeError::Deserialize`] if the body is not the expected JSON.
    pub async fn reverse(&self, coordinates: Coordinates) -> Result<Option<Address>, GeocodeError> {
        let url = self.build_url(coordinates);
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: ReverseResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
                context: format!("reverse({})", coordinates.geom()),
                source: e,
            })?;

        if let Some(message) = parsed.error {
            tracing::debug!(geom = %coordinates.geom(), %message, "nominatim returned no match");
            return Ok(None);
        }
        Ok(parsed.address)
    }

    fn build_url(&self, coordinates: Coordinates) -> Url {
        let mut url = self.reverse_url.clone();
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("lat", &coordinates.lat.to_string())
            .append_pair("lon", &coordinates.lng.to_string())
            .append_pair("addressdetails", "1");
        url
    }
}
