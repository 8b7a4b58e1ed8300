//! Address enrichment: one throttled reverse lookup per pending strike.

use strikemap_core::{PendingStrike, Strike};

use crate::nominatim::NominatimClient;
use crate::throttle::Throttle;

/// Resolves addresses for pending strikes, strictly one request at a time.
///
/// Misses (no match, HTTP failure, bad JSON) are logged and recorded as an
/// absent address; they never fail the batch.
pub struct AddressEnricher {
    client: NominatimClient,
    throttle: Throttle,
}

impl AddressEnricher {
    #[must_use]
    pub fn new(client: NominatimClient, throttle: Throttle) -> Self {
        Self { client, throttle }
    }

    /// Completes every pending strike, preserving order.
    pub async fn enrich(&mut self, pending: Vec<PendingStrike>) -> Vec<Strike> {
        if pending.is_empty() {
            return Vec::new();
        }

        let total = pending.len();
        let mut strikes = Vec::with_capacity(total);
        let mut misses = 0usize;

        for strike in pending {
            self.throttle.wait().await;
            let address = match self.client.reverse(strike.coordinates()).await {
                Ok(Some(address)) => Some(address),
                Ok(None) => {
                    tracing::warn!(id = %strike.id(), geom = %strike.geom(), "no address found");
                    None
                }
                Err(e) => {
                    tracing::warn!(
                        id = %strike.id(),
                        geom = %strike.geom(),
                        error = %e,
                        "reverse geocode failed"
                    );
                    None
                }
            };
            if address.is_none() {
                misses += 1;
            }
            strikes.push(strike.resolve(address));
        }

        tracing::info!(
            total,
            resolved = total - misses,
            misses,
            "reverse geocoded strike addresses"
        );
        strikes
    }
}
