pub mod address;
pub mod error;
pub mod nominatim;
pub mod postcodes;
pub mod throttle;

pub use address::AddressEnricher;
pub use error::{EnrichmentError, GeocodeError};
pub use nominatim::NominatimClient;
pub use postcodes::{PostcodesClient, POSTCODE_BATCH_SIZE};
pub use throttle::Throttle;
