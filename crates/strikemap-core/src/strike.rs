//! Strike records and their enrichment states.
//!
//! A record moves through three types:
//!
//! 1. [`RawStrike`]: the source API object, with its id and location parsed.
//! 2. [`PendingStrike`]: raw record plus the resolved postcode.
//! 3. [`Strike`]: fully enriched; the address lookup has either succeeded or
//!    been recorded as a miss. Immutable from here on.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while interpreting a raw source record.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("record has no usable `id`")]
    MissingId,
}

/// Identifier of a strike as assigned by the source API.
///
/// The API emits ids as either JSON strings or numbers; both normalise to
/// their string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StrikeId(String);

impl StrikeId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(Self(s.clone())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for StrikeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StrikeId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// `"{lat},{lng}"`, the form used as the reverse-geocode query.
    ///
    /// Whole-number degrees keep their fraction (`52.0`, not `52`).
    #[must_use]
    pub fn geom(&self) -> String {
        format!("{:?},{:?}", self.lat, self.lng)
    }

    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_degenerate(&self) -> bool {
        self.lat == 0.0 && self.lng == 0.0
    }

    fn from_location(location: &Value) -> Option<Self> {
        let lat = number_field(location, "lat")?;
        let lng = number_field(location, "lng")?;
        (lat.is_finite() && lng.is_finite()).then_some(Self { lat, lng })
    }
}

fn number_field(value: &Value, key: &str) -> Option<f64> {
    match value.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Renders a JSON value as display text: strings verbatim, null as `None`,
/// anything else in its JSON form.
#[must_use]
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// A strike record exactly as received from the source API.
#[derive(Debug, Clone)]
pub struct RawStrike {
    id: StrikeId,
    location: Option<Coordinates>,
    fields: Map<String, Value>,
}

impl RawStrike {
    /// Interprets one element of the source array.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NotAnObject`] for non-object values and
    /// [`RecordError::MissingId`] when `id` is absent, null, or blank.
    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        let Value::Object(fields) = value else {
            return Err(RecordError::NotAnObject);
        };
        let id = fields
            .get("id")
            .and_then(StrikeId::from_value)
            .ok_or(RecordError::MissingId)?;
        let location = fields.get("location").and_then(Coordinates::from_location);
        Ok(Self {
            id,
            location,
            fields,
        })
    }

    #[must_use]
    pub fn id(&self) -> &StrikeId {
        &self.id
    }

    /// The parsed `location`, or `None` when it is missing or non-numeric.
    #[must_use]
    pub fn location(&self) -> Option<Coordinates> {
        self.location
    }

    /// Coordinates to geocode. Records without a usable location fall back
    /// to `0,0`, which resolves to nothing upstream.
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        self.location.unwrap_or(Coordinates { lat: 0.0, lng: 0.0 })
    }

    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Text value of a top-level field; `None` when absent or null.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<String> {
        self.fields.get(key).and_then(value_text)
    }
}

/// One postcode candidate from postcodes.io, kept as the full object so the
/// raw export carries every attribute the API returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Postcode(Map<String, Value>);

impl Postcode {
    /// The `postcode` attribute, e.g. `"SW1A 1AA"`.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.0.get("postcode").and_then(Value::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Postcode {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// One element of a bulk reverse-lookup response: the echoed query and the
/// candidates nearest to it (null when nothing is in range).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostcodeResult {
    #[serde(default)]
    pub query: Value,
    #[serde(default)]
    pub result: Option<Vec<Postcode>>,
}

impl PostcodeResult {
    /// The nearest candidate, or an empty postcode when there is none.
    #[must_use]
    pub fn into_first(self) -> Postcode {
        self.result
            .and_then(|candidates| candidates.into_iter().next())
            .unwrap_or_default()
    }
}

/// Structured address from reverse geocoding (the provider's `address`
/// object: `house_number`, `road`, `city`, `country_code`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(Map<String, Value>);

impl Address {
    /// A component as text; empty strings count as absent.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// The first present component among `keys`, in order.
    #[must_use]
    pub fn first_of(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.get(key))
    }

    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Address {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A record with its postcode resolved, awaiting address lookup.
#[derive(Debug, Clone)]
pub struct PendingStrike {
    raw: RawStrike,
    postcode: Postcode,
}

impl PendingStrike {
    /// Pairs a raw record with its positional postcode lookup result.
    #[must_use]
    pub fn assemble(raw: RawStrike, lookup: PostcodeResult) -> Self {
        Self {
            raw,
            postcode: lookup.into_first(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &StrikeId {
        self.raw.id()
    }

    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        self.raw.coordinates()
    }

    #[must_use]
    pub fn geom(&self) -> String {
        self.coordinates().geom()
    }

    #[must_use]
    pub fn postcode(&self) -> &Postcode {
        &self.postcode
    }

    /// Completes enrichment. `None` records a geocode miss.
    #[must_use]
    pub fn resolve(self, address: Option<Address>) -> Strike {
        Strike {
            raw: self.raw,
            postcode: self.postcode,
            address,
        }
    }
}

/// A fully enriched strike.
#[derive(Debug, Clone)]
pub struct Strike {
    raw: RawStrike,
    postcode: Postcode,
    address: Option<Address>,
}

impl Strike {
    #[must_use]
    pub fn id(&self) -> &StrikeId {
        self.raw.id()
    }

    #[must_use]
    pub fn raw(&self) -> &RawStrike {
        &self.raw
    }

    #[must_use]
    pub fn geom(&self) -> String {
        self.raw.coordinates().geom()
    }

    #[must_use]
    pub fn postcode(&self) -> &Postcode {
        &self.postcode
    }

    #[must_use]
    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    /// The geocoded export row: every raw field in received order, then
    /// `postcode` and `address` (null on a geocode miss).
    #[must_use]
    pub fn to_record(&self) -> Value {
        let mut record = self.raw.fields().clone();
        record.insert(
            "postcode".to_string(),
            Value::Object(self.postcode.as_map().clone()),
        );
        record.insert(
            "address".to_string(),
            self.address
                .as_ref()
                .map_or(Value::Null, |a| Value::Object(a.as_map().clone())),
        );
        Value::Object(record)
    }
}

#[cfg(test)]
#[path = "strike_test.rs"]
mod tests;
