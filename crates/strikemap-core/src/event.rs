//! Projection of an enriched [`Strike`] into an events-platform import row.
//!
//! All times are UTC: the run's `now` is a UTC instant, naive `action_start`
//! values are read as UTC, and bumped starts are formatted in UTC. The host's
//! local zone never affects the output, so a UK run during summer time lists
//! bumped starts one hour earlier than local wall-clock time.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::strike::Strike;

/// Days added to "now" when a strike's start time has already passed.
pub const STALE_START_BUMP_DAYS: i64 = 10;

/// Fallback when the address carries no `country_code`.
pub const DEFAULT_COUNTRY: &str = "GB";

const CITY_KEYS: [&str; 5] = ["city", "suburb", "town", "village", "county"];
const LOCATION_NAME_KEYS: [&str; 3] = ["place", "shop", "building"];

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Run-wide values stamped onto every event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventContext {
    pub host: String,
    pub sponsor: String,
}

/// One row of the event import. Field order is the CSV column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub event_title: String,
    pub administrative_title: String,
    pub location_name: Option<String>,
    #[serde(rename = "address")]
    pub street_address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub country: String,
    pub time: String,
    pub date: String,
    pub host: String,
    pub sponsor: String,
    pub attendee_pitch: Option<String>,
    pub attendee_instructions: Option<String>,
    pub host_contact_info: Option<String>,
}

impl Event {
    /// Serialized field names, in column order.
    pub const COLUMNS: [&'static str; 15] = [
        "event_title",
        "administrative_title",
        "location_name",
        "address",
        "city",
        "state",
        "zip",
        "country",
        "time",
        "date",
        "host",
        "sponsor",
        "attendee_pitch",
        "attendee_instructions",
        "host_contact_info",
    ];
}

/// Projects `strike` into an [`Event`].
///
/// Returns `None` when the strike has no resolved address; such records are
/// left out of the event export. Missing raw fields come through as empty
/// text or `None` rather than failing.
#[must_use]
pub fn project(strike: &Strike, ctx: &EventContext, now: DateTime<Utc>) -> Option<Event> {
    let address = strike.address()?;
    let raw = strike.raw();
    let text = |key: &str| raw.text(key).unwrap_or_default();

    let start = event_start(raw.text("action_start").as_deref(), now);
    let city = address.first_of(&CITY_KEYS).map(str::to_owned);
    let location_name = address
        .first_of(&LOCATION_NAME_KEYS)
        .map(str::to_owned)
        .or_else(|| city.clone());
    let street_address = format!(
        "{} {}",
        address.get("house_number").unwrap_or_default(),
        address.get("road").unwrap_or_default()
    )
    .trim()
    .to_string();
    let country = address
        .get("country_code")
        .map_or_else(|| DEFAULT_COUNTRY.to_string(), str::to_uppercase);
    let more_information = raw.text("more_information");

    Some(Event {
        event_title: format!(
            "{} against {} about {}",
            text("trade_unions_taking_action"),
            text("employer_name"),
            text("action_reason")
        ),
        administrative_title: format!("StrikeID: {}", strike.id()),
        location_name,
        street_address,
        city,
        state: address.get("county").map(str::to_owned),
        zip: strike.postcode().code().map(str::to_owned),
        country,
        time: start.format("%H:%M").to_string(),
        date: start.format("%m/%d/%Y").to_string(),
        host: ctx.host.clone(),
        sponsor: ctx.sponsor.clone(),
        attendee_pitch: more_information.clone(),
        attendee_instructions: more_information,
        host_contact_info: raw.text("email_solidarity"),
    })
}

/// Resolves the listed start time for an event.
///
/// Starts strictly before `now` are replaced by `now` plus
/// [`STALE_START_BUMP_DAYS`], as are missing or unparseable values.
#[must_use]
pub fn event_start(action_start: Option<&str>, now: DateTime<Utc>) -> DateTime<FixedOffset> {
    let bumped = || (now + TimeDelta::days(STALE_START_BUMP_DAYS)).fixed_offset();

    let Some(raw) = action_start else {
        return bumped();
    };
    match parse_action_start(raw) {
        Some(start) if start.with_timezone(&Utc) >= now => start,
        Some(_) => bumped(),
        None => {
            tracing::warn!(action_start = raw, "unparseable action_start; using bumped date");
            bumped()
        }
    }
}

/// Parses RFC 3339 timestamps and common naive forms. Naive values are read
/// as UTC.
fn parse_action_start(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

#[cfg(test)]
#[path = "event_test.rs"]
mod tests;
