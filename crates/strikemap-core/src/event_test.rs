use chrono::TimeZone;
use serde_json::{json, Value};

use super::*;
use crate::strike::{Address, PendingStrike, PostcodeResult, RawStrike};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 17, 12, 30, 0).unwrap()
}

fn ctx() -> EventContext {
    EventContext {
        host: "Strike Map".to_string(),
        sponsor: "Solidarity Network".to_string(),
    }
}

fn raw_record() -> Value {
    json!({
        "id": 101,
        "location": {"lat": 51.5074, "lng": -0.1278},
        "action_start": "2027-01-15T09:00:00+00:00",
        "trade_unions_taking_action": "RMT",
        "employer_name": "Network Rail",
        "action_reason": "pay",
        "more_information": "Join the picket line",
        "email_solidarity": "solidarity@example.org"
    })
}

fn strike_with(raw: Value, address: Option<Value>) -> Strike {
    let raw = RawStrike::from_value(raw).unwrap();
    let lookup: PostcodeResult =
        serde_json::from_value(json!({"result": [{"postcode": "WC2N 5DU"}]})).unwrap();
    let address = address.map(|a| serde_json::from_value::<Address>(a).unwrap());
    PendingStrike::assemble(raw, lookup).resolve(address)
}

fn project_address(address: Value) -> Event {
    project(&strike_with(raw_record(), Some(address)), &ctx(), now()).unwrap()
}

#[test]
fn projects_full_record() {
    let event = project_address(json!({
        "house_number": "10",
        "road": "Downing Street",
        "city": "London",
        "county": "Greater London",
        "country_code": "gb"
    }));

    assert_eq!(event.event_title, "RMT against Network Rail about pay");
    assert_eq!(event.administrative_title, "StrikeID: 101");
    assert_eq!(event.location_name.as_deref(), Some("London"));
    assert_eq!(event.street_address, "10 Downing Street");
    assert_eq!(event.city.as_deref(), Some("London"));
    assert_eq!(event.state.as_deref(), Some("Greater London"));
    assert_eq!(event.zip.as_deref(), Some("WC2N 5DU"));
    assert_eq!(event.country, "GB");
    assert_eq!(event.time, "09:00");
    assert_eq!(event.date, "01/15/2027");
    assert_eq!(event.host, "Strike Map");
    assert_eq!(event.sponsor, "Solidarity Network");
    assert_eq!(event.attendee_pitch.as_deref(), Some("Join the picket line"));
    assert_eq!(event.attendee_instructions, event.attendee_pitch);
    assert_eq!(
        event.host_contact_info.as_deref(),
        Some("solidarity@example.org")
    );
}

#[test]
fn strike_without_address_is_not_projected() {
    let strike = strike_with(raw_record(), None);
    assert!(project(&strike, &ctx(), now()).is_none());
}

#[test]
fn country_code_is_uppercased() {
    for code in ["fr", "De", "IE"] {
        let event = project_address(json!({"road": "Main St", "country_code": code}));
        assert_eq!(event.country, code.to_uppercase());
    }
}

#[test]
fn absent_or_empty_country_code_defaults_to_gb() {
    assert_eq!(project_address(json!({"road": "Main St"})).country, "GB");
    assert_eq!(
        project_address(json!({"road": "Main St", "country_code": ""})).country,
        "GB"
    );
    assert_eq!(
        project_address(json!({"road": "Main St", "country_code": null})).country,
        "GB"
    );
}

#[test]
fn city_follows_priority_order() {
    let full = json!({
        "city": "City", "suburb": "Suburb", "town": "Town",
        "village": "Village", "county": "County"
    });
    assert_eq!(project_address(full).city.as_deref(), Some("City"));

    let no_city = json!({"suburb": "Suburb", "town": "Town", "county": "County"});
    assert_eq!(project_address(no_city).city.as_deref(), Some("Suburb"));

    let town = json!({"city": "", "town": "Town", "village": "Village"});
    assert_eq!(project_address(town).city.as_deref(), Some("Town"));

    let village = json!({"village": "Village", "county": "County"});
    assert_eq!(project_address(village).city.as_deref(), Some("Village"));

    let county = json!({"county": "County"});
    assert_eq!(project_address(county).city.as_deref(), Some("County"));

    assert_eq!(project_address(json!({"road": "A1"})).city, None);
}

#[test]
fn location_name_prefers_named_places_then_city() {
    let shop = json!({"shop": "Co-op", "building": "Unit 4", "town": "Frome"});
    assert_eq!(project_address(shop).location_name.as_deref(), Some("Co-op"));

    let place = json!({"place": "Market Square", "shop": "Co-op"});
    assert_eq!(
        project_address(place).location_name.as_deref(),
        Some("Market Square")
    );

    let building = json!({"building": "Town Hall", "town": "Frome"});
    assert_eq!(
        project_address(building).location_name.as_deref(),
        Some("Town Hall")
    );

    let city_only = json!({"town": "Frome"});
    assert_eq!(
        project_address(city_only).location_name.as_deref(),
        Some("Frome")
    );
}

#[test]
fn street_address_without_house_number_has_no_leading_space() {
    let event = project_address(json!({"house_number": null, "road": "High St"}));
    assert_eq!(event.street_address, "High St");

    let event = project_address(json!({"road": "High St"}));
    assert_eq!(event.street_address, "High St");
}

#[test]
fn street_address_without_road_keeps_house_number() {
    let event = project_address(json!({"house_number": "12"}));
    assert_eq!(event.street_address, "12");
}

#[test]
fn missing_postcode_leaves_zip_empty() {
    let raw = RawStrike::from_value(raw_record()).unwrap();
    let address: Address = serde_json::from_value(json!({"road": "High St"})).unwrap();
    let strike = PendingStrike::assemble(raw, PostcodeResult::default()).resolve(Some(address));
    let event = project(&strike, &ctx(), now()).unwrap();
    assert_eq!(event.zip, None);
}

#[test]
fn missing_raw_fields_do_not_fail_projection() {
    let strike = strike_with(
        json!({"id": "x", "location": {"lat": 1, "lng": 2}}),
        Some(json!({"road": "High St"})),
    );
    let event = project(&strike, &ctx(), now()).unwrap();
    assert_eq!(event.event_title, " against  about ");
    assert_eq!(event.administrative_title, "StrikeID: x");
    assert_eq!(event.attendee_pitch, None);
    assert_eq!(event.host_contact_info, None);
    // No action_start: bumped to now + 10 days.
    assert_eq!(event.date, "10/27/2026");
    assert_eq!(event.time, "12:30");
}

#[test]
fn past_start_is_bumped_ten_days_past_now() {
    for past in [
        "2020-03-01T08:00:00Z",
        "2026-10-17T12:29:59+00:00",
        "2024-05-01 07:30:00",
        "2024-05-01",
    ] {
        let start = event_start(Some(past), now());
        assert_eq!(start.format("%m/%d/%Y").to_string(), "10/27/2026", "{past}");
        assert_eq!(start.format("%H:%M").to_string(), "12:30", "{past}");
    }
}

#[test]
fn start_equal_to_now_is_kept() {
    let start = event_start(Some("2026-10-17T12:30:00Z"), now());
    assert_eq!(start.with_timezone(&Utc), now());
}

#[test]
fn future_start_keeps_its_own_offset() {
    let start = event_start(Some("2026-12-01T18:45:00+01:00"), now());
    assert_eq!(start.format("%H:%M").to_string(), "18:45");
    assert_eq!(start.format("%m/%d/%Y").to_string(), "12/01/2026");
}

#[test]
fn future_naive_forms_are_read_as_utc() {
    let start = event_start(Some("2027-02-03 06:05"), now());
    assert_eq!(start.format("%m/%d/%Y %H:%M").to_string(), "02/03/2027 06:05");

    let start = event_start(Some("2027-02-03T06:05:09.250"), now());
    assert_eq!(start.format("%H:%M").to_string(), "06:05");
}

#[test]
fn unparseable_start_is_bumped() {
    let start = event_start(Some("next tuesday"), now());
    assert_eq!(start.format("%m/%d/%Y").to_string(), "10/27/2026");
}

#[test]
fn event_serializes_street_address_as_address_column() {
    let event = project_address(json!({"road": "High St"}));
    let value = serde_json::to_value(&event).unwrap();
    let keys: Vec<&str> = value
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, Event::COLUMNS);
}
