//! The fetch → postcode → address → project → export run.
//!
//! Each stage consumes the previous stage's full output. Source and postcode
//! failures abort the run; address misses only drop the record from the
//! event export.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Utc};
use strikemap_core::{AppConfig, Event, EventContext, RunSettings, Strike};
use strikemap_geocode::{AddressEnricher, NominatimClient, PostcodesClient, Throttle};
use strikemap_source::SourceClient;

use crate::export;

/// Destination files for one run, stamped with the run's start time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OutputPaths {
    pub(crate) geocoded: PathBuf,
    pub(crate) events: PathBuf,
}

impl OutputPaths {
    pub(crate) fn new(output_dir: &Path, now: DateTime<Utc>) -> Self {
        let stamp = now.format("%Y-%m-%dT%H-%M-%S");
        Self {
            geocoded: output_dir
                .join("geocoded")
                .join(format!("{stamp}_strikemap_loads.csv")),
            events: output_dir
                .join("an_events")
                .join(format!("{stamp}_strikemap.csv")),
        }
    }
}

/// What a completed run produced.
#[derive(Debug)]
pub(crate) struct RunSummary {
    pub(crate) strikes: usize,
    pub(crate) events: usize,
    pub(crate) skipped: usize,
    pub(crate) paths: OutputPaths,
}

/// Runs the full pipeline once.
///
/// `now` drives both the stale-date rule in the event projection and the
/// output file names.
///
/// # Errors
///
/// Returns an error naming the failing stage: building clients, fetching
/// strike records, postcode enrichment, or writing any of the CSV files.
pub(crate) async fn run(
    config: &AppConfig,
    settings: &RunSettings,
    now: DateTime<Utc>,
) -> anyhow::Result<RunSummary> {
    let source = SourceClient::new(config.request_timeout_secs, &config.user_agent)
        .context("building source client")?;
    let postcodes = PostcodesClient::new(
        config.request_timeout_secs,
        &config.user_agent,
        &config.postcodes_base_url,
    )
    .context("building postcodes client")?;
    let nominatim = NominatimClient::new(
        config.request_timeout_secs,
        &config.user_agent,
        &config.nominatim_base_url,
    )
    .context("building nominatim client")?;

    let records = source
        .fetch(&settings.source, &settings.records_pointer, settings.limit)
        .await
        .context("fetching strike records")?;

    let pending = postcodes
        .enrich(records)
        .await
        .context("postcode enrichment")?;

    if let Some(path) = &config.geocode_dump_path {
        export::write_geocode_dump(path, &pending)
            .with_context(|| format!("writing geocode dump to {}", path.display()))?;
    }

    let throttle = Throttle::new(Duration::from_millis(config.geocode_min_delay_ms));
    let mut enricher = AddressEnricher::new(nominatim, throttle);
    let strikes = enricher.enrich(pending).await;

    let events = project_events(&strikes, &settings.event_context(), now);
    let skipped = strikes.len() - events.len();

    let paths = OutputPaths::new(&config.output_dir, now);
    let records: Vec<serde_json::Value> = strikes.iter().map(Strike::to_record).collect();
    export::export_csv(&paths.geocoded, &records).context("exporting geocoded strikes")?;
    export::export_serialized(&paths.events, &Event::COLUMNS, &events)
        .context("exporting events")?;

    Ok(RunSummary {
        strikes: strikes.len(),
        events: events.len(),
        skipped,
        paths,
    })
}

/// Projects every strike with a resolved address; the rest are logged and
/// left out.
pub(crate) fn project_events(
    strikes: &[Strike],
    ctx: &EventContext,
    now: DateTime<Utc>,
) -> Vec<Event> {
    let events: Vec<Event> = strikes
        .iter()
        .filter_map(|strike| {
            let event = strikemap_core::project(strike, ctx, now);
            if event.is_none() {
                tracing::warn!(id = %strike.id(), "no address; strike left out of event export");
            }
            event
        })
        .collect();
    tracing::info!(
        strikes = strikes.len(),
        events = events.len(),
        "projected events"
    );
    events
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
