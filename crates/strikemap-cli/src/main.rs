mod export;
mod pipeline;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use strikemap_core::{AppConfig, RunSettings};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "strikemap")]
#[command(about = "Export strike map records as geocoded and event-import CSVs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch, geocode, and export strikes
    Run {
        /// Settings file (overrides STRIKEMAP_SETTINGS_PATH)
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Keep only the first N strikes (overrides the settings file)
        #[arg(long)]
        limit: Option<usize>,
        /// Directory for the CSV exports (overrides STRIKEMAP_OUTPUT_DIR)
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Also write the `{id, geom}` pairs sent for reverse geocoding
        #[arg(long)]
        dump_geocode: Option<PathBuf>,
    },
    /// Load and validate the settings file without touching the network
    CheckSettings {
        #[arg(long)]
        settings: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = strikemap_core::load_app_config().context("loading configuration")?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Run {
            settings,
            limit,
            output_dir,
            dump_geocode,
        } => {
            apply_overrides(&mut config, settings, output_dir, dump_geocode);
            let mut run_settings = load_settings(&config)?;
            if limit.is_some() {
                run_settings.limit = limit;
            }

            let now = chrono::Utc::now();
            let summary = pipeline::run(&config, &run_settings, now).await?;
            tracing::info!(
                strikes = summary.strikes,
                events = summary.events,
                skipped = summary.skipped,
                "run complete"
            );
            println!("geocoded: {}", summary.paths.geocoded.display());
            println!("events:   {}", summary.paths.events.display());
        }
        Commands::CheckSettings { settings } => {
            apply_overrides(&mut config, settings, None, None);
            let run_settings = load_settings(&config)?;
            println!(
                "settings ok: source={} host={:?} sponsor={:?} limit={}",
                run_settings.source,
                run_settings.host,
                run_settings.sponsor,
                run_settings
                    .limit
                    .map_or_else(|| "none".to_string(), |n| n.to_string())
            );
        }
    }

    Ok(())
}

fn apply_overrides(
    config: &mut AppConfig,
    settings: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    dump_geocode: Option<PathBuf>,
) {
    if let Some(path) = settings {
        config.settings_path = path;
    }
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }
    if dump_geocode.is_some() {
        config.geocode_dump_path = dump_geocode;
    }
}

fn load_settings(config: &AppConfig) -> anyhow::Result<RunSettings> {
    strikemap_core::load_settings(&config.settings_path).with_context(|| {
        format!(
            "loading settings from {}",
            config.settings_path.display()
        )
    })
}
