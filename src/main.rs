mod diagnostics;
mod fetch;
mod schedule;
mod ui;

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::Parser;

use crate::fetch::ScheduleClient;
use crate::schedule::ScheduleSnapshot;
use crate::schedule::model::{parse_event_time, parse_schedule_text};

const DEFAULT_SCHEDULE_URL: &str = "https://helltides.com/api/schedule";

#[derive(Parser, Debug)]
#[command(
    name = "d4timers",
    version,
    about = "Always-on-top countdown overlay for Diablo IV world events"
)]
struct Cli {
    /// Schedule endpoint to poll.
    #[arg(long, default_value = DEFAULT_SCHEDULE_URL)]
    url: String,

    /// Request timeout for schedule fetches, in seconds.
    #[arg(long, default_value_t = 5)]
    timeout_secs: u64,

    /// Refresh interval for the overlay labels, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    tick_ms: u64,

    /// Background opacity of the overlay window.
    #[arg(long, default_value_t = 0.7)]
    opacity: f32,

    /// Evaluate the schedule once, print the result, and exit (no window).
    #[arg(long)]
    diagnostics: bool,

    /// Read the schedule from a local JSON file instead of the network
    /// (diagnostics mode only).
    #[arg(long)]
    schedule: Option<PathBuf>,

    /// Reference time for diagnostics, e.g. 2024-06-01T09:00:00Z.
    /// Defaults to the current time.
    #[arg(long)]
    at: Option<String>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    if cli.timeout_secs == 0 {
        bail!("--timeout-secs must be greater than zero");
    }
    if cli.tick_ms == 0 {
        bail!("--tick-ms must be greater than zero");
    }
    if !(0.05..=1.0).contains(&cli.opacity) {
        bail!("--opacity must be between 0.05 and 1.0");
    }

    let timeout = Duration::from_secs(cli.timeout_secs);

    if cli.diagnostics {
        let snapshot = load_diagnostics_snapshot(&cli, timeout)?;
        let now = match &cli.at {
            Some(raw) => parse_event_time(raw)
                .with_context(|| format!("invalid --at value '{raw}'"))?,
            None => Utc::now(),
        };
        diagnostics::run_diagnostics(&snapshot, now);
        return Ok(());
    }

    let client = ScheduleClient::new(&cli.url, timeout)?;
    let snapshot = match client.fetch() {
        Ok(snapshot) => {
            if snapshot.skipped_records > 0 {
                eprintln!(
                    "skipped {} malformed schedule record(s)",
                    snapshot.skipped_records
                );
            }
            snapshot
        }
        Err(err) => {
            eprintln!("failed to fetch schedule from {}: {err}", client.url());
            ScheduleSnapshot::default()
        }
    };

    ui::app::run_overlay(
        client,
        snapshot,
        Duration::from_millis(cli.tick_ms),
        cli.opacity,
    )
}

fn load_diagnostics_snapshot(cli: &Cli, timeout: Duration) -> Result<ScheduleSnapshot> {
    match &cli.schedule {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("unable to read schedule file {}", path.display()))?;
            Ok(parse_schedule_text(&content)?)
        }
        None => {
            let client = ScheduleClient::new(&cli.url, timeout)?;
            Ok(client
                .fetch()
                .with_context(|| format!("failed to fetch schedule from {}", cli.url))?)
        }
    }
}
