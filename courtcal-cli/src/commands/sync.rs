use anyhow::Result;
use chrono::Utc;
use courtcal_core::config::Config;
use courtcal_core::sync::{self, SyncOptions};
use owo_colors::OwoColorize;

use crate::client::NbaClient;
use crate::render::{Render, create_spinner};

/// Above this many changes per team, only the counters are shown.
const COMPACT_THRESHOLD: usize = 8;

pub async fn run() -> Result<()> {
    let config = Config::load()?;

    if config.tracked.is_empty() {
        println!("{}", "No teams tracked. Use 'courtcal track <team>' first.".yellow());
        return Ok(());
    }

    let spinner = create_spinner(format!("Fetching {} schedule", config.season));
    let client = NbaClient::new()?;
    let result = client.full_schedule(&config.season).await;
    spinner.finish_and_clear();
    let payload = result?;

    let opts = SyncOptions {
        out_dir: config.calendars_dir()?,
        reminder_minutes: config.reminder_minutes,
        now: Utc::now(),
    };
    let reports = sync::sync(&config.tracked, &config.season, &payload, &opts)?;

    for (i, report) in reports.iter().enumerate() {
        println!("{}", report.render());

        if report.changes.len() <= COMPACT_THRESHOLD {
            for change in &report.changes {
                println!("   {}", change.render());
            }
        }

        if i < reports.len() - 1 {
            println!();
        }
    }

    let failed = reports.iter().filter(|r| !r.is_ok()).count();

    if reports.iter().all(|r| r.is_noop()) {
        println!("\nUp to date");
    } else {
        println!(
            "\nWrote {} calendar file(s) to {}",
            reports.len() - failed,
            opts.out_dir.display()
        );
        println!("Subscribe to a file from your calendar app to keep it updated.");
    }

    if failed > 0 {
        anyhow::bail!("{failed} team(s) failed to sync");
    }

    Ok(())
}
