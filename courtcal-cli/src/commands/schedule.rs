use std::collections::HashSet;

use anyhow::Result;
use chrono::Utc;
use courtcal_core::config::Config;
use courtcal_core::schedule::{self, FEED_TZ, Game};
use owo_colors::OwoColorize;

use crate::client::NbaClient;
use crate::render::create_spinner;

pub async fn run(limit: usize) -> Result<()> {
    let config = Config::load()?;

    if config.tracked.is_empty() {
        println!("{}", "No teams tracked. Use 'courtcal track <team>' first.".yellow());
        return Ok(());
    }
    let teams = config.tracked.resolve()?;

    let spinner = create_spinner(format!("Fetching {} schedule", config.season));
    let client = NbaClient::new()?;
    let result = client.full_schedule(&config.season).await;
    spinner.finish_and_clear();
    let payload = result?;

    // Tracked teams play each other; show each game once.
    let now = Utc::now();
    let mut seen = HashSet::new();
    let mut games: Vec<Game> = Vec::new();
    for team in teams {
        for game in schedule::normalize(&payload, &config.season, team) {
            if game.start < now {
                continue;
            }
            if seen.insert((game.local_date, game.away_team.clone(), game.home_team.clone())) {
                games.push(game);
            }
        }
    }
    games.sort_by_key(|g| g.start);
    games.truncate(limit);

    if games.is_empty() {
        println!("{}", "No upcoming games found. The season may not have started yet.".yellow());
        return Ok(());
    }

    println!("{}", format!("Upcoming games ({})", config.season).bold());
    for game in &games {
        let tipoff = game.start.with_timezone(&FEED_TZ);
        let until = (game.start - now)
            .to_std()
            .map(|d| std::time::Duration::from_secs(d.as_secs() / 60 * 60))
            .unwrap_or_default();

        println!(
            "  {}  {}  {} @ {}  {}",
            tipoff.format("%a %b %d"),
            tipoff.format("%I:%M %p ET"),
            game.away_name,
            game.home_name,
            format!("in {}", humantime::format_duration(until)).dimmed(),
        );
    }

    Ok(())
}
