use anyhow::Result;
use courtcal_core::config::Config;
use courtcal_core::team::{self, Conference, Division};
use owo_colors::OwoColorize;

pub fn run(name: &str) -> Result<()> {
    let mut config = Config::load()?;

    if let Ok(conference) = name.parse::<Conference>() {
        let label = conference.to_string();
        if remove(&mut config.tracked.conferences, &label) {
            config.save()?;
            println!("{}", format!("Stopped tracking the {label}ern Conference").green());
            return Ok(());
        }
    }

    if let Ok(division) = name.parse::<Division>() {
        let label = division.to_string();
        if remove(&mut config.tracked.divisions, &label) {
            config.save()?;
            println!("{}", format!("Stopped tracking the {label} Division").green());
            return Ok(());
        }
    }

    if let Some(team) = team::team_by_name(name) {
        if remove(&mut config.tracked.teams, team.code) {
            config.save()?;
            println!("{}", format!("Stopped tracking {} ({})", team.name, team.code).green());
            return Ok(());
        }
    }

    println!("{}", format!("Not tracking: {name}").yellow());
    Ok(())
}

fn remove(entries: &mut Vec<String>, value: &str) -> bool {
    let before = entries.len();
    entries.retain(|e| !e.eq_ignore_ascii_case(value));
    entries.len() != before
}
