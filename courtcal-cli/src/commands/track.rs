use anyhow::Result;
use courtcal_core::config::Config;
use courtcal_core::team::{self, Conference, Division};
use owo_colors::OwoColorize;

pub fn run(name: &str) -> Result<()> {
    let mut config = Config::load()?;

    if let Ok(conference) = name.parse::<Conference>() {
        let label = conference.to_string();
        if contains(&config.tracked.conferences, &label) {
            println!("{}", format!("Already tracking the {label}ern Conference").yellow());
        } else {
            config.tracked.conferences.push(label.clone());
            config.save()?;
            println!("{}", format!("Now tracking the {label}ern Conference").green());
        }
        return Ok(());
    }

    if let Ok(division) = name.parse::<Division>() {
        let label = division.to_string();
        if contains(&config.tracked.divisions, &label) {
            println!("{}", format!("Already tracking the {label} Division").yellow());
        } else {
            config.tracked.divisions.push(label.clone());
            config.save()?;
            println!("{}", format!("Now tracking the {label} Division").green());
        }
        return Ok(());
    }

    let Some(team) = team::team_by_name(name) else {
        anyhow::bail!("Unknown team: '{name}'. Use 'courtcal teams' to see what's available.");
    };

    if contains(&config.tracked.teams, team.code) {
        println!("{}", format!("Already tracking {} ({})", team.name, team.code).yellow());
    } else {
        config.tracked.teams.push(team.code.to_string());
        config.save()?;
        println!("{}", format!("Now tracking {} ({})", team.name, team.code).green());
    }

    Ok(())
}

fn contains(entries: &[String], value: &str) -> bool {
    entries.iter().any(|e| e.eq_ignore_ascii_case(value))
}
