use anyhow::Result;
use courtcal_core::config::Config;
use courtcal_core::team;
use owo_colors::OwoColorize;

pub fn run() -> Result<()> {
    let config = Config::load()?;

    println!("{}", "courtcal configuration".bold());
    println!("Config file: {}", Config::config_path()?.display());
    println!("Calendars:   {}", config.calendars_dir()?.display());

    println!("\nSeason: {}", config.season);

    if !config.tracked.teams.is_empty() {
        println!("\n{}", "Tracked teams:".bold());
        for code in &config.tracked.teams {
            match team::team_by_code(code) {
                Some(team) => println!("  - {} ({})", team.name, team.code),
                None => println!("  - {}", format!("{code} (unknown team)").red()),
            }
        }
    }

    if !config.tracked.conferences.is_empty() {
        println!("\n{}", "Tracked conferences:".bold());
        for conference in &config.tracked.conferences {
            println!("  - {conference}ern Conference");
        }
    }

    if !config.tracked.divisions.is_empty() {
        println!("\n{}", "Tracked divisions:".bold());
        for division in &config.tracked.divisions {
            println!("  - {division} Division");
        }
    }

    if config.tracked.is_empty() {
        println!(
            "\n{}",
            "No teams tracked. Use 'courtcal track <team>' to add some.".yellow()
        );
    }

    Ok(())
}
