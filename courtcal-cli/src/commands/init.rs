use anyhow::Result;
use courtcal_core::config::Config;
use courtcal_core::team::{self, Division};
use dialoguer::{Input, MultiSelect, Select};
use owo_colors::OwoColorize;

pub fn run() -> Result<()> {
    println!("{}", "courtcal setup".blue().bold());
    println!("Configure your NBA schedule tracker.\n");

    let mut config = Config::load()?;

    let season: String = Input::new()
        .with_prompt("Season")
        .default(Config::current_season())
        .interact_text()?;
    config.season = season;

    let choice = Select::new()
        .with_prompt("What do you want to track?")
        .items(&["Specific teams", "Conferences", "Divisions", "All of the above"])
        .default(0)
        .interact()?;

    if choice == 0 || choice == 3 {
        let input: String = Input::new()
            .with_prompt("Teams (comma-separated, e.g. LAL, Celtics, GSW)")
            .allow_empty(true)
            .interact_text()?;

        let mut teams = Vec::new();
        for raw in input.split(',') {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            match team::team_by_name(raw) {
                Some(team) => teams.push(team.code.to_string()),
                None => println!("{}", format!("Unknown team: {raw}").yellow()),
            }
        }
        teams.sort();
        teams.dedup();
        config.tracked.teams = teams;
    }

    if choice == 1 || choice == 3 {
        let items = ["East", "West"];
        let picked = MultiSelect::new()
            .with_prompt("Conferences")
            .items(&items)
            .interact()?;
        config.tracked.conferences = picked.into_iter().map(|i| items[i].to_string()).collect();
    }

    if choice == 2 || choice == 3 {
        let items: Vec<String> = Division::ALL.iter().map(|d| d.to_string()).collect();
        let picked = MultiSelect::new()
            .with_prompt("Divisions")
            .items(&items)
            .interact()?;
        config.tracked.divisions = picked.into_iter().map(|i| items[i].clone()).collect();
    }

    config.save()?;
    println!(
        "\n{}",
        format!("Configuration saved to {}", Config::config_path()?.display()).green()
    );
    println!("Run 'courtcal sync' to generate your calendar files.");

    Ok(())
}
