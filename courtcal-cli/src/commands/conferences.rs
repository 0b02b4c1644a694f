use anyhow::Result;
use courtcal_core::team::{self, Conference, Division};
use owo_colors::OwoColorize;

pub fn run() -> Result<()> {
    for conference in [Conference::East, Conference::West] {
        println!("{}", format!("{conference}ern Conference").blue().bold());

        for division in Division::ALL.iter().filter(|d| d.conference() == conference) {
            println!("  {}", format!("{division} Division").yellow());
            for team in team::teams_in_division(*division) {
                println!("    {} - {}", team.code, team.name);
            }
        }

        println!();
    }

    Ok(())
}
