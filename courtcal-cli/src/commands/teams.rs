use anyhow::Result;
use courtcal_core::team::{Conference, Division, TEAMS};
use owo_colors::OwoColorize;

pub fn run(conference: Option<&str>, division: Option<&str>, search: Option<&str>) -> Result<()> {
    let conference: Option<Conference> = conference.map(str::parse).transpose()?;
    let division: Option<Division> = division.map(str::parse).transpose()?;
    let search = search.map(str::to_ascii_lowercase);

    println!(
        "{}",
        format!("{:<6} {:<26} {:<6} {}", "CODE", "TEAM", "CONF", "DIVISION").bold()
    );

    // The registry is already ordered by conference and division.
    for team in TEAMS.iter() {
        if conference.is_some_and(|c| team.conference != c) {
            continue;
        }
        if division.is_some_and(|d| team.division != d) {
            continue;
        }
        if let Some(ref query) = search {
            let matches = team.name.to_ascii_lowercase().contains(query)
                || team.code.eq_ignore_ascii_case(query);
            if !matches {
                continue;
            }
        }

        // to_string first: width specifiers only pad types that honor
        // Formatter::pad, which the plain enum Display impls don't.
        println!(
            "{:<6} {:<26} {:<6} {}",
            team.code,
            team.name,
            team.conference.to_string(),
            team.division
        );
    }

    Ok(())
}
