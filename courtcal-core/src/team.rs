//! Static registry of NBA teams.
//!
//! Team metadata never changes within a season, so the registry is compiled
//! into the binary rather than fetched or configured. All lookups are
//! case-insensitive.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CourtCalError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Conference {
    East,
    West,
}

impl fmt::Display for Conference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conference::East => write!(f, "East"),
            Conference::West => write!(f, "West"),
        }
    }
}

impl FromStr for Conference {
    type Err = CourtCalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "east" => Ok(Conference::East),
            "west" => Ok(Conference::West),
            _ => Err(CourtCalError::UnknownTeam(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Division {
    Atlantic,
    Central,
    Southeast,
    Northwest,
    Pacific,
    Southwest,
}

impl Division {
    pub const ALL: [Division; 6] = [
        Division::Atlantic,
        Division::Central,
        Division::Southeast,
        Division::Northwest,
        Division::Pacific,
        Division::Southwest,
    ];

    pub const fn conference(&self) -> Conference {
        match self {
            Division::Atlantic | Division::Central | Division::Southeast => Conference::East,
            Division::Northwest | Division::Pacific | Division::Southwest => Conference::West,
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Division::Atlantic => "Atlantic",
            Division::Central => "Central",
            Division::Southeast => "Southeast",
            Division::Northwest => "Northwest",
            Division::Pacific => "Pacific",
            Division::Southwest => "Southwest",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Division {
    type Err = CourtCalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "atlantic" => Ok(Division::Atlantic),
            "central" => Ok(Division::Central),
            "southeast" => Ok(Division::Southeast),
            "northwest" => Ok(Division::Northwest),
            "pacific" => Ok(Division::Pacific),
            "southwest" => Ok(Division::Southwest),
            _ => Err(CourtCalError::UnknownTeam(s.to_string())),
        }
    }
}

/// One NBA team. `code` is the three-letter abbreviation used both in the
/// upstream schedule feed and in calendar file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Team {
    pub code: &'static str,
    pub name: &'static str,
    pub conference: Conference,
    pub division: Division,
}

macro_rules! team {
    ($code:literal, $name:literal, $division:ident) => {
        Team {
            code: $code,
            name: $name,
            conference: Division::$division.conference(),
            division: Division::$division,
        }
    };
}

pub static TEAMS: [Team; 30] = [
    // East / Atlantic
    team!("BOS", "Boston Celtics", Atlantic),
    team!("BKN", "Brooklyn Nets", Atlantic),
    team!("NYK", "New York Knicks", Atlantic),
    team!("PHI", "Philadelphia 76ers", Atlantic),
    team!("TOR", "Toronto Raptors", Atlantic),
    // East / Central
    team!("CHI", "Chicago Bulls", Central),
    team!("CLE", "Cleveland Cavaliers", Central),
    team!("DET", "Detroit Pistons", Central),
    team!("IND", "Indiana Pacers", Central),
    team!("MIL", "Milwaukee Bucks", Central),
    // East / Southeast
    team!("ATL", "Atlanta Hawks", Southeast),
    team!("CHA", "Charlotte Hornets", Southeast),
    team!("MIA", "Miami Heat", Southeast),
    team!("ORL", "Orlando Magic", Southeast),
    team!("WAS", "Washington Wizards", Southeast),
    // West / Northwest
    team!("DEN", "Denver Nuggets", Northwest),
    team!("MIN", "Minnesota Timberwolves", Northwest),
    team!("OKC", "Oklahoma City Thunder", Northwest),
    team!("POR", "Portland Trail Blazers", Northwest),
    team!("UTA", "Utah Jazz", Northwest),
    // West / Pacific
    team!("GSW", "Golden State Warriors", Pacific),
    team!("LAC", "Los Angeles Clippers", Pacific),
    team!("LAL", "Los Angeles Lakers", Pacific),
    team!("PHX", "Phoenix Suns", Pacific),
    team!("SAC", "Sacramento Kings", Pacific),
    // West / Southwest
    team!("DAL", "Dallas Mavericks", Southwest),
    team!("HOU", "Houston Rockets", Southwest),
    team!("MEM", "Memphis Grizzlies", Southwest),
    team!("NOP", "New Orleans Pelicans", Southwest),
    team!("SAS", "San Antonio Spurs", Southwest),
];

/// Look up a team by its three-letter code (case-insensitive).
pub fn team_by_code(code: &str) -> Option<&'static Team> {
    TEAMS.iter().find(|t| t.code.eq_ignore_ascii_case(code))
}

/// Look up a team by code or name fragment ("LAL", "Lakers", "boston").
/// An exact code match wins over a name match.
pub fn team_by_name(query: &str) -> Option<&'static Team> {
    if let Some(team) = team_by_code(query) {
        return Some(team);
    }
    let query = query.to_ascii_lowercase();
    TEAMS
        .iter()
        .find(|t| t.name.to_ascii_lowercase().contains(&query))
}

pub fn teams_in_conference(conference: Conference) -> impl Iterator<Item = &'static Team> {
    TEAMS.iter().filter(move |t| t.conference == conference)
}

pub fn teams_in_division(division: Division) -> impl Iterator<Item = &'static Team> {
    TEAMS.iter().filter(move |t| t.division == division)
}
