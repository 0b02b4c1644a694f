//! The user's tracked selection and its expansion into concrete teams.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CourtCalError, CourtCalResult};
use crate::team::{self, Conference, Division, Team};

/// What the user chose to track: explicit teams plus whole conferences or
/// divisions. Stored as plain strings because the config file is
/// hand-editable; everything is re-validated against the registry when the
/// selection is resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackedSelection {
    #[serde(default)]
    pub teams: Vec<String>,

    #[serde(default)]
    pub conferences: Vec<String>,

    #[serde(default)]
    pub divisions: Vec<String>,
}

impl TrackedSelection {
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty() && self.conferences.is_empty() && self.divisions.is_empty()
    }

    /// Expand the selection into the deduplicated set of teams it covers:
    /// explicit teams plus every member of a tracked conference or division.
    /// Returned in code order so downstream output is deterministic.
    ///
    /// Fails with `UnknownTeam` on any entry the registry doesn't know,
    /// even though tracking commands validate on the way in. The config
    /// file may have been edited by hand.
    pub fn resolve(&self) -> CourtCalResult<Vec<&'static Team>> {
        let mut resolved: BTreeMap<&'static str, &'static Team> = BTreeMap::new();

        for code in &self.teams {
            let team = team::team_by_code(code)
                .ok_or_else(|| CourtCalError::UnknownTeam(code.clone()))?;
            resolved.insert(team.code, team);
        }

        for name in &self.conferences {
            let conference: Conference = name.parse()?;
            for team in team::teams_in_conference(conference) {
                resolved.insert(team.code, team);
            }
        }

        for name in &self.divisions {
            let division: Division = name.parse()?;
            for team in team::teams_in_division(division) {
                resolved.insert(team.code, team);
            }
        }

        Ok(resolved.into_values().collect())
    }
}
