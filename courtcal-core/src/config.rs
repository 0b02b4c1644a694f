//! Application configuration at ~/.config/courtcal/config.toml.

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CourtCalError, CourtCalResult};
use crate::tracking::TrackedSelection;

const DEFAULT_REMINDER_MINUTES: i64 = 60;

fn default_season() -> String {
    Config::current_season()
}

fn default_reminder_minutes() -> i64 {
    DEFAULT_REMINDER_MINUTES
}

fn is_default_reminder(minutes: &i64) -> bool {
    *minutes == DEFAULT_REMINDER_MINUTES
}

/// Persistent configuration: which season to sync and what to track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Season identifier, e.g. "2024-25".
    #[serde(default = "default_season")]
    pub season: String,

    #[serde(default)]
    pub tracked: TrackedSelection,

    /// Minutes before tip-off for the calendar reminder; 0 disables it.
    #[serde(default = "default_reminder_minutes", skip_serializing_if = "is_default_reminder")]
    pub reminder_minutes: i64,

    /// Override for where calendar files are written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            season: default_season(),
            tracked: TrackedSelection::default(),
            reminder_minutes: DEFAULT_REMINDER_MINUTES,
            calendar_dir: None,
        }
    }
}

impl Config {
    pub fn config_path() -> CourtCalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CourtCalError::Config("Could not determine config directory".into()))?
            .join("courtcal");

        Ok(config_dir.join("config.toml"))
    }

    pub fn load() -> CourtCalResult<Config> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> CourtCalResult<Config> {
        let config: Config = config::Config::builder()
            .add_source(config::File::from(path.to_path_buf()).required(false))
            .build()
            .map_err(|e| CourtCalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CourtCalError::Config(e.to_string()))?;

        Ok(config)
    }

    /// Save the current config to ~/.config/courtcal/config.toml
    pub fn save(&self) -> CourtCalResult<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CourtCalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| CourtCalError::Config(e.to_string()))?;

        std::fs::write(&config_path, content)
            .map_err(|e| CourtCalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CourtCalResult<()> {
        let contents = format!(
            "\
# courtcal configuration

# NBA season to sync:
# season = \"{}\"

# Minutes before tip-off for the calendar reminder (0 disables it):
# reminder_minutes = {}

# Where calendar files are written:
# calendar_dir = \"~/calendars/nba\"

# What to track:
# [tracked]
# teams = [\"LAL\", \"BOS\"]
# conferences = [\"West\"]
# divisions = [\"Atlantic\"]
",
            Config::current_season(),
            DEFAULT_REMINDER_MINUTES,
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CourtCalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CourtCalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Where calendar files are written: the configured override (with `~`
    /// expansion) or the platform data directory.
    pub fn calendars_dir(&self) -> CourtCalResult<PathBuf> {
        match &self.calendar_dir {
            Some(dir) => {
                let expanded = shellexpand::tilde(&dir.to_string_lossy()).into_owned();
                Ok(PathBuf::from(expanded))
            }
            None => {
                let data_dir = dirs::data_dir().ok_or_else(|| {
                    CourtCalError::Config("Could not determine data directory".into())
                })?;
                Ok(data_dir.join("courtcal").join("calendars"))
            }
        }
    }

    /// The season in progress today. Seasons start in October: before that
    /// the previous season is still the current one.
    pub fn current_season() -> String {
        Self::season_for(chrono::Local::now().date_naive())
    }

    fn season_for(date: NaiveDate) -> String {
        let start_year = if date.month() >= 10 {
            date.year()
        } else {
            date.year() - 1
        };
        format!("{}-{:02}", start_year, (start_year + 1) % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_rolls_over_in_october() {
        let in_season = NaiveDate::from_ymd_opt(2024, 11, 15).unwrap();
        assert_eq!(Config::season_for(in_season), "2024-25");

        let spring = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        assert_eq!(Config::season_for(spring), "2024-25");

        let next_october = NaiveDate::from_ymd_opt(2025, 10, 25).unwrap();
        assert_eq!(Config::season_for(next_october), "2025-26");
    }

    #[test]
    fn season_string_pads_the_short_year() {
        let date = NaiveDate::from_ymd_opt(2099, 12, 1).unwrap();
        assert_eq!(Config::season_for(date), "2099-00");
    }

    #[test]
    fn commented_default_file_loads_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        Config::create_default_config(&path).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.tracked.is_empty());
        assert_eq!(config.reminder_minutes, DEFAULT_REMINDER_MINUTES);
        assert_eq!(config.season, Config::current_season());
    }

    #[test]
    fn round_trips_through_toml() {
        let config = Config {
            season: "2024-25".to_string(),
            tracked: TrackedSelection {
                teams: vec!["LAL".to_string()],
                conferences: vec!["East".to_string()],
                divisions: Vec::new(),
            },
            reminder_minutes: 30,
            calendar_dir: Some(PathBuf::from("~/calendars/nba")),
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(back.season, config.season);
        assert_eq!(back.tracked, config.tracked);
        assert_eq!(back.reminder_minutes, 30);
    }

    #[test]
    fn tilde_in_calendar_dir_is_expanded() {
        let config = Config {
            calendar_dir: Some(PathBuf::from("~/calendars/nba")),
            ..Config::default()
        };
        let dir = config.calendars_dir().unwrap();
        assert!(!dir.to_string_lossy().contains('~'));
    }
}
