//! Calendar event model and its derivation from games.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::schedule::{Game, GameStatus};

/// How long a game blocks the calendar. Games run 2.5-3 hours.
const GAME_DURATION_HOURS: i64 = 3;

/// A calendar event, one per game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Stable identity, see [`event_uid`].
    pub uid: String,
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: EventStatus,
    pub reminders: Vec<Reminder>,
    /// Last time a sync changed this event (LAST-MODIFIED). Reconciliation
    /// metadata, not content: two events with different markers but equal
    /// content are the same event.
    pub updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    Confirmed,
    Tentative,
    Cancelled,
}

/// A display reminder (VALARM) firing this many minutes before tip-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub minutes: i64,
}

/// Build the stable identity for a game's calendar entry.
///
/// The identity is a pure function of (season, team, opponent, the Eastern
/// calendar date of the originally scheduled slot). A tip-off moved to a
/// different hour keeps its identity, so reschedules reconcile as updates
/// rather than a delete plus an add. NBA teams never play the same opponent
/// twice on one calendar date, so identities are unique within a team's
/// feed.
pub fn event_uid(season: &str, team: &str, opponent: &str, date: NaiveDate) -> String {
    format!(
        "nba-{}-{}-{}-{}@courtcal",
        season,
        team,
        opponent,
        date.format("%Y%m%d")
    )
    .to_lowercase()
}

impl Event {
    /// Derive the calendar event for a game. `reminder_minutes` adds a
    /// display alarm to games that haven't been played yet; 0 disables it.
    pub fn from_game(game: &Game, reminder_minutes: i64) -> Event {
        let summary = match (game.status, game.away_score, game.home_score) {
            (GameStatus::Final, Some(away), Some(home)) => {
                format!("{} {} @ {} {}", game.away_team, away, game.home_team, home)
            }
            _ => format!("{} @ {}", game.away_team, game.home_team),
        };

        let mut description = format!(
            "{} @ {} · Season: {}",
            game.away_name, game.home_name, game.season
        );
        if let (GameStatus::Final, Some(away), Some(home)) =
            (game.status, game.away_score, game.home_score)
        {
            description.push_str(&format!(
                " · Final: {} {} - {} {}",
                game.away_team, away, home, game.home_team
            ));
        }

        let status = match game.status {
            GameStatus::Scheduled => EventStatus::Tentative,
            GameStatus::Final => EventStatus::Confirmed,
            // Postponed games stay on the calendar with a cancelled marker
            // until the league either reschedules or drops them.
            GameStatus::Postponed => EventStatus::Cancelled,
        };

        let reminders = if game.status == GameStatus::Scheduled && reminder_minutes > 0 {
            vec![Reminder { minutes: reminder_minutes }]
        } else {
            Vec::new()
        };

        Event {
            uid: event_uid(&game.season, &game.team, game.opponent(), game.local_date),
            summary,
            description: Some(description),
            location: game.venue.clone(),
            start: game.start,
            end: game.start + Duration::hours(GAME_DURATION_HOURS),
            status,
            reminders,
            updated: None,
        }
    }

    /// Compare rendered content, ignoring the last-modified marker.
    pub fn same_content(&self, other: &Event) -> bool {
        self.uid == other.uid
            && self.summary == other.summary
            && self.description == other.description
            && self.location == other.location
            && self.start == other.start
            && self.end == other.end
            && self.status == other.status
            && self.reminders == other.reminders
    }
}
