//! Schedule normalization: raw upstream payload → canonical game records.
//!
//! The upstream feed groups games into month buckets and reports times as
//! US/Eastern wall-clock. Everything downstream of this module works with
//! the canonical `Game` type only, so upstream format churn stays contained
//! here. Timestamps are normalized to UTC; the Eastern calendar date is kept
//! separately because event identity is defined over it (see `event`).

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::team::{self, Team};

/// Timezone the upstream feed reports wall-clock times in.
pub const FEED_TZ: Tz = chrono_tz::America::New_York;

/// Tip-off hour assumed when the feed has a date but no time yet.
const DEFAULT_TIPOFF: (u32, u32) = (19, 30);

// ---------------------------------------------------------------------------
// Raw payload model
//
// Every leaf field is optional: one malformed entry must never fail
// deserialization of the whole payload.

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleResponse {
    #[serde(default)]
    pub lscd: Vec<MonthBucket>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthBucket {
    #[serde(default)]
    pub mscd: MonthSchedule,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonthSchedule {
    #[serde(default)]
    pub mon: Option<String>,
    #[serde(default)]
    pub g: Vec<RawGame>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGame {
    /// Upstream game id, only used for log context.
    #[serde(default)]
    pub gid: Option<String>,
    /// Game date, `2024-11-01`.
    #[serde(default)]
    pub gdte: Option<String>,
    /// Eastern tip-off, `2024-11-01T19:30:00`.
    #[serde(default)]
    pub etm: Option<String>,
    /// Status text; `PPD` marks a postponed game.
    #[serde(default)]
    pub stt: Option<String>,
    /// Numeric status: 1 scheduled, 2 in progress, 3 final.
    #[serde(default)]
    pub st: Option<i64>,
    /// Arena name.
    #[serde(default)]
    pub an: Option<String>,
    /// Arena city.
    #[serde(default)]
    pub ac: Option<String>,
    /// Arena state.
    #[serde(default, rename = "as")]
    pub arena_state: Option<String>,
    /// Visiting team.
    #[serde(default)]
    pub v: Option<RawSide>,
    /// Home team.
    #[serde(default)]
    pub h: Option<RawSide>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSide {
    /// Team code, `LAL`.
    #[serde(default)]
    pub ta: Option<String>,
    /// Team name, `Lakers`.
    #[serde(default)]
    pub tn: Option<String>,
    /// Team city, `Los Angeles`.
    #[serde(default)]
    pub tc: Option<String>,
    /// Score, empty until the game starts.
    #[serde(default)]
    pub s: Option<String>,
}

impl ScheduleResponse {
    /// All raw entries in fetch order (month buckets are already ordered).
    pub fn games(&self) -> impl Iterator<Item = &RawGame> {
        self.lscd.iter().flat_map(|bucket| bucket.mscd.g.iter())
    }
}

// ---------------------------------------------------------------------------
// Canonical model

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Scheduled,
    Final,
    Postponed,
}

/// One game from the perspective of a tracked team.
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub season: String,
    /// The tracked team this record belongs to.
    pub team: String,
    pub home: bool,
    pub home_team: String,
    pub away_team: String,
    pub home_name: String,
    pub away_name: String,
    /// Tip-off, normalized to UTC.
    pub start: DateTime<Utc>,
    /// Eastern calendar date of the tip-off. Event identity is built on
    /// this, not on the UTC date: an evening reschedule can cross the UTC
    /// date boundary without being a different game.
    pub local_date: NaiveDate,
    pub venue: Option<String>,
    pub status: GameStatus,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
}

impl Game {
    pub fn opponent(&self) -> &str {
        if self.home { &self.away_team } else { &self.home_team }
    }
}

/// Normalize the raw payload into the ordered game list for one team.
///
/// Entries missing a start time or either team code are dropped with a
/// warning. When the feed reports the same (date, opponent) pairing more
/// than once, the later entry in fetch order wins; upstream occasionally
/// emits both during live-update windows and the later record carries the
/// fresher status.
pub fn normalize(payload: &ScheduleResponse, season: &str, team: &Team) -> Vec<Game> {
    let mut by_slot: HashMap<(NaiveDate, String), Game> = HashMap::new();

    for raw in payload.games() {
        let Some(game) = game_for_team(raw, season, team.code) else {
            continue;
        };
        let key = (game.local_date, game.opponent().to_string());
        if let Some(previous) = by_slot.insert(key, game) {
            debug!(
                team = team.code,
                date = %previous.local_date,
                opponent = previous.opponent(),
                "duplicate schedule entry, keeping the later one"
            );
        }
    }

    let mut games: Vec<Game> = by_slot.into_values().collect();
    games.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.away_team.cmp(&b.away_team)));
    games
}

/// Parse one raw entry from `team`'s perspective. Returns `None` both for
/// games that don't involve the team (silently) and for malformed entries
/// (with a warning).
fn game_for_team(raw: &RawGame, season: &str, team_code: &str) -> Option<Game> {
    let (visitor, home) = match (&raw.v, &raw.h) {
        (Some(v), Some(h)) => (v, h),
        _ => {
            warn!(gid = ?raw.gid, "schedule entry missing a team block, dropping");
            return None;
        }
    };

    let (away_team, home_team) = match (nonempty(&visitor.ta), nonempty(&home.ta)) {
        (Some(a), Some(h)) => (a.to_uppercase(), h.to_uppercase()),
        _ => {
            warn!(gid = ?raw.gid, "schedule entry missing a team code, dropping");
            return None;
        }
    };

    if away_team != team_code && home_team != team_code {
        return None;
    }

    let Some(tipoff) = parse_tipoff(raw) else {
        warn!(gid = ?raw.gid, "schedule entry has no usable start time, dropping");
        return None;
    };

    let status = match (raw.stt.as_deref(), raw.st) {
        (Some(stt), _) if stt.eq_ignore_ascii_case("PPD") => GameStatus::Postponed,
        (_, Some(3)) => GameStatus::Final,
        _ => GameStatus::Scheduled,
    };

    Some(Game {
        season: season.to_string(),
        team: team_code.to_string(),
        home: home_team == team_code,
        home_name: side_name(home, &home_team),
        away_name: side_name(visitor, &away_team),
        home_team,
        away_team,
        start: tipoff.with_timezone(&Utc),
        local_date: tipoff.date_naive(),
        venue: venue(raw),
        status,
        home_score: parse_score(&home.s),
        away_score: parse_score(&visitor.s),
    })
}

/// Eastern tip-off time: `etm` when present and parseable, otherwise the
/// game date at the default tip-off hour.
fn parse_tipoff(raw: &RawGame) -> Option<DateTime<Tz>> {
    let naive = nonempty(&raw.etm)
        .and_then(|etm| NaiveDateTime::parse_from_str(etm, "%Y-%m-%dT%H:%M:%S").ok())
        .or_else(|| {
            let date = NaiveDate::parse_from_str(nonempty(&raw.gdte)?, "%Y-%m-%d").ok()?;
            date.and_hms_opt(DEFAULT_TIPOFF.0, DEFAULT_TIPOFF.1, 0)
        })?;

    FEED_TZ.from_local_datetime(&naive).earliest()
}

fn venue(raw: &RawGame) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    if let Some(arena) = nonempty(&raw.an) {
        parts.push(arena);
    }
    if let Some(city) = nonempty(&raw.ac) {
        parts.push(city);
        if let Some(state) = nonempty(&raw.arena_state) {
            parts.push(state);
        }
    }
    if parts.is_empty() { None } else { Some(parts.join(", ")) }
}

/// Full team name from the feed's city + nickname, falling back to the
/// registry and finally the bare code.
fn side_name(side: &RawSide, code: &str) -> String {
    match (nonempty(&side.tc), nonempty(&side.tn)) {
        (Some(city), Some(nick)) => format!("{} {}", city, nick),
        _ => team::team_by_code(code)
            .map(|t| t.name.to_string())
            .unwrap_or_else(|| code.to_string()),
    }
}

fn parse_score(score: &Option<String>) -> Option<u32> {
    nonempty(score)?.parse().ok()
}

fn nonempty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
