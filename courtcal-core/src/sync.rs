//! The sync pipeline: normalize → reconcile → render → atomic replace.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::diff::{EventDiff, SyncPlan};
use crate::error::{CourtCalError, CourtCalResult};
use crate::event::Event;
use crate::ics;
use crate::schedule::{self, ScheduleResponse};
use crate::team::Team;
use crate::tracking::TrackedSelection;

/// Per-invocation knobs, passed explicitly so the core holds no global
/// state.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub out_dir: PathBuf,
    pub reminder_minutes: i64,
    /// Wall-clock time of this sync, used to stamp changed events.
    pub now: DateTime<Utc>,
}

/// Outcome of one team's sync. `error` is set when the team failed; the
/// counters are zero in that case and the previous calendar file, if any,
/// is untouched.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub team: String,
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    /// The individual changes, for display.
    pub changes: Vec<EventDiff>,
    pub error: Option<String>,
}

impl SyncReport {
    pub fn failed(team: &str, error: &CourtCalError) -> SyncReport {
        SyncReport {
            team: team.to_string(),
            added: 0,
            updated: 0,
            removed: 0,
            changes: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn is_noop(&self) -> bool {
        self.is_ok() && self.added == 0 && self.updated == 0 && self.removed == 0
    }
}

/// Calendar file path for a team: `<out_dir>/nba_<code>.ics`.
pub fn calendar_path(out_dir: &Path, team_code: &str) -> PathBuf {
    out_dir.join(format!("nba_{}.ics", team_code.to_lowercase()))
}

/// Run one full sync over the tracked selection.
///
/// An invalid selection is fatal for the whole invocation (the config is
/// wrong, nothing sensible can be produced). Everything after that is
/// isolated per team: one team's failure is recorded in its report and the
/// remaining teams still sync.
pub fn sync(
    selection: &TrackedSelection,
    season: &str,
    payload: &ScheduleResponse,
    opts: &SyncOptions,
) -> CourtCalResult<Vec<SyncReport>> {
    let teams = selection.resolve()?;

    let reports = teams
        .into_iter()
        .map(|team| {
            sync_team(team, season, payload, opts)
                .unwrap_or_else(|e| SyncReport::failed(team.code, &e))
        })
        .collect();

    Ok(reports)
}

/// Sync one team's calendar file: read-modify-write with an atomic replace.
pub fn sync_team(
    team: &Team,
    season: &str,
    payload: &ScheduleResponse,
    opts: &SyncOptions,
) -> CourtCalResult<SyncReport> {
    let games = schedule::normalize(payload, season, team);
    let new_events: Vec<Event> = games
        .iter()
        .map(|game| Event::from_game(game, opts.reminder_minutes))
        .collect();

    let path = calendar_path(&opts.out_dir, team.code);
    let old_events = match std::fs::read_to_string(&path) {
        Ok(content) => ics::parse_calendar(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e.into()),
    };

    let plan = SyncPlan::build(team.code, new_events, old_events);
    let (added, updated, removed) = plan.counts();
    debug!(team = team.code, added, updated, removed, "sync plan built");

    let events = plan.apply(opts.now);
    let name = format!("NBA - {}", team.name);
    let content = ics::render_calendar(&name, &events)?;
    write_atomic(&path, content.as_bytes())?;

    Ok(SyncReport {
        team: team.code.to_string(),
        added,
        updated,
        removed,
        changes: plan.changes().cloned().collect(),
        error: None,
    })
}

/// Write to a temporary file in the target directory, then move it into
/// place. A poller reading the published path never observes a partial
/// file, and on failure the previous file is left untouched.
fn write_atomic(path: &Path, bytes: &[u8]) -> CourtCalResult<()> {
    let dir = path.parent().ok_or_else(|| {
        CourtCalError::Sync(format!("invalid calendar path: {}", path.display()))
    })?;
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(path).map_err(|e| CourtCalError::Io(e.error))?;

    Ok(())
}
