//! The per-team update plan: what a sync will add, update, and remove.

use std::collections::HashMap;

use chrono::{DateTime, SubsecRound, Utc};
use tracing::warn;

use crate::diff::EventDiff;
use crate::event::Event;

/// Reconciliation result for one team's calendar. Every identity from the
/// old or new event set lands in exactly one of the three change buckets or
/// in `unchanged`.
#[derive(Debug)]
pub struct SyncPlan {
    pub team: String,
    pub to_add: Vec<EventDiff>,
    pub to_update: Vec<EventDiff>,
    pub to_remove: Vec<EventDiff>,
    unchanged: Vec<Event>,
}

impl SyncPlan {
    /// Diff the fresh schedule-derived events against the event set parsed
    /// from the existing calendar file (empty on first run).
    ///
    /// Unchanged identities keep the *old* event object so their
    /// last-modified markers survive and a no-change sync renders
    /// byte-identically. If two fresh events collapse to one identity the
    /// later one in fetch order wins; the normalizer already merges
    /// duplicate slots, so this is a safety net, not a code path the feed
    /// normally takes.
    pub fn build(team: &str, new_events: Vec<Event>, old_events: Vec<Event>) -> SyncPlan {
        let mut old_by_uid: HashMap<String, Event> = old_events
            .into_iter()
            .map(|e| (e.uid.clone(), e))
            .collect();

        let mut fresh: Vec<Event> = Vec::with_capacity(new_events.len());
        let mut fresh_index: HashMap<String, usize> = HashMap::new();
        for event in new_events {
            match fresh_index.get(&event.uid).copied() {
                Some(i) => {
                    warn!(team, uid = %event.uid, "conflicting records for one game, keeping the later one");
                    fresh[i] = event;
                }
                None => {
                    fresh_index.insert(event.uid.clone(), fresh.len());
                    fresh.push(event);
                }
            }
        }

        let mut to_add = Vec::new();
        let mut to_update = Vec::new();
        let mut unchanged = Vec::new();

        for event in fresh {
            match old_by_uid.remove(&event.uid) {
                None => {
                    if let Some(diff) = EventDiff::get_diff(None, Some(event)) {
                        to_add.push(diff);
                    }
                }
                Some(old) => match EventDiff::get_diff(Some(old.clone()), Some(event)) {
                    None => unchanged.push(old),
                    Some(diff) => to_update.push(diff),
                },
            }
        }

        // Identities still in the old set are gone from the schedule.
        let mut to_remove: Vec<EventDiff> = old_by_uid
            .into_values()
            .filter_map(|old| EventDiff::get_diff(Some(old), None))
            .collect();

        let sort_by_start = |a: &EventDiff, b: &EventDiff| {
            let (a, b) = (a.event(), b.event());
            a.start.cmp(&b.start).then_with(|| a.uid.cmp(&b.uid))
        };
        to_add.sort_by(sort_by_start);
        to_update.sort_by(sort_by_start);
        to_remove.sort_by(sort_by_start);
        unchanged.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.uid.cmp(&b.uid)));

        SyncPlan {
            team: team.to_string(),
            to_add,
            to_update,
            to_remove,
            unchanged,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_update.is_empty() && self.to_remove.is_empty()
    }

    pub fn counts(&self) -> (usize, usize, usize) {
        (self.to_add.len(), self.to_update.len(), self.to_remove.len())
    }

    /// The event set the calendar file should contain after this sync.
    /// Added and updated events are stamped with `now`; removed events are
    /// simply absent.
    pub fn apply(&self, now: DateTime<Utc>) -> Vec<Event> {
        // Whole seconds only: the marker has to survive an ICS round-trip.
        let now = now.trunc_subsecs(0);

        let mut events = self.unchanged.clone();
        for diff in self.to_add.iter().chain(self.to_update.iter()) {
            let mut event = diff
                .new
                .clone()
                .expect("create/update diffs carry a new event");
            event.updated = Some(now);
            events.push(event);
        }
        events
    }

    pub fn changes(&self) -> impl Iterator<Item = &EventDiff> {
        self.to_add
            .iter()
            .chain(self.to_update.iter())
            .chain(self.to_remove.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventStatus;
    use chrono::TimeZone;

    fn event(uid: &str, day: u32, hour: u32) -> Event {
        let start = Utc.with_ymd_and_hms(2024, 11, day, hour, 30, 0).unwrap();
        Event {
            uid: uid.to_string(),
            summary: "LAL @ BOS".to_string(),
            description: None,
            location: None,
            start,
            end: start + chrono::Duration::hours(3),
            status: EventStatus::Tentative,
            reminders: Vec::new(),
            updated: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn first_run_is_all_adds() {
        let new = vec![event("a", 1, 23), event("b", 3, 23), event("c", 5, 23)];
        let plan = SyncPlan::build("LAL", new, Vec::new());
        assert_eq!(plan.counts(), (3, 0, 0));

        let applied = plan.apply(now());
        assert_eq!(applied.len(), 3);
        assert!(applied.iter().all(|e| e.updated == Some(now())));
    }

    #[test]
    fn time_change_is_an_update_never_add_plus_remove() {
        let old = event("nba-2024-25-lal-bos-20241101@courtcal", 1, 23);
        let mut new = old.clone();
        new.start = Utc.with_ymd_and_hms(2024, 11, 2, 0, 0, 0).unwrap();
        new.end = Utc.with_ymd_and_hms(2024, 11, 2, 3, 0, 0).unwrap();

        let plan = SyncPlan::build("LAL", vec![new], vec![old]);
        assert_eq!(plan.counts(), (0, 1, 0));
    }

    #[test]
    fn vanished_game_is_removed() {
        let old = vec![event("a", 1, 23), event("b", 3, 23)];
        let new = vec![event("a", 1, 23)];
        let plan = SyncPlan::build("LAL", new, old);
        assert_eq!(plan.counts(), (0, 0, 1));
        assert_eq!(plan.to_remove[0].event().uid, "b");

        let applied = plan.apply(now());
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].uid, "a");
    }

    #[test]
    fn identical_content_is_unchanged_and_keeps_the_old_marker() {
        let mut old = event("a", 1, 23);
        old.updated = Some(Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap());
        let new = event("a", 1, 23); // updated: None, same content

        let plan = SyncPlan::build("LAL", vec![new], vec![old.clone()]);
        assert!(plan.is_empty());

        let applied = plan.apply(now());
        assert_eq!(applied, vec![old]);
    }

    #[test]
    fn every_identity_lands_in_exactly_one_bucket() {
        let old_kept = event("kept", 1, 23);
        let old_changed = event("changed", 3, 23);
        let old_gone = event("gone", 5, 23);

        let mut new_changed = old_changed.clone();
        new_changed.summary = "LAL @ MIA".to_string();
        let new_added = event("added", 7, 23);

        let plan = SyncPlan::build(
            "LAL",
            vec![old_kept.clone(), new_changed, new_added],
            vec![old_kept, old_changed, old_gone],
        );
        assert_eq!(plan.counts(), (1, 1, 1));

        let applied = plan.apply(now());
        let mut uids: Vec<_> = applied.iter().map(|e| e.uid.as_str()).collect();
        uids.sort();
        assert_eq!(uids, vec!["added", "changed", "kept"]);
    }

    #[test]
    fn conflicting_fresh_records_keep_the_later_one() {
        let first = event("a", 1, 23);
        let mut second = first.clone();
        second.status = EventStatus::Cancelled;

        let plan = SyncPlan::build("LAL", vec![first, second], Vec::new());
        assert_eq!(plan.counts(), (1, 0, 0));
        assert_eq!(plan.to_add[0].event().status, EventStatus::Cancelled);
    }

    #[test]
    fn plan_buckets_are_sorted_by_start_time() {
        let plan = SyncPlan::build(
            "LAL",
            vec![event("late", 9, 23), event("early", 1, 23)],
            Vec::new(),
        );
        assert_eq!(plan.to_add[0].event().uid, "early");
        assert_eq!(plan.to_add[1].event().uid, "late");
    }

    #[test]
    fn marker_only_difference_is_not_an_update() {
        let mut old = event("a", 1, 23);
        old.updated = Some(Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap());
        let mut new = event("a", 1, 23);
        new.updated = Some(Utc.with_ymd_and_hms(2024, 10, 2, 0, 0, 0).unwrap());

        let plan = SyncPlan::build("LAL", vec![new], vec![old]);
        assert!(plan.is_empty());
    }
}
