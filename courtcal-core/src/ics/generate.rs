//! Calendar file generation.

use std::collections::HashSet;

use icalendar::{Alarm, Calendar, Component, EventLike, Trigger};

use crate::error::{CourtCalError, CourtCalResult};
use crate::event::{Event, EventStatus};

const UTC_FMT: &str = "%Y%m%dT%H%M%SZ";
const PRODID: &str = "-//courtcal//courtcal//EN";

/// Timezone hint for calendar applications. Times themselves are UTC.
const CALENDAR_TZ: &str = "America/New_York";

/// Render a full calendar feed for one team.
///
/// Output is deterministic: events are ordered by start time then identity,
/// and DTSTAMP is derived from the event rather than the wall clock, so the
/// same event set always produces byte-identical output. Duplicate
/// identities are a bug upstream of this function and are rejected.
pub fn render_calendar(name: &str, events: &[Event]) -> CourtCalResult<String> {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.uid.cmp(&b.uid)));

    let mut seen = HashSet::with_capacity(sorted.len());
    for event in &sorted {
        if !seen.insert(event.uid.as_str()) {
            return Err(CourtCalError::IcsGenerate(format!(
                "duplicate event identity '{}'",
                event.uid
            )));
        }
    }

    let mut calendar = Calendar::new();
    for event in sorted {
        calendar.push(build_vevent(event));
    }
    let calendar = calendar.done();

    Ok(finalize_calendar(name, &calendar.to_string()))
}

fn build_vevent(event: &Event) -> icalendar::Event {
    let mut vevent = icalendar::Event::new();
    vevent.uid(&event.uid);
    vevent.summary(&event.summary);

    // DTSTAMP is required by RFC 5545. Derived from the event, never from
    // the wall clock, so unchanged reruns produce no spurious diff.
    let dtstamp = event.updated.unwrap_or(event.start);
    vevent.add_property("DTSTAMP", dtstamp.format(UTC_FMT).to_string());

    if let Some(updated) = event.updated {
        vevent.add_property("LAST-MODIFIED", updated.format(UTC_FMT).to_string());
    }

    vevent.add_property("DTSTART", event.start.format(UTC_FMT).to_string());
    vevent.add_property("DTEND", event.end.format(UTC_FMT).to_string());

    if let Some(ref description) = event.description {
        vevent.description(description);
    }

    if let Some(ref location) = event.location {
        vevent.location(location);
    }

    // STATUS - only emit if not CONFIRMED (the implied default)
    match event.status {
        EventStatus::Confirmed => {}
        EventStatus::Tentative => {
            vevent.add_property("STATUS", "TENTATIVE");
        }
        EventStatus::Cancelled => {
            vevent.add_property("STATUS", "CANCELLED");
        }
    }

    for reminder in &event.reminders {
        let trigger = Trigger::before_start(chrono::Duration::minutes(reminder.minutes));
        vevent.alarm(Alarm::display("Reminder", trigger));
    }

    vevent.done()
}

/// Post-process the icalendar crate's output into the published form:
/// - our PRODID plus the feed headers (METHOD, X-WR-CALNAME, X-WR-TIMEZONE)
/// - no CALSCALE:GREGORIAN (it's the default)
/// - no DTSTAMP/UID inside VALARM sections (the crate inserts them, they
///   are not required by RFC 5545 and the generated UID is random)
fn finalize_calendar(name: &str, ics: &str) -> String {
    let mut result = String::with_capacity(ics.len() + 128);
    let mut in_valarm = false;

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:");
            result.push_str(PRODID);
            result.push_str("\r\n");
            continue;
        }

        if line.starts_with("VERSION:") {
            result.push_str(line);
            result.push_str("\r\n");
            result.push_str("METHOD:PUBLISH\r\n");
            result.push_str(&format!("X-WR-CALNAME:{}\r\n", name));
            result.push_str(&format!("X-WR-TIMEZONE:{}\r\n", CALENDAR_TZ));
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        if line == "BEGIN:VALARM" {
            in_valarm = true;
        } else if line == "END:VALARM" {
            in_valarm = false;
        }

        if in_valarm && (line.starts_with("DTSTAMP:") || line.starts_with("UID:")) {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Reminder;
    use chrono::{TimeZone, Utc};

    fn make_event(uid: &str, day: u32) -> Event {
        Event {
            uid: uid.to_string(),
            summary: "LAL @ BOS".to_string(),
            description: Some("Los Angeles Lakers @ Boston Celtics · Season: 2024-25".to_string()),
            location: Some("TD Garden, Boston, MA".to_string()),
            start: Utc.with_ymd_and_hms(2024, 11, day, 23, 30, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 11, day + 1, 2, 30, 0).unwrap(),
            status: EventStatus::Tentative,
            reminders: vec![Reminder { minutes: 60 }],
            updated: None,
        }
    }

    #[test]
    fn output_is_deterministic_and_order_independent() {
        let a = make_event("nba-2024-25-lal-bos-20241101@courtcal", 1);
        let b = make_event("nba-2024-25-lal-mia-20241103@courtcal", 3);

        let forward = render_calendar("NBA - Los Angeles Lakers", &[a.clone(), b.clone()]).unwrap();
        let reversed = render_calendar("NBA - Los Angeles Lakers", &[b, a]).unwrap();
        assert_eq!(forward, reversed);

        // Events appear sorted by start time.
        let first = forward.find("20241101").unwrap();
        let second = forward.find("20241103").unwrap();
        assert!(first < second);
    }

    #[test]
    fn feed_headers_are_present() {
        let ics = render_calendar("NBA - Boston Celtics", &[make_event("x@courtcal", 1)]).unwrap();
        assert!(ics.contains("PRODID:-//courtcal//courtcal//EN"));
        assert!(ics.contains("METHOD:PUBLISH"));
        assert!(ics.contains("X-WR-CALNAME:NBA - Boston Celtics"));
        assert!(ics.contains("X-WR-TIMEZONE:America/New_York"));
        assert!(!ics.contains("CALSCALE:GREGORIAN"));
    }

    #[test]
    fn status_is_only_emitted_when_not_confirmed() {
        let mut event = make_event("x@courtcal", 1);
        let ics = render_calendar("cal", std::slice::from_ref(&event)).unwrap();
        assert!(ics.contains("STATUS:TENTATIVE"));

        event.status = EventStatus::Confirmed;
        let ics = render_calendar("cal", &[event]).unwrap();
        assert!(!ics.contains("STATUS:"));
    }

    #[test]
    fn alarm_has_no_generated_uid_or_dtstamp() {
        let ics = render_calendar("cal", &[make_event("x@courtcal", 1)]).unwrap();
        let valarm: String = ics
            .split("BEGIN:VALARM")
            .nth(1)
            .unwrap()
            .split("END:VALARM")
            .next()
            .unwrap()
            .to_string();
        assert!(valarm.contains("TRIGGER"));
        assert!(!valarm.contains("UID:"));
        assert!(!valarm.contains("DTSTAMP:"));
    }

    #[test]
    fn dtstamp_prefers_the_modified_marker() {
        let mut event = make_event("x@courtcal", 1);
        event.updated = Some(Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap());
        let ics = render_calendar("cal", &[event]).unwrap();
        assert!(ics.contains("DTSTAMP:20250102T030405Z"));
        assert!(ics.contains("LAST-MODIFIED:20250102T030405Z"));
    }

    #[test]
    fn duplicate_identities_are_rejected() {
        let a = make_event("same@courtcal", 1);
        let b = make_event("same@courtcal", 3);
        assert!(matches!(
            render_calendar("cal", &[a, b]),
            Err(CourtCalError::IcsGenerate(_))
        ));
    }

    #[test]
    fn empty_calendar_still_renders_headers() {
        let ics = render_calendar("NBA - Utah Jazz", &[]).unwrap();
        assert!(ics.starts_with("BEGIN:VCALENDAR"));
        assert!(ics.contains("X-WR-CALNAME:NBA - Utah Jazz"));
        assert!(!ics.contains("BEGIN:VEVENT"));
    }
}
