//! Calendar file parsing using the icalendar crate's parser.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, Property, read_calendar, unfold},
};
use tracing::warn;

use crate::event::{Event, EventStatus, Reminder};
use crate::schedule::FEED_TZ;

/// Parse calendar file content into its event set.
///
/// This never fails: unknown properties are ignored, a malformed event
/// block is skipped with a warning, and a file that does not parse as a
/// whole is salvaged block by block. A corrupted or hand-edited feed file
/// therefore degrades to "those events are absent" and the next sync
/// regenerates them.
pub fn parse_calendar(content: &str) -> Vec<Event> {
    let unfolded = unfold(content);

    match read_calendar(&unfolded) {
        Ok(calendar) => calendar
            .components
            .iter()
            .filter(|c| c.name == "VEVENT")
            .filter_map(|component| {
                let event = parse_vevent(component);
                if event.is_none() {
                    warn!("skipping malformed calendar event block");
                }
                event
            })
            .collect(),
        Err(err) => {
            warn!(error = %err, "calendar file did not parse cleanly, salvaging event blocks");
            salvage_events(&unfolded)
        }
    }
}

/// Recover what can be recovered from a file the parser rejected outright:
/// split out BEGIN:VEVENT..END:VEVENT blocks and parse each one on its own,
/// dropping the blocks that still fail.
fn salvage_events(unfolded: &str) -> Vec<Event> {
    let mut events = Vec::new();
    let mut block: Option<Vec<&str>> = None;

    for raw_line in unfolded.lines() {
        let line = raw_line.trim_end_matches('\r');
        match line {
            "BEGIN:VEVENT" => block = Some(vec![line]),
            "END:VEVENT" => {
                let Some(mut lines) = block.take() else { continue };
                lines.push(line);
                let wrapped = format!(
                    "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:COURTCAL\r\n{}\r\nEND:VCALENDAR\r\n",
                    lines.join("\r\n")
                );
                let event = read_calendar(&wrapped)
                    .ok()
                    .and_then(|cal| cal.components.iter().find(|c| c.name == "VEVENT").and_then(parse_vevent));
                match event {
                    Some(event) => events.push(event),
                    None => warn!("dropping unreadable calendar event block"),
                }
            }
            _ => {
                if let Some(ref mut lines) = block {
                    lines.push(line);
                }
            }
        }
    }

    events
}

fn parse_vevent(vevent: &Component<'_>) -> Option<Event> {
    let uid = vevent.find_prop("UID")?.val.to_string();
    let summary = vevent
        .find_prop("SUMMARY")
        .map(|p| unescape_text(p.val.as_ref()))
        .unwrap_or_else(|| "(untitled)".to_string());
    let start = prop_to_utc(vevent.find_prop("DTSTART")?)?;
    let end = prop_to_utc(vevent.find_prop("DTEND")?)?;

    let description = vevent
        .find_prop("DESCRIPTION")
        .map(|p| unescape_text(p.val.as_ref()));
    let location = vevent
        .find_prop("LOCATION")
        .map(|p| unescape_text(p.val.as_ref()));

    let status = vevent
        .find_prop("STATUS")
        .map(|p| match p.val.as_ref() {
            "TENTATIVE" => EventStatus::Tentative,
            "CANCELLED" => EventStatus::Cancelled,
            _ => EventStatus::Confirmed,
        })
        .unwrap_or(EventStatus::Confirmed);

    let updated = vevent
        .find_prop("LAST-MODIFIED")
        .and_then(|p| NaiveDateTime::parse_from_str(p.val.as_ref(), "%Y%m%dT%H%M%SZ").ok())
        .map(|naive| naive.and_utc());

    // Reminders from VALARM components
    let reminders: Vec<Reminder> = vevent
        .components
        .iter()
        .filter(|c| c.name == "VALARM")
        .filter_map(|alarm| {
            let trigger = alarm.find_prop("TRIGGER")?.val.as_ref();
            let minutes = parse_trigger_minutes(trigger)?;
            Some(Reminder { minutes })
        })
        .collect();

    Some(Event {
        uid,
        summary,
        description,
        location,
        start,
        end,
        status,
        reminders,
        updated,
    })
}

/// Convert a DTSTART/DTEND property to UTC. Zoned and floating times are
/// interpreted through their timezone (floating ones through the feed's
/// documented zone); all-day values are unsupported in a game feed and
/// cause the block to be skipped.
fn prop_to_utc(prop: &Property<'_>) -> Option<DateTime<Utc>> {
    match DatePerhapsTime::try_from(prop).ok()? {
        DatePerhapsTime::DateTime(CalendarDateTime::Utc(dt)) => Some(dt),
        DatePerhapsTime::DateTime(CalendarDateTime::Floating(naive)) => FEED_TZ
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
        DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone { date_time, tzid }) => {
            let tz: chrono_tz::Tz = tzid.parse().ok()?;
            tz.from_local_datetime(&date_time)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
        }
        DatePerhapsTime::Date(_) => None,
    }
}

/// Parse a TRIGGER value to minutes before the event (-PT60M, -P1D, ...).
fn parse_trigger_minutes(value: &str) -> Option<i64> {
    let is_before = value.starts_with('-');
    let duration_str = value.trim_start_matches('-');

    let duration = iso8601::duration(duration_str).ok()?;
    let std_duration: std::time::Duration = duration.into();
    let minutes = (std_duration.as_secs() / 60) as i64;

    Some(if is_before { minutes } else { -minutes })
}

/// Undo RFC 5545 text escaping. Unescaped input passes through unchanged.
fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(',') => out.push(','),
            Some(';') => out.push(';'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ics::render_calendar;
    use chrono::TimeZone;

    fn make_event(uid: &str, day: u32, status: EventStatus) -> Event {
        Event {
            uid: uid.to_string(),
            summary: "LAL @ BOS".to_string(),
            description: Some("Los Angeles Lakers @ Boston Celtics · Season: 2024-25".to_string()),
            location: Some("TD Garden, Boston, MA".to_string()),
            start: Utc.with_ymd_and_hms(2024, 11, day, 23, 30, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 11, day + 1, 2, 30, 0).unwrap(),
            status,
            reminders: if status == EventStatus::Tentative {
                vec![Reminder { minutes: 60 }]
            } else {
                Vec::new()
            },
            updated: Some(Utc.with_ymd_and_hms(2024, 10, 15, 8, 0, 0).unwrap()),
        }
    }

    #[test]
    fn round_trip_preserves_the_event_set() {
        let events = vec![
            make_event("nba-2024-25-lal-bos-20241101@courtcal", 1, EventStatus::Tentative),
            make_event("nba-2024-25-lal-mia-20241103@courtcal", 3, EventStatus::Confirmed),
            make_event("nba-2024-25-lal-den-20241105@courtcal", 5, EventStatus::Cancelled),
        ];

        let ics = render_calendar("NBA - Los Angeles Lakers", &events).unwrap();
        let parsed = parse_calendar(&ics);

        // render sorts by start, and the fixtures are already in start order
        assert_eq!(parsed, events);
    }

    #[test]
    fn round_trip_without_optional_fields() {
        let mut event = make_event("bare@courtcal", 1, EventStatus::Confirmed);
        event.description = None;
        event.location = None;
        event.updated = None;

        let ics = render_calendar("cal", std::slice::from_ref(&event)).unwrap();
        let parsed = parse_calendar(&ics);
        assert_eq!(parsed, vec![event]);
    }

    #[test]
    fn unknown_properties_are_ignored() {
        let ics = "BEGIN:VCALENDAR\r\n\
            VERSION:2.0\r\n\
            PRODID:OTHER\r\n\
            BEGIN:VEVENT\r\n\
            UID:x@courtcal\r\n\
            SUMMARY:LAL @ BOS\r\n\
            DTSTART:20241101T233000Z\r\n\
            DTEND:20241102T023000Z\r\n\
            SEQUENCE:4\r\n\
            X-SOMETHING-CUSTOM:value\r\n\
            ORGANIZER:mailto:nobody@example.com\r\n\
            END:VEVENT\r\n\
            END:VCALENDAR\r\n";

        let parsed = parse_calendar(ics);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].summary, "LAL @ BOS");
        assert_eq!(parsed[0].status, EventStatus::Confirmed);
    }

    #[test]
    fn block_with_unparseable_times_is_skipped_not_fatal() {
        let good = make_event("good@courtcal", 1, EventStatus::Tentative);
        let mut ics = render_calendar("cal", std::slice::from_ref(&good)).unwrap();
        ics.push_str(
            "BEGIN:VEVENT\r\n\
             UID:broken@courtcal\r\n\
             SUMMARY:broken\r\n\
             DTSTART:NOTADATE\r\n\
             DTEND:20241102T023000Z\r\n\
             END:VEVENT\r\n",
        );

        let parsed = parse_calendar(&ics);
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].uid, "good@courtcal");
    }

    #[test]
    fn hard_corruption_in_one_block_spares_the_others() {
        let a = make_event("a@courtcal", 1, EventStatus::Tentative);
        let b = make_event("b@courtcal", 3, EventStatus::Confirmed);
        let ics = render_calendar("cal", &[a.clone(), b.clone()]).unwrap();

        // Mangle the first event with a line no ICS parser accepts.
        let corrupted = ics.replacen("UID:a@courtcal", "THIS IS NOT AN ICS LINE", 1);

        let parsed = parse_calendar(&corrupted);
        assert_eq!(parsed, vec![b]);
    }

    #[test]
    fn completely_unreadable_file_yields_an_empty_set() {
        assert!(parse_calendar("not a calendar at all").is_empty());
        assert!(parse_calendar("").is_empty());
    }

    #[test]
    fn event_missing_uid_is_skipped() {
        let ics = "BEGIN:VCALENDAR\r\n\
            VERSION:2.0\r\n\
            PRODID:X\r\n\
            BEGIN:VEVENT\r\n\
            SUMMARY:no uid\r\n\
            DTSTART:20241101T233000Z\r\n\
            DTEND:20241102T023000Z\r\n\
            END:VEVENT\r\n\
            END:VCALENDAR\r\n";
        assert!(parse_calendar(ics).is_empty());
    }

    #[test]
    fn zoned_and_floating_times_are_normalized_to_utc() {
        let ics = "BEGIN:VCALENDAR\r\n\
            VERSION:2.0\r\n\
            PRODID:X\r\n\
            BEGIN:VEVENT\r\n\
            UID:zoned@courtcal\r\n\
            SUMMARY:zoned\r\n\
            DTSTART;TZID=America/New_York:20241101T193000\r\n\
            DTEND;TZID=America/New_York:20241101T223000\r\n\
            END:VEVENT\r\n\
            BEGIN:VEVENT\r\n\
            UID:floating@courtcal\r\n\
            SUMMARY:floating\r\n\
            DTSTART:20241101T193000\r\n\
            DTEND:20241101T223000\r\n\
            END:VEVENT\r\n\
            END:VCALENDAR\r\n";

        let parsed = parse_calendar(ics);
        assert_eq!(parsed.len(), 2);
        for event in parsed {
            assert_eq!(event.start, Utc.with_ymd_and_hms(2024, 11, 1, 23, 30, 0).unwrap());
        }
    }

    #[test]
    fn trigger_minutes_parse() {
        assert_eq!(parse_trigger_minutes("-PT60M"), Some(60));
        assert_eq!(parse_trigger_minutes("-PT1H"), Some(60));
        assert_eq!(parse_trigger_minutes("-P1D"), Some(1440));
        assert_eq!(parse_trigger_minutes("PT15M"), Some(-15));
        assert_eq!(parse_trigger_minutes("garbage"), None);
    }

    #[test]
    fn unescape_handles_escaped_and_plain_text() {
        assert_eq!(unescape_text(r"TD Garden\, Boston\, MA"), "TD Garden, Boston, MA");
        assert_eq!(unescape_text(r"line1\nline2"), "line1\nline2");
        assert_eq!(unescape_text("plain text"), "plain text");
        assert_eq!(unescape_text(r"back\\slash"), r"back\slash");
    }
}
