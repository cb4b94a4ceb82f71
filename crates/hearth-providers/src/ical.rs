//! iCalendar subset decoder.
//!
//! Converts raw iCalendar text into normalized [`CalendarEvent`]s. Only the
//! subset of the format that calendar exports actually exercise is handled:
//! `BEGIN:VEVENT`/`END:VEVENT` blocks, `UID`, `SUMMARY`, `DTSTART`, `DTEND`
//! and line folding. Recurrence rules, alarms and per-calendar timezone
//! properties are not honored; a non-`Z` date-time is taken as local time
//! in the system's default zone, which matches what the feeds publish.
//!
//! Malformed input is never an error: events missing a required property
//! are silently dropped, and an `END:VEVENT` without an open event is
//! ignored.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use hearth_core::{CalendarEvent, CalendarSource};

/// Decodes one source's iCalendar text into events tagged with that
/// source's id and color.
pub fn decode_ical(text: &str, source: &CalendarSource) -> Vec<CalendarEvent> {
    let mut events = Vec::new();
    let mut current: Option<PartialEvent> = None;

    for line in unfold_lines(text) {
        if line == "BEGIN:VEVENT" {
            current = Some(PartialEvent::default());
        } else if line == "END:VEVENT" {
            // END with no open event is malformed nesting; skip it.
            if let Some(partial) = current.take()
                && let Some(event) = partial.finish(source)
            {
                events.push(event);
            }
        } else if let Some(ref mut partial) = current {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };

            if key == "UID" {
                partial.id = Some(value.to_string());
            } else if key == "SUMMARY" {
                partial.title = Some(unescape_text(value));
            } else if key.starts_with("DTSTART") {
                partial.start = parse_timestamp(value);
                partial.all_day = !key.contains("VALUE=DATE-TIME") && value.len() == 8;
            } else if key.starts_with("DTEND") {
                partial.end = parse_timestamp(value);
            }
            // Unrecognized property keys are ignored.
        }
    }

    events
}

/// Event accumulator between `BEGIN:VEVENT` and `END:VEVENT`.
///
/// Duplicate property lines overwrite the prior value (last write wins).
#[derive(Debug, Default)]
struct PartialEvent {
    id: Option<String>,
    title: Option<String>,
    start: Option<DateTime<Local>>,
    end: Option<DateTime<Local>>,
    all_day: bool,
}

impl PartialEvent {
    /// Applies the default-end rule and emits the event if complete.
    fn finish(self, source: &CalendarSource) -> Option<CalendarEvent> {
        // All-day events without DTEND are single-day: end defaults to start.
        let end = match (self.end, self.all_day) {
            (Some(end), _) => end,
            (None, true) => self.start?,
            (None, false) => return None,
        };

        Some(CalendarEvent {
            id: self.id?,
            title: self.title?,
            start: self.start?,
            end,
            all_day: self.all_day,
            color: source.color.clone(),
            source_id: source.id.clone(),
        })
    }
}

/// Splits input into logical lines, applying the folding rule: a physical
/// line beginning with a space or tab continues the previous logical line,
/// with the single fold marker character stripped.
fn unfold_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for raw in text.split('\n') {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if (line.starts_with(' ') || line.starts_with('\t')) && !lines.is_empty() {
            if let Some(last) = lines.last_mut() {
                last.push_str(&line[1..]);
            }
        } else {
            lines.push(line.to_string());
        }
    }

    lines
}

/// Reverses iCalendar text escaping in property values.
fn unescape_text(text: &str) -> String {
    text.replace("\\n", "\n")
        .replace("\\,", ",")
        .replace("\\;", ";")
        .replace("\\\\", "\\")
}

/// Parses an iCalendar timestamp value.
///
/// An 8-character value is a calendar date at local midnight. A longer
/// value is `YYYYMMDDTHHMMSS[Z]`; a trailing `Z` marks UTC, otherwise the
/// time is taken in the local zone. Returns `None` for anything that does
/// not fit, which drops the enclosing event.
fn parse_timestamp(value: &str) -> Option<DateTime<Local>> {
    let date = parse_date(value.get(0..8)?)?;

    if value.len() == 8 {
        return date.and_hms_opt(0, 0, 0)?.and_local_timezone(Local).earliest();
    }

    if value.get(8..9)? != "T" {
        return None;
    }

    let hour: u32 = value.get(9..11)?.parse().ok()?;
    let minute: u32 = value.get(11..13)?.parse().ok()?;
    let second: u32 = value
        .get(13..15)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);

    let naive = date.and_hms_opt(hour, minute, second)?;

    if value.ends_with('Z') {
        Some(Utc.from_utc_datetime(&naive).with_timezone(&Local))
    } else {
        naive.and_local_timezone(Local).earliest()
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let year: i32 = s.get(0..4)?.parse().ok()?;
    let month: u32 = s.get(4..6)?.parse().ok()?;
    let day: u32 = s.get(6..8)?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
