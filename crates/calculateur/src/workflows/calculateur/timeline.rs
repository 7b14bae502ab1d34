use super::calendar::days_between;
use super::domain::TimelineEvent;
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;

/// Deadlines this close (in days) are flagged urgent on the timeline.
pub const URGENT_HORIZON_DAYS: i64 = 7;

/// Date resolved by the engine, before annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub key: &'static str,
    pub label: String,
    pub date: NaiveDate,
    pub is_deadline: bool,
}

impl TimelineEntry {
    pub fn milestone(key: &'static str, label: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            key,
            label: label.into(),
            date,
            is_deadline: false,
        }
    }

    pub fn deadline(key: &'static str, label: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            key,
            label: label.into(),
            date,
            is_deadline: true,
        }
    }
}

/// Orders entries by date (stable, so same-day entries keep insertion order)
/// and annotates them against `now`. Always recomputed: the flags depend on `now`.
pub fn build(now: NaiveDate, mut entries: Vec<TimelineEntry>) -> Vec<TimelineEvent> {
    entries.sort_by_key(|entry| entry.date);

    entries
        .into_iter()
        .map(|entry| {
            let is_past = entry.date < now;
            let is_urgent = entry.is_deadline
                && !is_past
                && days_between(now, entry.date) <= URGENT_HORIZON_DAYS;

            TimelineEvent {
                key: entry.key,
                label: entry.label,
                date: entry.date,
                is_deadline: entry.is_deadline,
                is_urgent,
                is_past,
            }
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct TimelineCsvRow<'a> {
    date: NaiveDate,
    key: &'a str,
    label: &'a str,
    deadline: bool,
    urgent: bool,
    past: bool,
}

/// Writes the timeline as CSV with a header row, for calendar imports.
pub fn write_csv<W: Write>(events: &[TimelineEvent], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for event in events {
        csv_writer.serialize(TimelineCsvRow {
            date: event.date,
            key: event.key,
            label: &event.label,
            deadline: event.is_deadline,
            urgent: event.is_urgent,
            past: event.is_past,
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}
