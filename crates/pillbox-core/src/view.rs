//! Today and History view models.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::medication::{Frequency, Medication};
use crate::status::{due_status, format_last_taken, format_schedule, DisplayFormats, DueStatus};

pub const EMPTY_TODAY: &str = "No medications added yet.";
pub const EMPTY_HISTORY: &str = "No medication history yet.";

/// Which list the user is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Today,
    History,
}

/// One card in the Today list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayItem {
    pub id: u64,
    pub name: String,
    pub dose: String,
    pub frequency: Frequency,
    pub schedule: String,
    pub status: DueStatus,
    pub last_taken: String,
}

/// One row in the History list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: u64,
    pub name: String,
    pub dose: String,
    pub taken_at: DateTime<Utc>,
    pub last_taken: String,
}

/// Every medication in insertion order with its status as of `now`.
pub fn today_view<Tz>(
    medications: &[Medication],
    now: &DateTime<Tz>,
    formats: &DisplayFormats,
) -> Vec<TodayItem>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let tz = now.timezone();
    medications
        .iter()
        .map(|med| TodayItem {
            id: med.id,
            name: med.name.clone(),
            dose: med.dose.clone(),
            frequency: med.frequency,
            schedule: format_schedule(&med.time),
            status: due_status(med, now),
            last_taken: format_last_taken(med.last_taken, &tz, formats),
        })
        .collect()
}

/// Medications that have been taken at least once, most recent first.
pub fn history_view<Tz>(
    medications: &[Medication],
    tz: &Tz,
    formats: &DisplayFormats,
) -> Vec<HistoryEntry>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut entries: Vec<HistoryEntry> = medications
        .iter()
        .filter_map(|med| {
            med.last_taken.map(|taken_at| HistoryEntry {
                id: med.id,
                name: med.name.clone(),
                dose: med.dose.clone(),
                taken_at,
                last_taken: format_last_taken(Some(taken_at), tz, formats),
            })
        })
        .collect();
    // stable: equal timestamps keep insertion order
    entries.sort_by(|a, b| b.taken_at.cmp(&a.taken_at));
    entries
}
