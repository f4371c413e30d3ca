//! Due status and display formatting.
//!
//! Everything here is a pure function of a medication and "now". Status is
//! never stored: it is recomputed on every read, which is also how the daily
//! rollover happens. A dose marked taken stays `Taken` for the rest of that
//! calendar day (in the caller's time zone) and only reverts once the date
//! changes; there is no intraday expiry.
//!
//! `Overdue` is raised when *any* scheduled time of the day has passed, even
//! if a later slot is still ahead.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Write};

use crate::medication::{parse_time_of_day, time_label, Medication};

/// Shown when a medication has no recorded dose.
pub const NOT_TAKEN_YET: &str = "Not taken yet";

/// Derived daily state of a medication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DueStatus {
    Taken,
    Overdue,
    Upcoming,
}

impl DueStatus {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Taken => "taken",
            Self::Overdue => "overdue",
            Self::Upcoming => "upcoming",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Taken => "Taken",
            Self::Overdue => "Overdue",
            Self::Upcoming => "Upcoming",
        }
    }
}

impl Display for DueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// True iff `now`'s time of day is strictly later than `time_of_day` (HH:MM)
/// on the same calendar day. Unparseable times are never overdue.
pub fn is_overdue<Tz: TimeZone>(time_of_day: &str, now: &DateTime<Tz>) -> bool {
    match parse_time_of_day(time_of_day) {
        Ok(scheduled) => now.time() > scheduled,
        Err(_) => false,
    }
}

/// True iff `last_taken` falls on `now`'s calendar date in `now`'s zone.
pub fn taken_today<Tz: TimeZone>(last_taken: Option<DateTime<Utc>>, now: &DateTime<Tz>) -> bool {
    last_taken
        .map(|at| at.with_timezone(&now.timezone()).date_naive() == now.date_naive())
        .unwrap_or(false)
}

/// `Taken` if taken today, else `Overdue` if any scheduled time has passed,
/// else `Upcoming`.
pub fn due_status<Tz: TimeZone>(medication: &Medication, now: &DateTime<Tz>) -> DueStatus {
    if taken_today(medication.last_taken, now) {
        return DueStatus::Taken;
    }

    if medication.time.split(',').any(|entry| is_overdue(entry, now)) {
        return DueStatus::Overdue;
    }

    DueStatus::Upcoming
}

/// Human-readable schedule: `"08:00, 20:00"`.
///
/// Entries that do not parse are shown trimmed but otherwise as stored.
pub fn format_schedule(time_list: &str) -> String {
    time_list
        .split(',')
        .map(|entry| match parse_time_of_day(entry) {
            Ok(t) => time_label(t),
            Err(_) => entry.trim().to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// strftime patterns for dates and times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayFormats {
    pub date_format: String,
    pub time_format: String,
}

impl Default for DisplayFormats {
    fn default() -> Self {
        Self {
            date_format: "%m/%d/%Y".to_string(),
            time_format: "%H:%M".to_string(),
        }
    }
}

/// True if chrono accepts every item in `pattern`.
pub fn is_valid_pattern(pattern: &str) -> bool {
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

impl DisplayFormats {
    fn render<Tz>(at: &DateTime<Tz>, pattern: &str, fallback: &str) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let pattern = if is_valid_pattern(pattern) {
            pattern
        } else {
            fallback
        };
        let mut out = String::new();
        if write!(out, "{}", at.format(pattern)).is_err() {
            out.clear();
            // Fallbacks are plain numeric patterns and always format.
            let _ = write!(out, "{}", at.format(fallback));
        }
        out
    }

    pub fn date<Tz>(&self, at: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self::render(at, &self.date_format, "%m/%d/%Y")
    }

    pub fn time<Tz>(&self, at: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self::render(at, &self.time_format, "%H:%M")
    }
}

/// `"Not taken yet"`, or `"<date> at <time>"` in `tz`.
pub fn format_last_taken<Tz>(
    last_taken: Option<DateTime<Utc>>,
    tz: &Tz,
    formats: &DisplayFormats,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match last_taken {
        None => NOT_TAKEN_YET.to_string(),
        Some(at) => {
            let local = at.with_timezone(tz);
            format!("{} at {}", formats.date(&local), formats.time(&local))
        }
    }
}

/// Header clock: `"<date> • <time>"`.
pub fn format_clock<Tz>(now: &DateTime<Tz>, formats: &DisplayFormats) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("{} • {}", formats.date(now), formats.time(now))
}
