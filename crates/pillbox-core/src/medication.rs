//! Medication entity and the add/update inputs that produce it.
//!
//! The serialized field names match the persisted slot format
//! (`createdAt`, `lastTaken`), so a collection written by any earlier
//! version of the store loads unchanged.

use chrono::{DateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Default schedule offered by the add form.
pub const DEFAULT_TIME: &str = "08:00";

/// How often a medication is meant to be taken.
///
/// Informational only: due status is computed from the `time` list, never
/// from the frequency label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Frequency {
    #[default]
    #[serde(rename = "Once daily")]
    OnceDaily,
    #[serde(rename = "Twice daily")]
    TwiceDaily,
    #[serde(rename = "Three times daily")]
    ThreeTimesDaily,
    #[serde(rename = "Every 6 hours")]
    Every6Hours,
    #[serde(rename = "Every 8 hours")]
    Every8Hours,
    #[serde(rename = "As needed")]
    AsNeeded,
}

impl Frequency {
    /// Every option, in the order the add form lists them.
    pub const ALL: [Frequency; 6] = [
        Frequency::OnceDaily,
        Frequency::TwiceDaily,
        Frequency::ThreeTimesDaily,
        Frequency::Every6Hours,
        Frequency::Every8Hours,
        Frequency::AsNeeded,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::OnceDaily => "Once daily",
            Self::TwiceDaily => "Twice daily",
            Self::ThreeTimesDaily => "Three times daily",
            Self::Every6Hours => "Every 6 hours",
            Self::Every8Hours => "Every 8 hours",
            Self::AsNeeded => "As needed",
        }
    }
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::UnknownFrequency(wanted.to_string()))
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parse one `HH:MM` entry (24-hour). A trailing `:SS` is accepted and dropped.
pub fn parse_time_of_day(entry: &str) -> Result<NaiveTime, ValidationError> {
    let invalid = || ValidationError::InvalidTime {
        value: entry.to_string(),
    };

    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());

    let mut parts = entry.trim().split(':');
    let hours = parts.next().ok_or_else(invalid)?;
    let minutes = parts.next().ok_or_else(invalid)?;
    if let Some(seconds) = parts.next() {
        if seconds.len() != 2 || !digits(seconds) {
            return Err(invalid());
        }
        if seconds.parse::<u32>().map_err(|_| invalid())? >= 60 {
            return Err(invalid());
        }
    }
    if parts.next().is_some() || hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return Err(invalid());
    }
    if !digits(hours) || !digits(minutes) {
        return Err(invalid());
    }

    let h = hours.parse::<u32>().map_err(|_| invalid())?;
    let m = minutes.parse::<u32>().map_err(|_| invalid())?;
    NaiveTime::from_hms_opt(h, m, 0).ok_or_else(invalid)
}

/// Parse a comma-separated schedule, keeping entry order.
///
/// # Errors
/// Returns the first entry that is not a valid time, or `InvalidTime` with an
/// empty value when the list has no entries at all.
pub fn parse_schedule(time_list: &str) -> Result<Vec<NaiveTime>, ValidationError> {
    if time_list.trim().is_empty() {
        return Err(ValidationError::InvalidTime {
            value: String::new(),
        });
    }
    time_list.split(',').map(parse_time_of_day).collect()
}

/// Canonical `HH:MM` text for a parsed time.
pub fn time_label(t: NaiveTime) -> String {
    format!("{:02}:{:02}", t.hour(), t.minute())
}

fn normalize_schedule(time_list: &str) -> Result<String, ValidationError> {
    let times = parse_schedule(time_list)?;
    Ok(times.into_iter().map(time_label).collect::<Vec<_>>().join(","))
}

fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(trimmed.to_string())
}

/// A tracked medication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: u64,
    pub name: String,
    pub dose: String,
    pub frequency: Frequency,
    /// Comma-separated `HH:MM` daily dose times.
    pub time: String,
    pub created_at: DateTime<Utc>,
    pub last_taken: Option<DateTime<Utc>>,
}

impl Medication {
    /// Scheduled times that parse; malformed entries are skipped.
    pub fn schedule(&self) -> Vec<NaiveTime> {
        self.time
            .split(',')
            .filter_map(|entry| parse_time_of_day(entry).ok())
            .collect()
    }
}

/// Add-form input. Identity and timestamps are assigned by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMedication {
    pub name: String,
    pub dose: String,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default = "default_time")]
    pub time: String,
}

fn default_time() -> String {
    DEFAULT_TIME.to_string()
}

impl NewMedication {
    pub fn new(name: impl Into<String>, dose: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dose: dose.into(),
            frequency: Frequency::default(),
            time: default_time(),
        }
    }

    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = time.into();
        self
    }

    /// Trim text fields and canonicalize the schedule.
    ///
    /// # Errors
    /// Fails on an empty name or dose, or a schedule with no valid entry.
    pub fn validated(&self) -> Result<NewMedication, ValidationError> {
        Ok(NewMedication {
            name: require_text("name", &self.name)?,
            dose: require_text("dose", &self.dose)?,
            frequency: self.frequency,
            time: normalize_schedule(&self.time)?,
        })
    }

    pub(crate) fn into_medication(self, id: u64, now: DateTime<Utc>) -> Medication {
        Medication {
            id,
            name: self.name,
            dose: self.dose,
            frequency: self.frequency,
            time: self.time,
            created_at: now,
            last_taken: None,
        }
    }
}

/// Field replacements for an update. `None` leaves a field unchanged.
///
/// `id` and `createdAt` are immutable and have no slot here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MedicationPatch {
    pub name: Option<String>,
    pub dose: Option<String>,
    pub frequency: Option<Frequency>,
    pub time: Option<String>,
    pub last_taken: Option<DateTime<Utc>>,
}

impl MedicationPatch {
    pub fn taken_at(at: DateTime<Utc>) -> Self {
        Self {
            last_taken: Some(at),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Validate every present field the same way add input is validated.
    ///
    /// # Errors
    /// Fails on empty text, a bad schedule, or a take time after `now`.
    pub fn validated(&self, now: DateTime<Utc>) -> Result<MedicationPatch, ValidationError> {
        if let Some(at) = self.last_taken {
            if at > now {
                return Err(ValidationError::TakenInFuture(at));
            }
        }
        Ok(MedicationPatch {
            name: self.name.as_deref().map(|n| require_text("name", n)).transpose()?,
            dose: self.dose.as_deref().map(|d| require_text("dose", d)).transpose()?,
            frequency: self.frequency,
            time: self.time.as_deref().map(normalize_schedule).transpose()?,
            last_taken: self.last_taken,
        })
    }

    /// Merge present fields into `med`.
    pub fn apply(&self, med: &mut Medication) {
        if let Some(name) = &self.name {
            med.name = name.clone();
        }
        if let Some(dose) = &self.dose {
            med.dose = dose.clone();
        }
        if let Some(frequency) = self.frequency {
            med.frequency = frequency;
        }
        if let Some(time) = &self.time {
            med.time = time.clone();
        }
        if let Some(at) = self.last_taken {
            med.last_taken = Some(at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Medication {
        Medication {
            id: 1_700_000_000_000,
            name: "Lisinopril".to_string(),
            dose: "10mg".to_string(),
            frequency: Frequency::OnceDaily,
            time: "08:00".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 10, 19, 7, 0, 0).unwrap(),
            last_taken: None,
        }
    }

    #[test]
    fn medication_serializes_with_slot_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        let obj = json.as_object().unwrap();
        for key in ["id", "name", "dose", "frequency", "time", "createdAt", "lastTaken"] {
            assert!(obj.contains_key(key), "missing {key}");
        }
        assert_eq!(json["frequency"], "Once daily");
        assert!(json["lastTaken"].is_null());
        assert!(json["id"].is_number());
    }

    #[test]
    fn medication_reads_browser_style_timestamps() {
        let raw = r#"{"id":1718000000000,"name":"Metformin","dose":"500mg",
            "frequency":"Twice daily","time":"08:00,20:00",
            "createdAt":"2024-06-10T06:13:20.000Z","lastTaken":"2024-06-10T08:02:11.512Z"}"#;
        let med: Medication = serde_json::from_str(raw).unwrap();
        assert_eq!(med.frequency, Frequency::TwiceDaily);
        assert_eq!(med.schedule().len(), 2);
        assert!(med.last_taken.is_some());
    }

    #[test]
    fn frequency_parses_labels_case_insensitively() {
        assert_eq!("every 8 hours".parse::<Frequency>().unwrap(), Frequency::Every8Hours);
        assert_eq!(" As needed ".parse::<Frequency>().unwrap(), Frequency::AsNeeded);
        assert!("weekly".parse::<Frequency>().is_err());
        for f in Frequency::ALL {
            assert_eq!(f.to_string().parse::<Frequency>().unwrap(), f);
        }
    }

    #[test]
    fn time_of_day_parsing() {
        assert_eq!(time_label(parse_time_of_day("8:05").unwrap()), "08:05");
        assert_eq!(time_label(parse_time_of_day(" 20:30 ").unwrap()), "20:30");
        assert_eq!(time_label(parse_time_of_day("07:15:00").unwrap()), "07:15");
        assert!(parse_time_of_day("24:00").is_err());
        assert!(parse_time_of_day("12:60").is_err());
        assert!(parse_time_of_day("noon").is_err());
        assert!(parse_time_of_day("12:5").is_err());
        assert!(parse_time_of_day("").is_err());
        assert!(parse_time_of_day("+8:00").is_err());
        assert!(parse_time_of_day("08:+5").is_err());
        assert!(parse_time_of_day("07:15:99").is_err());
        assert!(parse_time_of_day("07:15:+1").is_err());
    }

    #[test]
    fn schedule_requires_at_least_one_entry() {
        assert!(parse_schedule("").is_err());
        assert!(parse_schedule("08:00,").is_err());
        assert_eq!(parse_schedule("08:00, 20:00").unwrap().len(), 2);
    }

    #[test]
    fn schedule_skips_malformed_entries() {
        let mut med = sample();
        med.time = "08:00,bogus,20:00".to_string();
        assert_eq!(med.schedule().len(), 2);
    }

    #[test]
    fn new_medication_validation_trims_and_normalizes() {
        let input = NewMedication::new("  Lisinopril ", "10mg").with_time("8:00, 20:00");
        let valid = input.validated().unwrap();
        assert_eq!(valid.name, "Lisinopril");
        assert_eq!(valid.time, "08:00,20:00");
        assert_eq!(valid.frequency, Frequency::OnceDaily);
    }

    #[test]
    fn new_medication_rejects_empty_fields() {
        let err = NewMedication::new("   ", "10mg").validated().unwrap_err();
        assert_eq!(err, ValidationError::EmptyField { field: "name" });
        let err = NewMedication::new("Aspirin", "").validated().unwrap_err();
        assert_eq!(err, ValidationError::EmptyField { field: "dose" });
    }

    #[test]
    fn new_medication_defaults_from_json() {
        let input: NewMedication =
            serde_json::from_str(r#"{"name":"Aspirin","dose":"81mg"}"#).unwrap();
        assert_eq!(input.time, DEFAULT_TIME);
        assert_eq!(input.frequency, Frequency::OnceDaily);
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let mut med = sample();
        let patch = MedicationPatch {
            dose: Some("20mg".to_string()),
            ..MedicationPatch::default()
        };
        patch.apply(&mut med);
        assert_eq!(med.dose, "20mg");
        assert_eq!(med.name, "Lisinopril");
        assert!(med.last_taken.is_none());
    }

    #[test]
    fn patch_rejects_future_take() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        let patch = MedicationPatch::taken_at(now + chrono::Duration::minutes(5));
        assert!(matches!(
            patch.validated(now),
            Err(ValidationError::TakenInFuture(_))
        ));
        assert!(MedicationPatch::taken_at(now).validated(now).is_ok());
    }
}
