use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::medication::Medication;

/// Every state change made by the app controller produces an Event.
/// The CLI prints them; tests assert on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    MedicationsLoaded {
        count: usize,
        at: DateTime<Utc>,
    },
    MedicationAdded {
        medication: Medication,
        at: DateTime<Utc>,
    },
    MedicationTaken {
        medication: Medication,
        at: DateTime<Utc>,
    },
    MedicationDeleted {
        id: u64,
        at: DateTime<Utc>,
    },
    /// Periodic refresh of "current time".
    ClockTicked {
        at: DateTime<Utc>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn events_are_tagged_by_type() {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        let json = serde_json::to_value(Event::MedicationDeleted { id: 7, at }).unwrap();
        assert_eq!(json["type"], "MedicationDeleted");
        assert_eq!(json["id"], 7);

        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back, Event::MedicationDeleted { id: 7, at });
    }
}
