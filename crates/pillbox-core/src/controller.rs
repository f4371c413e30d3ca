//! Application state: the bridge between the repository and whatever
//! renders the Today and History views.
//!
//! Mutating actions update the in-memory collection first, then persist
//! through the repository. A persisted result replaces the optimistic
//! entry; a failed write puts the previous state back and raises the
//! user-facing error message.

use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt::Display;

use crate::clock::Clock;
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::medication::{Medication, NewMedication};
use crate::repository::MedicationRepository;
use crate::status::{format_clock, DisplayFormats};
use crate::storage::KvBackend;
use crate::view::{history_view, today_view, HistoryEntry, Tab, TodayItem};

pub const LOAD_FAILED: &str = "Failed to load medications";
pub const ADD_FAILED: &str = "Failed to add medication";
pub const UPDATE_FAILED: &str = "Failed to update medication";
pub const DELETE_FAILED: &str = "Failed to delete medication";

pub struct AppController<B, C, Tz: TimeZone = Local> {
    repo: MedicationRepository<B, C>,
    tz: Tz,
    formats: DisplayFormats,
    medications: Vec<Medication>,
    now: DateTime<Utc>,
    is_loading: bool,
    error: Option<String>,
    active_tab: Tab,
}

impl<B, C, Tz> AppController<B, C, Tz>
where
    B: KvBackend,
    C: Clock,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    pub fn new(repo: MedicationRepository<B, C>, tz: Tz) -> Self {
        let now = repo.now();
        Self {
            repo,
            tz,
            formats: DisplayFormats::default(),
            medications: Vec::new(),
            now,
            is_loading: true,
            error: None,
            active_tab: Tab::Today,
        }
    }

    pub fn with_formats(mut self, formats: DisplayFormats) -> Self {
        self.formats = formats;
        self
    }

    /// Load the collection. On failure the collection stays empty, the load
    /// error is shown, and nothing retries.
    ///
    /// # Errors
    /// `StorageRead` if the stored collection cannot be read.
    pub fn start(&mut self) -> Result<Event> {
        self.is_loading = true;
        self.now = self.repo.now();
        let loaded = self.repo.store().try_load();
        self.is_loading = false;

        match loaded {
            Ok(medications) => {
                self.medications = medications;
                self.error = None;
                tracing::info!(count = self.medications.len(), "medications loaded");
                Ok(Event::MedicationsLoaded {
                    count: self.medications.len(),
                    at: self.now,
                })
            }
            Err(e) => {
                tracing::error!("Error fetching medications: {e}");
                self.medications.clear();
                self.error = Some(LOAD_FAILED.to_string());
                Err(e)
            }
        }
    }

    /// Refresh "current time" so statuses and overdue flags move on their own.
    pub fn tick(&mut self) -> Event {
        self.now = self.repo.now();
        Event::ClockTicked { at: self.now }
    }

    fn fail(&mut self, message: &str, e: CoreError) -> CoreError {
        tracing::error!("{message}: {e}");
        self.error = Some(message.to_string());
        e
    }

    /// Add a medication.
    ///
    /// # Errors
    /// `Validation` before anything changes; storage errors after the
    /// optimistic entry has been withdrawn.
    pub fn add(&mut self, input: NewMedication) -> Result<Event> {
        let input = input.validated()?;
        let now = self.repo.now();

        // Placeholder until the repository assigns the real id.
        let slot = self.medications.len();
        self.medications.push(Medication {
            id: 0,
            name: input.name.clone(),
            dose: input.dose.clone(),
            frequency: input.frequency,
            time: input.time.clone(),
            created_at: now,
            last_taken: None,
        });

        match self.repo.add_medication(input) {
            Ok(created) => {
                self.medications[slot] = created.clone();
                self.now = now;
                Ok(Event::MedicationAdded {
                    medication: created,
                    at: now,
                })
            }
            Err(e) => {
                self.medications.truncate(slot);
                Err(self.fail(ADD_FAILED, e))
            }
        }
    }

    /// Mark a dose taken now.
    ///
    /// # Errors
    /// `NotFound` for an id that is not displayed, or one that storage no
    /// longer has (the stale entry is dropped from memory); storage errors
    /// after the optimistic take is undone.
    pub fn take(&mut self, id: u64) -> Result<Event> {
        let index = self
            .medications
            .iter()
            .position(|m| m.id == id)
            .ok_or(CoreError::NotFound { id })?;
        let now = self.repo.now();
        let previous = self.medications[index].last_taken;
        self.medications[index].last_taken = Some(now);

        match self.repo.take_medication(id) {
            Ok(Some(updated)) => {
                self.medications[index] = updated.clone();
                self.now = now;
                Ok(Event::MedicationTaken {
                    medication: updated,
                    at: now,
                })
            }
            Ok(None) => {
                tracing::warn!(id, "taken medication was already gone from storage");
                self.medications.remove(index);
                Err(self.fail(UPDATE_FAILED, CoreError::NotFound { id }))
            }
            Err(e) => {
                self.medications[index].last_taken = previous;
                Err(self.fail(UPDATE_FAILED, e))
            }
        }
    }

    /// Delete a medication.
    ///
    /// If storage had already lost the record, the removal stands: memory
    /// and storage agree afterwards either way.
    ///
    /// # Errors
    /// `NotFound` for an id that is not displayed; storage errors after the
    /// medication is put back in its original position.
    pub fn delete(&mut self, id: u64) -> Result<Event> {
        let index = self
            .medications
            .iter()
            .position(|m| m.id == id)
            .ok_or(CoreError::NotFound { id })?;
        let removed = self.medications.remove(index);

        match self.repo.delete_medication(id) {
            Ok(found) => {
                if !found {
                    tracing::warn!(id, "deleted medication was already gone from storage");
                }
                let at = self.repo.now();
                self.now = at;
                Ok(Event::MedicationDeleted { id, at })
            }
            Err(e) => {
                self.medications.insert(index, removed);
                Err(self.fail(DELETE_FAILED, e))
            }
        }
    }

    pub fn medications(&self) -> &[Medication] {
        &self.medications
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn set_active_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    /// "Current time" as of the last start, tick or action.
    pub fn now(&self) -> DateTime<Tz> {
        self.now.with_timezone(&self.tz)
    }

    pub fn clock_label(&self) -> String {
        format_clock(&self.now(), &self.formats)
    }

    pub fn today(&self) -> Vec<TodayItem> {
        today_view(&self.medications, &self.now(), &self.formats)
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        history_view(&self.medications, &self.tz, &self.formats)
    }

    pub fn repository(&self) -> &MedicationRepository<B, C> {
        &self.repo
    }
}
