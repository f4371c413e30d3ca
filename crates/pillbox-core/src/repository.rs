//! CRUD over the medication collection.
//!
//! Every operation reads the whole collection through the injected
//! [`StoreAdapter`], changes it in memory and writes the whole collection
//! back. Unknown ids are reported as `Ok(None)` / `Ok(false)`, never as
//! errors.

use chrono::{DateTime, Utc};

use crate::clock::{Clock, SystemClock};
use crate::error::{CoreError, Result};
use crate::medication::{Medication, MedicationPatch, NewMedication};
use crate::storage::{KvBackend, StoreAdapter};

pub struct MedicationRepository<B, C = SystemClock> {
    store: StoreAdapter<B>,
    clock: C,
}

impl<B: KvBackend> MedicationRepository<B, SystemClock> {
    pub fn with_system_clock(store: StoreAdapter<B>) -> Self {
        Self::new(store, SystemClock)
    }
}

impl<B: KvBackend, C: Clock> MedicationRepository<B, C> {
    pub fn new(store: StoreAdapter<B>, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &StoreAdapter<B> {
        &self.store
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// All medications in insertion order; empty if storage is unreadable.
    pub fn list(&self) -> Vec<Medication> {
        self.store.load()
    }

    pub fn get(&self, id: u64) -> Option<Medication> {
        self.list().into_iter().find(|m| m.id == id)
    }

    /// Epoch milliseconds of `now`, bumped past the persisted high-water mark
    /// and every id already in `existing`.
    fn next_id(&self, existing: &[Medication], now: DateTime<Utc>) -> u64 {
        let mark = self.store.high_water_mark().unwrap_or_else(|e| {
            tracing::warn!("ignoring unreadable id high-water mark: {e}");
            0
        });
        let newest = existing.iter().map(|m| m.id).max().unwrap_or(0);
        let stamp = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        stamp
            .max(mark.saturating_add(1))
            .max(newest.saturating_add(1))
    }

    /// Validate, assign identity and timestamps, append and persist.
    ///
    /// # Errors
    /// `Validation` for bad input, `StorageRead` if the stored collection
    /// cannot be read (nothing is overwritten), `StorageWrite` if the write
    /// fails.
    pub fn add_medication(&mut self, input: NewMedication) -> Result<Medication> {
        let input = input.validated()?;
        let mut medications = self.store.try_load()?;
        let now = self.clock.now();
        let id = self.next_id(&medications, now);

        let medication = input.into_medication(id, now);
        medications.push(medication.clone());
        self.store.try_save(&medications)?;

        if let Err(e) = self.store.set_high_water_mark(id) {
            // Ids stay unique through the collection scan in next_id.
            tracing::warn!("failed to record id high-water mark {id}: {e}");
        }
        tracing::info!(id, name = %medication.name, "medication added");
        Ok(medication)
    }

    /// Merge `patch` into the medication with `id` and persist.
    ///
    /// # Errors
    /// `Validation` for bad patch values; `StorageRead`/`StorageWrite` on
    /// storage failure.
    pub fn update_medication(
        &mut self,
        id: u64,
        patch: MedicationPatch,
    ) -> Result<Option<Medication>> {
        let patch = patch.validated(self.clock.now())?;
        let mut medications = self.store.try_load()?;

        let Some(index) = medications.iter().position(|m| m.id == id) else {
            tracing::debug!(id, "update of unknown medication");
            return Ok(None);
        };

        patch.apply(&mut medications[index]);
        self.store.try_save(&medications)?;
        Ok(Some(medications.swap_remove(index)))
    }

    /// Record a dose taken now.
    ///
    /// # Errors
    /// Same as [`MedicationRepository::update_medication`].
    pub fn take_medication(&mut self, id: u64) -> Result<Option<Medication>> {
        let now = self.clock.now();
        let taken = self.update_medication(id, MedicationPatch::taken_at(now))?;
        if taken.is_some() {
            tracing::info!(id, at = %now, "medication taken");
        }
        Ok(taken)
    }

    /// Remove the medication with `id`. `Ok(false)` and no write if absent.
    ///
    /// # Errors
    /// `StorageRead`/`StorageWrite` on storage failure.
    pub fn delete_medication(&mut self, id: u64) -> Result<bool> {
        let medications = self.store.try_load()?;
        let before = medications.len();
        let remaining: Vec<Medication> = medications.into_iter().filter(|m| m.id != id).collect();

        if remaining.len() == before {
            return Ok(false);
        }

        self.store.try_save(&remaining)?;
        tracing::info!(id, "medication deleted");
        Ok(true)
    }

    /// Like [`MedicationRepository::update_medication`], but an unknown id is
    /// an error.
    ///
    /// # Errors
    /// `NotFound` when no medication has `id`.
    pub fn require_update(&mut self, id: u64, patch: MedicationPatch) -> Result<Medication> {
        self.update_medication(id, patch)?
            .ok_or(CoreError::NotFound { id })
    }
}
