//! Store adapter: the persistence boundary for the medication collection.
//!
//! The whole collection lives in one slot as a JSON array. `load` and
//! `save` never fail outward; they log and fall back to an empty collection
//! or `false`. The `try_*` variants keep the error for callers that need to
//! tell the user something went wrong.

use crate::error::{CoreError, Result};
use crate::medication::Medication;

use super::database::KvBackend;

/// Slot name used when the configuration does not override it.
pub const DEFAULT_SLOT: &str = "medications";

const NEXT_ID_SUFFIX: &str = ".next_id";

pub struct StoreAdapter<B> {
    backend: B,
    slot: String,
}

impl<B: KvBackend> StoreAdapter<B> {
    pub fn new(backend: B, slot: impl Into<String>) -> Self {
        Self {
            backend,
            slot: slot.into(),
        }
    }

    pub fn with_default_slot(backend: B) -> Self {
        Self::new(backend, DEFAULT_SLOT)
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn read_error(&self, message: impl ToString) -> CoreError {
        CoreError::StorageRead {
            slot: self.slot.clone(),
            message: message.to_string(),
        }
    }

    fn write_error(&self, message: impl ToString) -> CoreError {
        CoreError::StorageWrite {
            slot: self.slot.clone(),
            message: message.to_string(),
        }
    }

    /// Read the collection, keeping any failure.
    ///
    /// # Errors
    /// `StorageRead` if the backend fails or the slot is not a valid
    /// medication array.
    pub fn try_load(&self) -> Result<Vec<Medication>> {
        let raw = self
            .backend
            .get(&self.slot)
            .map_err(|e| self.read_error(e))?;
        match raw {
            None => Ok(Vec::new()),
            Some(json) => serde_json::from_str(&json).map_err(|e| self.read_error(e)),
        }
    }

    /// Read the collection; empty when nothing is stored or on failure.
    pub fn load(&self) -> Vec<Medication> {
        self.try_load().unwrap_or_else(|e| {
            tracing::warn!("Error getting medications: {e}");
            Vec::new()
        })
    }

    /// Replace the stored collection, keeping any failure.
    ///
    /// # Errors
    /// `StorageWrite` if encoding or the backend write fails.
    pub fn try_save(&mut self, medications: &[Medication]) -> Result<()> {
        let json = serde_json::to_string(medications).map_err(|e| self.write_error(e))?;
        if let Err(e) = self.backend.set(&self.slot, &json) {
            return Err(self.write_error(e));
        }
        tracing::debug!(slot = %self.slot, count = medications.len(), "saved medications");
        Ok(())
    }

    /// Replace the stored collection. Returns `false` on failure.
    pub fn save(&mut self, medications: &[Medication]) -> bool {
        match self.try_save(medications) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Error saving medications: {e}");
                false
            }
        }
    }

    fn next_id_slot(&self) -> String {
        format!("{}{NEXT_ID_SUFFIX}", self.slot)
    }

    /// Largest id ever issued for this slot, or 0.
    ///
    /// # Errors
    /// `StorageRead` if the backend fails or the stored mark is not a number.
    pub fn high_water_mark(&self) -> Result<u64> {
        match self
            .backend
            .get(&self.next_id_slot())
            .map_err(|e| self.read_error(e))?
        {
            None => Ok(0),
            Some(raw) => raw.trim().parse().map_err(|e| self.read_error(e)),
        }
    }

    /// Record the largest id issued.
    ///
    /// # Errors
    /// `StorageWrite` if the backend write fails.
    pub fn set_high_water_mark(&mut self, id: u64) -> Result<()> {
        let key = self.next_id_slot();
        if let Err(e) = self.backend.set(&key, &id.to_string()) {
            return Err(self.write_error(e));
        }
        Ok(())
    }
}
