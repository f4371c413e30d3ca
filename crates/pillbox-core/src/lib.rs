//! # Pillbox Core Library
//!
//! This library provides the core logic for the Pillbox medication reminder.
//! Every operation is available through the standalone CLI binary, which is
//! a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Storage**: a key-value backend (SQLite `kv` table) holding the whole
//!   medication collection in one slot, behind a [`StoreAdapter`]
//! - **Repository**: CRUD with id and timestamp assignment
//! - **Status**: pure due/overdue/taken computation, recomputed on read
//! - **Controller**: app state with optimistic updates that reconcile with
//!   what was persisted, driven by a periodic clock tick
//!
//! ## Key Components
//!
//! - [`MedicationRepository`]: collection CRUD over an injected store
//! - [`AppController`]: load, tick, add/take/delete, Today/History views
//! - [`due_status`]: Taken / Overdue / Upcoming
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod controller;
pub mod error;
pub mod events;
pub mod medication;
pub mod repository;
pub mod status;
pub mod storage;
pub mod view;

pub use clock::{Clock, FixedClock, RefreshTimer, SystemClock};
pub use controller::AppController;
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use medication::{Frequency, Medication, MedicationPatch, NewMedication};
pub use repository::MedicationRepository;
pub use status::{
    due_status, format_last_taken, format_schedule, is_overdue, DisplayFormats, DueStatus,
};
pub use storage::{Config, KvBackend, MemoryKv, SqliteKv, StoreAdapter};
pub use view::{HistoryEntry, Tab, TodayItem};
