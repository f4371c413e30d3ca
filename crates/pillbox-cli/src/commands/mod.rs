pub mod config;
pub mod med;
pub mod view;
pub mod watch;

use chrono::Local;
use pillbox_core::{
    AppController, Config, MedicationRepository, SqliteKv, StoreAdapter, SystemClock,
};

pub type Repository = MedicationRepository<SqliteKv, SystemClock>;
pub type App = AppController<SqliteKv, SystemClock, Local>;

/// Open the configured store.
pub fn open_repository(config: &Config) -> Result<Repository, Box<dyn std::error::Error>> {
    let db = SqliteKv::open(&config.database_path()?)?;
    let store = StoreAdapter::new(db, config.storage.slot.clone());
    Ok(MedicationRepository::with_system_clock(store))
}

/// Open the configured store and load it into a fresh app state.
///
/// A failed load is not fatal: the app starts empty with its error set.
pub fn open_app(config: &Config) -> Result<App, Box<dyn std::error::Error>> {
    let repo = open_repository(config)?;
    let mut app = AppController::new(repo, Local).with_formats(config.display_formats());
    if let Err(e) = app.start() {
        tracing::warn!("starting with an empty collection: {e}");
    }
    Ok(app)
}
