mod config;
pub mod database;
pub mod store;

pub use config::{ClockConfig, Config, DisplayConfig, StorageConfig};
pub use database::{KvBackend, MemoryKv, SqliteKv};
pub use store::{StoreAdapter, DEFAULT_SLOT};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/pillbox[-dev]/` based on PILLBOX_ENV.
///
/// Set PILLBOX_ENV=dev to use development data directory.
/// PILLBOX_DATA_DIR, when set, wins over both.
///
/// # Errors
/// Returns an error if creating the data directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("PILLBOX_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("PILLBOX_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("pillbox-dev")
            } else {
                base_dir.join("pillbox")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
