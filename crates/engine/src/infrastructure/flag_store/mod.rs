//! Flag storage adapters.

mod memory;
mod sqlite;

use std::sync::Arc;

pub use memory::InMemoryFlagStore;
pub use sqlite::SqliteFlagStore;

use crate::infrastructure::app_settings::EngineSettings;
use crate::infrastructure::ports::{ClockPort, FlagStore, RepoError};

/// Open the store the settings ask for.
pub async fn open(
    settings: &EngineSettings,
    clock: Arc<dyn ClockPort>,
) -> Result<Arc<dyn FlagStore>, RepoError> {
    match &settings.database_path {
        Some(path) => {
            let path = path.to_string_lossy();
            tracing::info!(path = %path, "Using SQLite flag storage");
            Ok(Arc::new(SqliteFlagStore::new(&path, clock).await?))
        }
        None => {
            tracing::info!("No database configured, flags are kept in memory");
            Ok(Arc::new(InMemoryFlagStore::new()))
        }
    }
}
