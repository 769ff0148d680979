pub mod connection;
pub mod error;
pub mod file;
pub mod record;
pub mod sqlite;

use std::path::PathBuf;

use log::info;

pub use error::StoreError;
pub use record::{MockRecordStore, RecordStore};

use crate::{connection::Connection, file::JsonFileRecordStore, sqlite::SqliteRecordStore};

/// Backing medium of the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Sqlite { url: String },
    JsonFile { path: PathBuf },
}

/// Opens the configured store. Failing to reach the backing medium is
/// reported as an error, callers are expected to abort startup.
pub async fn open(config: &StoreConfig) -> Result<Box<dyn RecordStore>, StoreError> {
    match config {
        StoreConfig::Sqlite { url } => {
            info!("Connecting to database");
            let connection = Connection::establish(url).await?;
            Ok(Box::new(SqliteRecordStore::open(connection).await?))
        }
        StoreConfig::JsonFile { path } => {
            info!("Opening state file {}", path.display());
            Ok(Box::new(JsonFileRecordStore::open(path.clone()).await?))
        }
    }
}
