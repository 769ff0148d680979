use std::{str::FromStr, sync::Arc};

use log::debug;
use sqlx::{sqlite::SqliteConnectOptions, ConnectOptions, Executor, SqliteConnection};
use tokio::sync::{Mutex, MutexGuard};

use crate::error::Result;

const SETUP_QUERY: &str = "PRAGMA cache_size = -1000;
PRAGMA page_size = 4096;
PRAGMA journal_mode = WAL;
PRAGMA synchronous = FULL;";

/// Process-wide handle to the SQLite database. Cloning shares the same
/// underlying connection, statements are serialized through the mutex.
#[derive(Clone)]
pub struct Connection {
    inner: Arc<Mutex<SqliteConnection>>,
}

impl Connection {
    pub async fn establish(database_url: &str) -> Result<Self> {
        debug!("Opening SQLite database at {}", database_url);
        let mut connection = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .connect()
            .await?;

        connection.execute(SETUP_QUERY).await?;

        Ok(Self {
            inner: Arc::new(Mutex::new(connection)),
        })
    }

    pub async fn lock(&self) -> MutexGuard<'_, SqliteConnection> {
        self.inner.lock().await
    }
}
