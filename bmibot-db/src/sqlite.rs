use async_trait::async_trait;
use bmibot_model::record::BmiRecord;
use chrono::DateTime;
use log::debug;

use crate::{
    connection::Connection,
    error::Result,
    record::{restore_record, RecordStore},
};

const CREATE_TABLE_QUERY: &str = "CREATE TABLE IF NOT EXISTS user_bmi (
    user_id TEXT PRIMARY KEY NOT NULL,
    height_cm REAL,
    weight_kg REAL,
    bmi REAL,
    updated_at INTEGER
)";

pub struct SqliteRecordStore {
    connection: Connection,
}

impl SqliteRecordStore {
    pub async fn open(connection: Connection) -> Result<Self> {
        debug!("Creating user_bmi table");
        sqlx::query(CREATE_TABLE_QUERY)
            .execute(&mut *connection.lock().await)
            .await?;
        Ok(Self { connection })
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn save(&self, record: BmiRecord) -> Result<BmiRecord> {
        let mut conn = self.connection.lock().await;
        debug!("Storing record of user {}", record.user_id());
        sqlx::query(
            "INSERT OR REPLACE INTO user_bmi (user_id, height_cm, weight_kg, bmi, updated_at)
            VALUES (?, ?, ?, ?, ?)",
        )
        .bind(record.user_id())
        .bind(record.height_cm())
        .bind(record.weight_kg())
        .bind(record.bmi())
        .bind(record.updated_at().timestamp_millis())
        .execute(&mut *conn)
        .await?;
        Ok(record)
    }

    async fn find(&self, user_id: &str) -> Result<Option<BmiRecord>> {
        let mut conn = self.connection.lock().await;
        let row: Option<(Option<f64>, Option<f64>, Option<f64>, Option<i64>)> = sqlx::query_as(
            "SELECT height_cm, weight_kg, bmi, updated_at FROM user_bmi WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row.and_then(|(height_cm, weight_kg, bmi, updated_at)| {
            restore_record(
                user_id,
                height_cm,
                weight_kg,
                bmi,
                updated_at.and_then(DateTime::from_timestamp_millis),
            )
        }))
    }
}
