use std::{
    collections::BTreeMap,
    ffi::OsString,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use bmibot_model::record::BmiRecord;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};

use crate::{
    error::{Result, StoreError},
    record::{restore_record, RecordStore},
};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    users: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredUser {
    #[serde(default)]
    height_cm: Option<f64>,
    #[serde(default)]
    weight_kg: Option<f64>,
    #[serde(default)]
    bmi: Option<f64>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
}

impl From<&BmiRecord> for StoredUser {
    fn from(record: &BmiRecord) -> Self {
        Self {
            height_cm: Some(record.height_cm()),
            weight_kg: Some(record.weight_kg()),
            bmi: Some(record.bmi()),
            updated_at: Some(record.updated_at()),
        }
    }
}

/// Keeps all records in a single JSON document that is rewritten on every
/// save. Writes go through one mutex so concurrent saves cannot lose updates.
pub struct JsonFileRecordStore {
    path: PathBuf,
    document: Mutex<Document>,
}

impl JsonFileRecordStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).await?;
        }

        let store = if fs::try_exists(&path).await? {
            let document = load(&path).await?;
            info!(
                "Loaded {} records from {}",
                document.users.len(),
                path.display()
            );
            Self {
                path,
                document: Mutex::new(document),
            }
        } else {
            info!("Creating empty state file {}", path.display());
            let store = Self {
                path,
                document: Mutex::new(Document::default()),
            };
            store.persist(&Document::default()).await?;
            store
        };
        Ok(store)
    }

    async fn persist(&self, document: &Document) -> Result<()> {
        let contents = serde_json::to_vec_pretty(document)?;

        let mut tmp_path = OsString::from(self.path.as_os_str());
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);

        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(&contents).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&tmp_path, &self.path).await?;
        #[cfg(unix)]
        sync_parent_dir(&self.path).await?;
        Ok(())
    }
}

/// The rename only survives a crash once the directory entry is flushed too.
#[cfg(unix)]
async fn sync_parent_dir(path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::File::open(dir).await?.sync_all().await?;
    Ok(())
}

async fn load(path: &Path) -> Result<Document> {
    let raw = fs::read_to_string(path).await?;
    if raw.trim().is_empty() {
        return Ok(Document::default());
    }
    serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
        path: path.to_owned(),
        reason: e.to_string(),
    })
}

#[async_trait]
impl RecordStore for JsonFileRecordStore {
    async fn save(&self, record: BmiRecord) -> Result<BmiRecord> {
        let value = serde_json::to_value(StoredUser::from(&record))?;

        let mut document = self.document.lock().await;
        let previous = document.users.insert(record.user_id().to_owned(), value);
        debug!("Writing state file with record of user {}", record.user_id());
        if let Err(e) = self.persist(&document).await {
            match previous {
                Some(previous) => document.users.insert(record.user_id().to_owned(), previous),
                None => document.users.remove(record.user_id()),
            };
            return Err(e);
        }
        Ok(record)
    }

    async fn find(&self, user_id: &str) -> Result<Option<BmiRecord>> {
        let document = self.document.lock().await;
        let Some(value) = document.users.get(user_id) else {
            return Ok(None);
        };
        let Ok(user) = serde_json::from_value::<StoredUser>(value.clone()) else {
            warn!("Stored record of user {} is malformed, ignoring", user_id);
            return Ok(None);
        };
        Ok(restore_record(
            user_id,
            user.height_cm,
            user.weight_kg,
            user.bmi,
            user.updated_at,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bmibot_model::measurement::Measurement;
    use chrono::TimeZone;

    use super::*;

    fn record(user_id: &str, height_cm: f64, weight_kg: f64) -> BmiRecord {
        BmiRecord::new(
            user_id.to_owned(),
            Measurement::new(height_cm, weight_kg).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn open_creates_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("state.json");

        let store = JsonFileRecordStore::open(&path).await.unwrap();

        assert_eq!(store.find("1").await.unwrap(), None);
        let raw = std::fs::read_to_string(&path).unwrap();
        let document: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(document, serde_json::json!({ "users": {} }));
    }

    #[tokio::test]
    async fn records_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let store = JsonFileRecordStore::open(&path).await.unwrap();
        store.save(record("1", 180.0, 80.0)).await.unwrap();
        store.save(record("1", 175.0, 70.0)).await.unwrap();
        drop(store);

        let store = JsonFileRecordStore::open(&path).await.unwrap();
        assert_eq!(store.find("1").await.unwrap(), Some(record("1", 175.0, 70.0)));
    }

    #[tokio::test]
    async fn save_replaces_file_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let store = JsonFileRecordStore::open(&path).await.unwrap();
        store.save(record("1", 180.0, 80.0)).await.unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, ["state.json"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn sync_parent_dir_handles_bare_file_names() {
        let dir = tempfile::tempdir().unwrap();
        sync_parent_dir(&dir.path().join("state.json")).await.unwrap();
        sync_parent_dir(Path::new("state.json")).await.unwrap();
    }

    #[tokio::test]
    async fn document_layout_uses_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let store = JsonFileRecordStore::open(&path).await.unwrap();
        store.save(record("42", 180.0, 80.0)).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let document: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let user = &document["users"]["42"];
        assert_eq!(user["heightCm"], 180.0);
        assert_eq!(user["weightKg"], 80.0);
        assert!(user["bmi"].is_f64());
        assert!(user["updatedAt"].is_string());
    }

    #[tokio::test]
    async fn find_ignores_corrupt_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(
            &path,
            r#"{
                "users": {
                    "1": { "heightCm": null, "weightKg": null, "bmi": null, "updatedAt": null },
                    "2": { "heightCm": 180, "weightKg": 80, "bmi": "high" },
                    "3": { "heightCm": 180, "weightKg": 80, "bmi": 24.69, "updatedAt": "2024-03-01T12:30:00Z" }
                }
            }"#,
        )
        .unwrap();

        let store = JsonFileRecordStore::open(&path).await.unwrap();

        assert_eq!(store.find("1").await.unwrap(), None);
        assert_eq!(store.find("2").await.unwrap(), None);
        assert_eq!(store.find("3").await.unwrap(), Some(record("3", 180.0, 80.0)));
    }

    #[tokio::test]
    async fn open_fails_on_unparsable_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result = JsonFileRecordStore::open(&path).await;

        assert!(matches!(result, Err(StoreError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn concurrent_saves_for_different_users_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = Arc::new(JsonFileRecordStore::open(&path).await.unwrap());

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .save(record(&i.to_string(), 150.0 + i as f64, 60.0))
                        .await
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let reopened = JsonFileRecordStore::open(&path).await.unwrap();
        for i in 0..20 {
            assert_eq!(
                reopened.find(&i.to_string()).await.unwrap(),
                Some(record(&i.to_string(), 150.0 + i as f64, 60.0)),
                "Test case #{}",
                i
            );
        }
    }
}
