//! Local save store wrapper.

use crate::error::{Error, Result};
use crate::models::{decode_save, encode_save, SaveData};
use chrono::Utc;
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

/// Stored save blob, one row per storage key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct StoredSave {
    /// Primary key - the per-account storage key.
    #[primary_key]
    pub key: String,
    /// JSON-encoded save blob.
    pub data: Vec<u8>,
    /// Unix milliseconds of the last write.
    pub saved_at_ms: i64,
}

// Static models for the database
static MODELS: LazyLock<Models> = LazyLock::new(|| {
    let mut models = Models::new();
    models.define::<StoredSave>().unwrap();
    models
});

/// Database store for local save blobs.
pub struct Store {
    db: Database<'static>,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Builder::new()
            .create(&MODELS, path.as_ref())
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    /// Create an in-memory database.
    pub fn in_memory() -> Result<Self> {
        let db = Builder::new()
            .create_in_memory(&MODELS)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    /// Write a save blob under a key, replacing any previous one.
    pub fn write_save(&self, key: &str, data: &SaveData) -> Result<()> {
        let stored = StoredSave {
            key: key.to_string(),
            data: encode_save(data),
            saved_at_ms: Utc::now().timestamp_millis(),
        };
        let rw = self.db.rw_transaction()?;
        rw.upsert(stored)?;
        rw.commit()?;
        Ok(())
    }

    /// Read a save blob by key.
    pub fn read_save(&self, key: &str) -> Result<Option<SaveData>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredSave> = r.get().primary(key.to_string())?;
        Ok(stored.map(|s| decode_save(&s.data)))
    }

    /// Delete a save blob.
    pub fn delete_save(&self, key: &str) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        let stored: Option<StoredSave> = rw.get().primary(key.to_string())?;
        if let Some(s) = stored {
            rw.remove(s)?;
        }
        rw.commit()?;
        Ok(())
    }
}

impl From<native_db::db_type::Error> for Error {
    fn from(err: native_db::db_type::Error) -> Self {
        Error::Database(err.to_string())
    }
}
