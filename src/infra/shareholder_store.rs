//! Legacy shareholder file store.
//!
//! All records live in one JSON array that is read and rewritten whole on
//! every call. A mutex serializes access inside this process only.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::Shareholder;
use crate::errors::{AppError, AppResult};

#[async_trait]
pub trait ShareholderRepository: Send + Sync {
    /// Every record in file order.
    async fn list(&self) -> AppResult<Vec<Shareholder>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Shareholder>>;

    async fn create(&self, payload: Value) -> AppResult<Shareholder>;

    /// Shallow merge; `None` when the id is unknown.
    async fn update(&self, id: Uuid, payload: Value) -> AppResult<Option<Shareholder>>;

    /// `None` when the id is unknown.
    async fn delete(&self, id: Uuid) -> AppResult<Option<Shareholder>>;
}

pub struct JsonFileShareholders {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileShareholders {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the array, creating an empty file on first use.
    async fn read_all(&self) -> AppResult<Vec<Shareholder>> {
        if !tokio::fs::try_exists(&self.path).await.map_err(io_error)? {
            if let Some(dir) = self.path.parent() {
                tokio::fs::create_dir_all(dir).await.map_err(io_error)?;
            }
            tokio::fs::write(&self.path, b"[]").await.map_err(io_error)?;
            return Ok(Vec::new());
        }

        let bytes = tokio::fs::read(&self.path).await.map_err(io_error)?;
        serde_json::from_slice(&bytes)
            .map_err(|e| AppError::internal(format!("Corrupt shareholder file: {}", e)))
    }

    async fn write_all(&self, records: &[Shareholder]) -> AppResult<()> {
        let bytes = serde_json::to_vec_pretty(records)
            .map_err(|e| AppError::internal(e.to_string()))?;
        tokio::fs::write(&self.path, bytes).await.map_err(io_error)
    }
}

fn io_error(e: std::io::Error) -> AppError {
    AppError::internal(format!("Shareholder file I/O failed: {}", e))
}

#[async_trait]
impl ShareholderRepository for JsonFileShareholders {
    async fn list(&self) -> AppResult<Vec<Shareholder>> {
        let _guard = self.lock.lock().await;
        self.read_all().await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Shareholder>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.into_iter().find(|s| s.id == id))
    }

    async fn create(&self, payload: Value) -> AppResult<Shareholder> {
        let record = Shareholder::from_payload(payload, Utc::now())?;

        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;
        records.push(record.clone());
        self.write_all(&records).await?;

        tracing::debug!(shareholder_id = %record.id, "shareholder created");
        Ok(record)
    }

    async fn update(&self, id: Uuid, payload: Value) -> AppResult<Option<Shareholder>> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;
        let Some(record) = records.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };

        record.merge(payload, Utc::now())?;
        let updated = record.clone();
        self.write_all(&records).await?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: Uuid) -> AppResult<Option<Shareholder>> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;
        let Some(idx) = records.iter().position(|s| s.id == id) else {
            return Ok(None);
        };

        let removed = records.remove(idx);
        self.write_all(&records).await?;
        Ok(Some(removed))
    }
}
