use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;

use super::{normalize_payload, BackupPayload, BACKUP_VERSION};
use crate::avisos::AvisoRepositoryTrait;
use crate::errors::Result;

#[async_trait]
pub trait BackupServiceTrait: Send + Sync {
    /// Snapshot of every record for external backup.
    fn export_all(&self) -> Result<BackupPayload>;

    /// Destructive restore: normalizes the payload fully in memory, then
    /// replaces the entire store contents. Returns the imported record count.
    async fn import_all(&self, payload: serde_json::Value) -> Result<usize>;
}

pub struct BackupService {
    repository: Arc<dyn AvisoRepositoryTrait>,
}

impl BackupService {
    pub fn new(repository: Arc<dyn AvisoRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl BackupServiceTrait for BackupService {
    fn export_all(&self) -> Result<BackupPayload> {
        let avisos = self.repository.load_avisos()?;
        Ok(BackupPayload {
            version: BACKUP_VERSION,
            fecha: Utc::now(),
            avisos,
        })
    }

    async fn import_all(&self, payload: serde_json::Value) -> Result<usize> {
        let records = normalize_payload(&payload, Utc::now());
        debug!("import_all: replacing store with {} records", records.len());
        self.repository.replace_all(records).await
    }
}
