//! Key-value settings repository; backs the core SecretStore trait.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;

use avisos_core::errors::Result;
use avisos_core::secrets::SecretStore;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::app_settings;

use super::model::AppSettingDB;

pub struct SettingsRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SettingsRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SettingsRepository { pool, writer }
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let mut conn = get_connection(&self.pool)?;
        let row = app_settings::table
            .find(key)
            .first::<AppSettingDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(|r| r.setting_value))
    }

    pub async fn set_setting(&self, key: String, value: String) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let row = AppSettingDB {
                    setting_key: key,
                    setting_value: value.clone(),
                };
                diesel::insert_into(app_settings::table)
                    .values(&row)
                    .on_conflict(app_settings::setting_key)
                    .do_update()
                    .set(app_settings::setting_value.eq(value))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    pub async fn delete_setting(&self, key: String) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::delete(app_settings::table.find(key))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }
}

#[async_trait]
impl SecretStore for SettingsRepository {
    fn get_secret(&self, key: &str) -> Result<Option<String>> {
        self.get_setting(key)
    }

    async fn set_secret(&self, key: &str, value: &str) -> Result<()> {
        self.set_setting(key.to_string(), value.to_string()).await
    }

    async fn delete_secret(&self, key: &str) -> Result<()> {
        self.delete_setting(key.to_string()).await
    }
}
