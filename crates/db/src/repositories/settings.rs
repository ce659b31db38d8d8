//! Typed settings over the config table.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    QueryFilter, Set,
};
use shepherd_core::settings::{ConfigSetting, SettingSource, resolve_setting};
use tracing::{info, warn};
use uuid::Uuid;

use crate::entities::configs;

/// Settings repository.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    db: DatabaseConnection,
}

impl SettingsRepository {
    /// Creates a new settings repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Reads the stored text for a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn raw(&self, key: &str) -> Result<Option<String>, DbErr> {
        let row = configs::Entity::find()
            .filter(configs::Column::ConfigKey.eq(key))
            .one(&self.db)
            .await?;

        Ok(row.and_then(|r| r.config_value))
    }

    /// Reads a typed setting, falling back to its default.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get<S: ConfigSetting>(&self) -> Result<S::Value, DbErr> {
        let raw = self.raw(S::KEY).await?;
        let resolved = resolve_setting::<S>(raw.as_deref());

        if let SettingSource::Malformed(text) = &resolved.source {
            warn!(key = S::KEY, value = %text, "Unparsable setting, using default");
        }

        Ok(resolved.value)
    }

    /// Stores the text for a key, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub async fn set(&self, key: &str, value: &str) -> Result<configs::Model, DbErr> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        let existing = configs::Entity::find()
            .filter(configs::Column::ConfigKey.eq(key))
            .one(&self.db)
            .await?;

        let row = if let Some(existing) = existing {
            let mut active = existing.into_active_model();
            active.config_value = Set(Some(value.to_string()));
            active.updated_at = Set(now);
            active.update(&self.db).await?
        } else {
            configs::ActiveModel {
                id: Set(Uuid::new_v4()),
                config_key: Set(key.to_string()),
                config_value: Set(Some(value.to_string())),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&self.db)
            .await?
        };

        info!(key, "Setting stored");
        Ok(row)
    }
}
