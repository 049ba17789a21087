//! Settings service: read-through cache over the configurations table

use std::{collections::HashMap, sync::Arc};

use serde_json::json;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{
        configuration::Configuration,
        user::{permissions, Caller},
    },
    repository::Repository,
    services::audit::AuditService,
};

/// Explicitly owned read-through cache of named string settings. Refreshed
/// at startup and written through on update; nothing else mutates it. The
/// sale commitment path never reads this, only collaborators such as
/// receipt rendering do.
#[derive(Clone)]
pub struct SettingsService {
    repository: Repository,
    audit: AuditService,
    cache: Arc<RwLock<HashMap<String, String>>>,
}

impl SettingsService {
    pub fn new(repository: Repository, audit: AuditService) -> Self {
        Self {
            repository,
            audit,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Replace the cache contents with the current store state
    pub async fn refresh(&self) -> AppResult<()> {
        let configurations = self.repository.configurations.find_all().await?;

        let mut cache = self.cache.write().await;
        cache.clear();
        for configuration in configurations {
            cache.insert(configuration.key, configuration.value);
        }

        tracing::info!("Application configurations loaded into cache");
        Ok(())
    }

    /// Value for a key, read through to the store on a cache miss
    pub async fn get(&self, key: &str) -> AppResult<Option<String>> {
        if let Some(value) = self.cache.read().await.get(key).cloned() {
            return Ok(Some(value));
        }

        let configuration = self.repository.configurations.find_by_key(key).await?;
        if let Some(configuration) = &configuration {
            self.cache
                .write()
                .await
                .insert(configuration.key.clone(), configuration.value.clone());
        }

        Ok(configuration.map(|c| c.value))
    }

    /// Value for a key, falling back to a default on a miss or store error
    pub async fn get_or(&self, key: &str, default: &str) -> String {
        match self.get(key).await {
            Ok(Some(value)) => value,
            Ok(None) => default.to_string(),
            Err(e) => {
                tracing::error!("Failed to read setting '{}': {}", key, e);
                default.to_string()
            }
        }
    }

    /// List all configuration entries from the store
    pub async fn list(&self, caller: &Caller) -> AppResult<Vec<Configuration>> {
        caller.require(permissions::MANAGE_CONFIG)?;
        self.repository.configurations.find_all().await
    }

    /// Update one configuration value, write it through the cache, and
    /// audit the change
    pub async fn update(
        &self,
        caller: &Caller,
        key: &str,
        value: &str,
    ) -> AppResult<Configuration> {
        caller.require(permissions::MANAGE_CONFIG)?;

        let existing = self
            .repository
            .configurations
            .find_by_key(key)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Configuration key '{}' not found", key)))?;

        if !existing.is_editable_by_admin {
            return Err(AppError::Authorization(format!(
                "Configuration key '{}' is not editable",
                key
            )));
        }

        let updated = self
            .repository
            .configurations
            .update_value(key, value)
            .await?
            // The row was present a moment ago; losing it here is a race
            .ok_or_else(|| {
                AppError::Internal(format!("Failed to update configuration key '{}'", key))
            })?;

        self.cache
            .write()
            .await
            .insert(updated.key.clone(), updated.value.clone());

        self.audit.log_action(
            "CONFIG_UPDATED",
            caller.user_id,
            "Configuration",
            Some(updated.id),
            json!({
                "key": updated.key,
                "old_value": existing.value,
                "new_value": updated.value,
            }),
        );

        Ok(updated)
    }
}
