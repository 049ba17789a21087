//! Configurations (settings store) repository

use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::configuration::Configuration};

#[derive(Clone)]
pub struct ConfigurationsRepository {
    pool: Pool<Postgres>,
}

impl ConfigurationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get all configuration entries
    pub async fn find_all(&self) -> AppResult<Vec<Configuration>> {
        let configurations =
            sqlx::query_as::<_, Configuration>("SELECT * FROM configurations ORDER BY key")
                .fetch_all(&self.pool)
                .await?;

        Ok(configurations)
    }

    /// Find a configuration entry by key
    pub async fn find_by_key(&self, key: &str) -> AppResult<Option<Configuration>> {
        let configuration =
            sqlx::query_as::<_, Configuration>("SELECT * FROM configurations WHERE key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(configuration)
    }

    /// Update the value of an existing configuration entry
    pub async fn update_value(&self, key: &str, value: &str) -> AppResult<Option<Configuration>> {
        let configuration = sqlx::query_as::<_, Configuration>(
            r#"
            UPDATE configurations
            SET value = $2, updated_at = NOW()
            WHERE key = $1
            RETURNING *
            "#,
        )
        .bind(key)
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        Ok(configuration)
    }
}
