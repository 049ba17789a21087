//! Action log (audit sink) repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error::AppResult;

#[derive(Clone)]
pub struct AuditRepository {
    pool: Pool<Postgres>,
}

impl AuditRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert one action log row
    pub async fn insert(
        &self,
        action: &str,
        user_id: Uuid,
        entity_type: &str,
        entity_id: Option<Uuid>,
        payload: serde_json::Value,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO action_logs (action, user_id, entity_type, entity_id, payload)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(action)
        .bind(user_id)
        .bind(entity_type)
        .bind(entity_id)
        .bind(payload)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
