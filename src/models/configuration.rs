//! Application configuration (settings store) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Named string setting, e.g. the shop display name printed on receipts
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Configuration {
    pub id: Uuid,
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub is_editable_by_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
