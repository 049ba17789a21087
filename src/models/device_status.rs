//! Device status lookup model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Well-known status names seeded by the migrations. Statuses live in a
/// lookup table rather than a code enum so deployments can add their own;
/// only these three are required by the core flows.
pub const STATUS_IN_STOCK: &str = "In-Stock";
pub const STATUS_ASSIGNED: &str = "Assigned";
pub const STATUS_SOLD: &str = "Sold";

/// Device status row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DeviceStatus {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_system_status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
