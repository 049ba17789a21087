//! Device model and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One physical, IMEI-tracked device unit from the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Device {
    pub id: Uuid,
    pub model_id: Uuid,
    pub imei: String,
    pub cost_price: Decimal,
    pub selling_price: Decimal,
    pub status_id: Uuid,
    pub added_by_user_id: Option<Uuid>,
    pub assigned_to_user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row data for inserting a new device.
///
/// Cost and selling price are captured per unit at intake time so later
/// catalog price changes never rewrite existing stock.
#[derive(Debug, Clone)]
pub struct NewDevice {
    pub model_id: Uuid,
    pub imei: String,
    pub cost_price: Decimal,
    pub selling_price: Decimal,
    pub status_id: Uuid,
}

/// One scanned `(imei, model)` pair from the bulk intake flow
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ScanItem {
    pub imei: String,
    pub model_id: Uuid,
}
