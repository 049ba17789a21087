//! Phone model (catalog entry) model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Catalog entry providing the display name and default pricing for a
/// class of devices
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PhoneModel {
    pub id: Uuid,
    pub name: String,
    pub default_cost_price: Decimal,
    pub default_selling_price: Decimal,
    pub specifications: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create phone model request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePhoneModel {
    pub name: String,
    pub default_cost_price: Decimal,
    pub default_selling_price: Decimal,
    pub specifications: Option<String>,
}
