//! Reporting models: aggregated sales and stock summaries

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One day's aggregated sales figures
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct DailyProfit {
    pub sale_date: NaiveDate,
    pub total_sales: Decimal,
    pub total_cost: Decimal,
    pub net_profit: Decimal,
    pub transaction_count: i64,
}

/// Current stock levels and value for one catalog entry. Latest prices come
/// from the most recently taken-in unit of that model, zero when the model
/// has no units at all.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct StockReport {
    pub model_id: Uuid,
    pub model_name: String,
    pub in_stock_count: i64,
    pub total_cost_value: Decimal,
    pub latest_cost_price: Decimal,
    pub latest_selling_price: Decimal,
}
