//! Read-only reporting queries over sales and stock

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::report::{DailyProfit, StockReport},
};

#[derive(Clone)]
pub struct ReportsRepository {
    pool: Pool<Postgres>,
}

impl ReportsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Aggregate committed sales per calendar day over an inclusive date
    /// range, most recent day first
    pub async fn daily_profit_summary(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<DailyProfit>> {
        let rows = sqlx::query_as::<_, DailyProfit>(
            r#"
            SELECT DATE(sale_date) AS sale_date,
                   SUM(total_amount) AS total_sales,
                   SUM(total_amount - total_profit) AS total_cost,
                   SUM(total_profit) AS net_profit,
                   COUNT(id) AS transaction_count
            FROM sales
            WHERE DATE(sale_date) >= $1 AND DATE(sale_date) <= $2
            GROUP BY DATE(sale_date)
            ORDER BY sale_date DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Current stock count and cost value per catalog entry, with the
    /// per-unit prices of each model's most recently taken-in device.
    /// Models with no stock still appear, with zero counts.
    pub async fn current_stock_summary(
        &self,
        in_stock_status_id: Uuid,
    ) -> AppResult<Vec<StockReport>> {
        let rows = sqlx::query_as::<_, StockReport>(
            r#"
            WITH latest_units AS (
                SELECT DISTINCT ON (model_id) model_id, cost_price, selling_price
                FROM devices
                ORDER BY model_id, created_at DESC
            ),
            in_stock AS (
                SELECT model_id, COUNT(id) AS unit_count, SUM(cost_price) AS cost_value
                FROM devices
                WHERE status_id = $1
                GROUP BY model_id
            )
            SELECT pm.id AS model_id,
                   pm.name AS model_name,
                   COALESCE(s.unit_count, 0) AS in_stock_count,
                   COALESCE(s.cost_value, 0) AS total_cost_value,
                   COALESCE(lu.cost_price, 0) AS latest_cost_price,
                   COALESCE(lu.selling_price, 0) AS latest_selling_price
            FROM phone_models pm
            LEFT JOIN in_stock s ON s.model_id = pm.id
            LEFT JOIN latest_units lu ON lu.model_id = pm.id
            ORDER BY pm.name
            "#,
        )
        .bind(in_stock_status_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
