//! Sales repository: the atomic sale commitment transaction

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::sale::{
        format_receipt_no, CompletedSale, NewSale, Sale, SaleItem, SaleItemInput, SaleTotals,
    },
};

/// Device fields captured inside the commitment transaction. The model name
/// and IMEI are snapshotted into the line items so later catalog or device
/// edits never rewrite sale history.
#[derive(Debug, sqlx::FromRow)]
struct EligibleDevice {
    id: Uuid,
    imei: String,
    cost_price: Decimal,
    model_name: String,
}

#[derive(Clone)]
pub struct SalesRepository {
    pool: Pool<Postgres>,
}

impl SalesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Commit a sale atomically: verify every requested device is eligible,
    /// draw the next receipt number, insert the sale header and line items,
    /// and flip the devices to the sold status. Any failure rolls the whole
    /// transaction back; no partial state is ever visible.
    ///
    /// Eligibility: the device must not already carry `sold_status_id`, and
    /// must be either unassigned or assigned to the selling user. Callers
    /// must have rejected duplicate device IDs already, otherwise the
    /// requested-vs-fetched count comparison is meaningless.
    pub async fn create_sale(
        &self,
        sale: &NewSale,
        items: &[SaleItemInput],
        sold_status_id: Uuid,
    ) -> AppResult<CompletedSale> {
        let mut tx = self.pool.begin().await?;

        let device_ids: Vec<Uuid> = items.iter().map(|i| i.device_id).collect();

        // Row locks on the matched devices keep a concurrent commitment from
        // passing this same check before the status flip below lands.
        let devices = sqlx::query_as::<_, EligibleDevice>(
            r#"
            SELECT d.id, d.imei, d.cost_price, pm.name AS model_name
            FROM devices d
            JOIN phone_models pm ON d.model_id = pm.id
            WHERE d.id = ANY($1)
              AND d.status_id != $2
              AND (d.assigned_to_user_id IS NULL OR d.assigned_to_user_id = $3)
            FOR UPDATE OF d
            "#,
        )
        .bind(&device_ids)
        .bind(sold_status_id)
        .bind(sale.sold_by_user_id)
        .fetch_all(&mut *tx)
        .await?;

        if devices.len() != device_ids.len() {
            let err =
                Self::diagnose_ineligible(&mut tx, &device_ids, &devices, sale.sold_by_user_id)
                    .await?;
            // Dropping the transaction without commit rolls everything back
            return Err(err);
        }

        let device_map: HashMap<Uuid, &EligibleDevice> =
            devices.iter().map(|d| (d.id, d)).collect();

        let mut totals = SaleTotals::default();
        let mut item_device_ids: Vec<Uuid> = Vec::with_capacity(items.len());
        let mut model_names: Vec<String> = Vec::with_capacity(items.len());
        let mut unit_prices: Vec<Decimal> = Vec::with_capacity(items.len());
        let mut cost_prices: Vec<Decimal> = Vec::with_capacity(items.len());
        let mut item_profits: Vec<Decimal> = Vec::with_capacity(items.len());
        let mut imeis: Vec<String> = Vec::with_capacity(items.len());

        for item in items {
            let device = device_map.get(&item.device_id).ok_or_else(|| {
                AppError::Internal(format!(
                    "Device {} missing from verified set",
                    item.device_id
                ))
            })?;
            let profit = totals.add_item(item.sale_price, device.cost_price);

            item_device_ids.push(device.id);
            model_names.push(device.model_name.clone());
            unit_prices.push(item.sale_price);
            cost_prices.push(device.cost_price);
            item_profits.push(profit);
            imeis.push(device.imei.clone());
        }

        // The receipt number is drawn inside the transaction: an aborted
        // sale may leave a gap in the sequence, but two committed sales can
        // never share a number.
        let seq: i64 = sqlx::query_scalar("SELECT nextval('sale_receipts_seq')")
            .fetch_one(&mut *tx)
            .await?;
        let receipt_no = format_receipt_no(seq);

        let sale_row = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (receipt_no, customer_name, customer_email, customer_phone,
                               total_amount, total_profit, sold_by_user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&receipt_no)
        .bind(&sale.customer_name)
        .bind(&sale.customer_email)
        .bind(&sale.customer_phone)
        .bind(totals.total_amount)
        .bind(totals.total_profit)
        .bind(sale.sold_by_user_id)
        .fetch_one(&mut *tx)
        .await?;

        let sale_items = sqlx::query_as::<_, SaleItem>(
            r#"
            INSERT INTO sale_items (sale_id, device_id, model_name_at_sale, quantity,
                                    unit_price, cost_price_at_sale, item_profit, imei_at_sale)
            SELECT $1, device_id, model_name, 1, unit_price, cost_price, item_profit, imei
            FROM UNNEST($2::uuid[], $3::text[], $4::numeric[], $5::numeric[], $6::numeric[], $7::text[])
                AS t(device_id, model_name, unit_price, cost_price, item_profit, imei)
            RETURNING *
            "#,
        )
        .bind(sale_row.id)
        .bind(&item_device_ids)
        .bind(&model_names)
        .bind(&unit_prices)
        .bind(&cost_prices)
        .bind(&item_profits)
        .bind(&imeis)
        .fetch_all(&mut *tx)
        .await?;

        // The status flip re-checks the sold guard. A shortfall means the
        // eligibility read was raced despite the locks and the whole unit of
        // work aborts.
        let flipped = sqlx::query(
            r#"
            UPDATE devices
            SET status_id = $1, updated_at = NOW()
            WHERE id = ANY($2) AND status_id != $1
            "#,
        )
        .bind(sold_status_id)
        .bind(&device_ids)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if flipped != device_ids.len() as u64 {
            return Err(AppError::Conflict(
                "One or more devices were sold concurrently; the sale was not recorded"
                    .to_string(),
            ));
        }

        tx.commit().await?;

        Ok(CompletedSale {
            sale: sale_row,
            items: sale_items,
        })
    }

    /// Work out which requested device failed the eligibility gate, and why.
    /// Runs on the same transaction, so the diagnosis is consistent with the
    /// snapshot that rejected the sale.
    async fn diagnose_ineligible(
        tx: &mut Transaction<'_, Postgres>,
        requested: &[Uuid],
        fetched: &[EligibleDevice],
        seller_id: Uuid,
    ) -> AppResult<AppError> {
        let fetched_ids: HashSet<Uuid> = fetched.iter().map(|d| d.id).collect();

        if let Some(failed_id) = requested.iter().find(|id| !fetched_ids.contains(id)) {
            let owner = sqlx::query_scalar::<_, Option<Uuid>>(
                "SELECT assigned_to_user_id FROM devices WHERE id = $1",
            )
            .bind(failed_id)
            .fetch_optional(&mut **tx)
            .await?;

            if let Some(Some(owner_id)) = owner {
                if owner_id != seller_id {
                    return Ok(AppError::Conflict(format!(
                        "Device {} is assigned to another salesperson and cannot be sold",
                        failed_id
                    )));
                }
            }

            return Ok(AppError::Conflict(format!(
                "Device {} is invalid, already sold, or does not exist",
                failed_id
            )));
        }

        Ok(AppError::Conflict(
            "One or more devices are invalid, already sold, or not assigned to you".to_string(),
        ))
    }

    /// Get a sale by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Sale> {
        sqlx::query_as::<_, Sale>("SELECT * FROM sales WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Sale {} not found", id)))
    }

    /// Get the line items of a sale
    pub async fn get_items(&self, sale_id: Uuid) -> AppResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            "SELECT * FROM sale_items WHERE sale_id = $1 ORDER BY created_at",
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Record that the receipt email for a sale was delivered
    pub async fn mark_email_sent(&self, sale_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE sales SET email_sent = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(sale_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
