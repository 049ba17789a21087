//! Devices repository for database operations

use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::device::{Device, NewDevice},
};

#[derive(Clone)]
pub struct DevicesRepository {
    pool: Pool<Postgres>,
}

impl DevicesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a single device. A duplicate IMEI is surfaced as a conflict,
    /// not a generic database error.
    pub async fn insert(&self, device: &NewDevice, added_by: Uuid) -> AppResult<Device> {
        sqlx::query_as::<_, Device>(
            r#"
            INSERT INTO devices (model_id, imei, cost_price, selling_price, status_id, added_by_user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(device.model_id)
        .bind(&device.imei)
        .bind(device.cost_price)
        .bind(device.selling_price)
        .bind(device.status_id)
        .bind(added_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(
                format!("Device with IMEI {} already exists", device.imei),
            ),
            _ => AppError::from(e),
        })
    }

    /// Insert a batch of devices in one statement. Rows colliding with an
    /// existing IMEI are skipped, so re-scanning a box that was already
    /// taken in is harmless. Returns the number of rows actually inserted.
    pub async fn bulk_insert(&self, devices: &[NewDevice], added_by: Uuid) -> AppResult<u64> {
        if devices.is_empty() {
            return Ok(0);
        }

        let mut model_ids: Vec<Uuid> = Vec::with_capacity(devices.len());
        let mut imeis: Vec<String> = Vec::with_capacity(devices.len());
        let mut cost_prices: Vec<Decimal> = Vec::with_capacity(devices.len());
        let mut selling_prices: Vec<Decimal> = Vec::with_capacity(devices.len());
        let mut status_ids: Vec<Uuid> = Vec::with_capacity(devices.len());

        for device in devices {
            model_ids.push(device.model_id);
            imeis.push(device.imei.clone());
            cost_prices.push(device.cost_price);
            selling_prices.push(device.selling_price);
            status_ids.push(device.status_id);
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO devices (model_id, imei, cost_price, selling_price, status_id, added_by_user_id)
            SELECT model_id, imei, cost_price, selling_price, status_id, $6
            FROM UNNEST($1::uuid[], $2::text[], $3::numeric[], $4::numeric[], $5::uuid[])
                AS t(model_id, imei, cost_price, selling_price, status_id)
            ON CONFLICT (imei) DO NOTHING
            "#,
        )
        .bind(&model_ids)
        .bind(&imeis)
        .bind(&cost_prices)
        .bind(&selling_prices)
        .bind(&status_ids)
        .bind(added_by)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(inserted)
    }

    /// Find a device by its IMEI
    pub async fn find_by_imei(&self, imei: &str) -> AppResult<Option<Device>> {
        let device = sqlx::query_as::<_, Device>("SELECT * FROM devices WHERE imei = $1")
            .bind(imei)
            .fetch_optional(&self.pool)
            .await?;

        Ok(device)
    }

    /// Get all devices currently assigned to a seller
    pub async fn find_assigned_to(&self, user_id: Uuid) -> AppResult<Vec<Device>> {
        let devices = sqlx::query_as::<_, Device>(
            "SELECT * FROM devices WHERE assigned_to_user_id = $1 ORDER BY imei",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(devices)
    }

    /// Overwrite the assigned owner on every listed device, regardless of
    /// its current status. IMEIs with no matching row are silently ignored,
    /// so the returned count may be lower than the list length.
    pub async fn bulk_set_owner(
        &self,
        imeis: &[String],
        owner_id: Option<Uuid>,
    ) -> AppResult<u64> {
        let updated = sqlx::query(
            r#"
            UPDATE devices
            SET assigned_to_user_id = $1, updated_at = NOW()
            WHERE imei = ANY($2)
            "#,
        )
        .bind(owner_id)
        .bind(imeis)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated)
    }
}
