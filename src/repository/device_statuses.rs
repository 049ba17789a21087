//! Device statuses repository

use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::device_status::DeviceStatus};

#[derive(Clone)]
pub struct DeviceStatusesRepository {
    pool: Pool<Postgres>,
}

impl DeviceStatusesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get all device statuses
    pub async fn find_all(&self) -> AppResult<Vec<DeviceStatus>> {
        let statuses =
            sqlx::query_as::<_, DeviceStatus>("SELECT * FROM device_statuses ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(statuses)
    }

    /// Find a status by its unique name
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<DeviceStatus>> {
        let status =
            sqlx::query_as::<_, DeviceStatus>("SELECT * FROM device_statuses WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        Ok(status)
    }
}
