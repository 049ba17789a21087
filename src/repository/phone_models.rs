//! Phone models (catalog) repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::phone_model::{CreatePhoneModel, PhoneModel},
};

#[derive(Clone)]
pub struct PhoneModelsRepository {
    pool: Pool<Postgres>,
}

impl PhoneModelsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get all catalog entries
    pub async fn find_all(&self) -> AppResult<Vec<PhoneModel>> {
        let models = sqlx::query_as::<_, PhoneModel>("SELECT * FROM phone_models ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(models)
    }

    /// Get a catalog entry by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<PhoneModel> {
        sqlx::query_as::<_, PhoneModel>("SELECT * FROM phone_models WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Phone model {} not found", id)))
    }

    /// Create a new catalog entry
    pub async fn create(&self, model: &CreatePhoneModel) -> AppResult<PhoneModel> {
        sqlx::query_as::<_, PhoneModel>(
            r#"
            INSERT INTO phone_models (name, default_cost_price, default_selling_price, specifications)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&model.name)
        .bind(model.default_cost_price)
        .bind(model.default_selling_price)
        .bind(&model.specifications)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(format!("Phone model '{}' already exists", model.name))
            }
            _ => AppError::from(e),
        })
    }
}
