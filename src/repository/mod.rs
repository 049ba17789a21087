//! Repository layer for database operations

pub mod audit;
pub mod configurations;
pub mod device_statuses;
pub mod devices;
pub mod phone_models;
pub mod reports;
pub mod sales;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub devices: devices::DevicesRepository,
    pub device_statuses: device_statuses::DeviceStatusesRepository,
    pub phone_models: phone_models::PhoneModelsRepository,
    pub sales: sales::SalesRepository,
    pub reports: reports::ReportsRepository,
    pub audit: audit::AuditRepository,
    pub configurations: configurations::ConfigurationsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            devices: devices::DevicesRepository::new(pool.clone()),
            device_statuses: device_statuses::DeviceStatusesRepository::new(pool.clone()),
            phone_models: phone_models::PhoneModelsRepository::new(pool.clone()),
            sales: sales::SalesRepository::new(pool.clone()),
            reports: reports::ReportsRepository::new(pool.clone()),
            audit: audit::AuditRepository::new(pool.clone()),
            configurations: configurations::ConfigurationsRepository::new(pool.clone()),
            pool,
        }
    }
}
