//! Business logic services

pub mod audit;
pub mod devices;
pub mod email;
pub mod reports;
pub mod sales;
pub mod settings;

use crate::{config::EmailConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub devices: devices::DevicesService,
    pub sales: sales::SalesService,
    pub reports: reports::ReportsService,
    pub audit: audit::AuditService,
    pub email: email::EmailService,
    pub settings: settings::SettingsService,
}

impl Services {
    /// Create all services with the given repository
    pub async fn new(repository: Repository, email_config: EmailConfig) -> AppResult<Self> {
        let audit = audit::AuditService::new(repository.clone());
        let email = email::EmailService::new(email_config);
        let settings = settings::SettingsService::new(repository.clone(), audit.clone());

        // Warm the settings cache up front; a deployment missing its
        // configurations table should fail here, not mid-request
        settings.refresh().await?;

        Ok(Self {
            devices: devices::DevicesService::new(repository.clone(), audit.clone()),
            sales: sales::SalesService::new(
                repository.clone(),
                audit.clone(),
                email.clone(),
                settings.clone(),
            ),
            reports: reports::ReportsService::new(repository),
            audit,
            email,
            settings,
        })
    }
}
