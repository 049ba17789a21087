//! Sale commitment service

use std::collections::HashSet;

use serde_json::json;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        device_status::STATUS_SOLD,
        sale::{CompletedSale, NewSale, SaleItemInput},
        user::{permissions, Caller},
    },
    repository::Repository,
    services::{audit::AuditService, email::EmailService, settings::SettingsService},
};

#[derive(Clone)]
pub struct SalesService {
    repository: Repository,
    audit: AuditService,
    email: EmailService,
    settings: SettingsService,
}

impl SalesService {
    pub fn new(
        repository: Repository,
        audit: AuditService,
        email: EmailService,
        settings: SettingsService,
    ) -> Self {
        Self {
            repository,
            audit,
            email,
            settings,
        }
    }

    /// Commit a sale: validate the request, run the atomic commitment
    /// transaction, then hand off audit and receipt delivery in the
    /// background. The sale is final once this returns; neither a failed
    /// audit write nor a failed email can reverse it.
    pub async fn commit_sale(
        &self,
        caller: &Caller,
        items: &[SaleItemInput],
        customer_name: &str,
        customer_email: Option<String>,
        customer_phone: Option<String>,
    ) -> AppResult<CompletedSale> {
        caller.require(permissions::CREATE_SALE)?;

        if items.is_empty() {
            return Err(AppError::Validation("Sale items are required".to_string()));
        }
        if customer_name.trim().is_empty() {
            return Err(AppError::Validation("Customer name is required".to_string()));
        }
        if let Some(device_id) = first_duplicate_device(items) {
            return Err(AppError::Validation(format!(
                "Device {} appears more than once in the sale",
                device_id
            )));
        }
        if let Some(item) = items.iter().find(|i| i.sale_price.is_sign_negative()) {
            return Err(AppError::Validation(format!(
                "Sale price for device {} cannot be negative",
                item.device_id
            )));
        }

        let sold = self
            .repository
            .device_statuses
            .find_by_name(STATUS_SOLD)
            .await?
            .ok_or_else(|| {
                AppError::Configuration(format!(
                    "System status \"{}\" is not configured. Cannot complete sale.",
                    STATUS_SOLD
                ))
            })?;

        let new_sale = NewSale {
            customer_name: customer_name.trim().to_string(),
            customer_email,
            customer_phone,
            sold_by_user_id: caller.user_id,
        };

        let completed = self
            .repository
            .sales
            .create_sale(&new_sale, items, sold.id)
            .await?;

        self.audit.log_action(
            "SALE_COMPLETED",
            caller.user_id,
            "Sale",
            Some(completed.sale.id),
            json!({
                "receipt_no": completed.sale.receipt_no,
                "total_amount": completed.sale.total_amount,
                "items_count": completed.items.len(),
            }),
        );

        if let Some(email) = completed.sale.customer_email.clone() {
            self.spawn_receipt_email(completed.sale.id, email);
        }

        Ok(completed)
    }

    /// Get a committed sale with its line items. Sellers see their own
    /// sales; viewing someone else's requires the view-all permission.
    pub async fn get_sale(&self, caller: &Caller, sale_id: Uuid) -> AppResult<CompletedSale> {
        let sale = self.repository.sales.get_by_id(sale_id).await?;

        if sale.sold_by_user_id != caller.user_id {
            caller.require(permissions::VIEW_ALL_SALES)?;
        }

        let items = self.repository.sales.get_items(sale_id).await?;

        Ok(CompletedSale { sale, items })
    }

    /// Deliver the receipt email on a background task. Runs entirely
    /// outside the sale transaction; a delivery failure is logged and
    /// dropped, success flips the sale's `email_sent` flag.
    fn spawn_receipt_email(&self, sale_id: Uuid, to: String) {
        let repository = self.repository.clone();
        let email = self.email.clone();
        let settings = self.settings.clone();

        tokio::spawn(async move {
            let result = async {
                let sale = repository.sales.get_by_id(sale_id).await?;
                let items = repository.sales.get_items(sale_id).await?;
                let shop_name = settings.get_or("COMPANY_NAME", "Dukani").await;

                email.send_receipt(&to, &sale, &items, &shop_name).await?;
                repository.sales.mark_email_sent(sale_id).await
            }
            .await;

            if let Err(e) = result {
                tracing::error!("Background receipt email failed for sale {}: {}", sale_id, e);
            }
        });
    }
}

/// First device ID that appears more than once in the request, if any. The
/// commitment transaction compares requested and fetched row counts, so a
/// duplicated ID must be rejected up front.
fn first_duplicate_device(items: &[SaleItemInput]) -> Option<Uuid> {
    let mut seen: HashSet<Uuid> = HashSet::with_capacity(items.len());
    items
        .iter()
        .map(|i| i.device_id)
        .find(|id| !seen.insert(*id))
}
