//! Device inventory service: bulk intake and assignment

use std::collections::{HashMap, HashSet};

use serde_json::json;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        device::{Device, NewDevice, ScanItem},
        device_status::STATUS_IN_STOCK,
        phone_model::{CreatePhoneModel, PhoneModel},
        user::{permissions, Caller},
    },
    repository::Repository,
    services::audit::AuditService,
};

#[derive(Clone)]
pub struct DevicesService {
    repository: Repository,
    audit: AuditService,
}

impl DevicesService {
    pub fn new(repository: Repository, audit: AuditService) -> Self {
        Self { repository, audit }
    }

    /// Take a single scanned device into stock. Unlike the bulk path, a
    /// pre-existing IMEI is a conflict here, not a silent skip.
    pub async fn add_device(&self, caller: &Caller, scan: &ScanItem) -> AppResult<Device> {
        caller.require(permissions::MANAGE_INVENTORY)?;

        if scan.imei.trim().is_empty() {
            return Err(AppError::Validation("IMEI is required".to_string()));
        }

        let model = match self.repository.phone_models.get_by_id(scan.model_id).await {
            Ok(model) => model,
            Err(AppError::NotFound(_)) => {
                return Err(AppError::Validation(format!(
                    "Phone model {} not found",
                    scan.model_id
                )))
            }
            Err(e) => return Err(e),
        };

        let in_stock = self
            .repository
            .device_statuses
            .find_by_name(STATUS_IN_STOCK)
            .await?
            .ok_or_else(|| {
                AppError::Configuration(format!(
                    "System status \"{}\" is not configured. Contact support.",
                    STATUS_IN_STOCK
                ))
            })?;

        let device = self
            .repository
            .devices
            .insert(
                &NewDevice {
                    model_id: model.id,
                    imei: scan.imei.clone(),
                    cost_price: model.default_cost_price,
                    selling_price: model.default_selling_price,
                    status_id: in_stock.id,
                },
                caller.user_id,
            )
            .await?;

        self.audit.log_action(
            "DEVICE_ADDED",
            caller.user_id,
            "Device",
            Some(device.id),
            json!({ "imei": device.imei, "model": model.name }),
        );

        Ok(device)
    }

    /// Take a batch of freshly scanned devices into stock.
    ///
    /// Every model reference is resolved against the catalog before any row
    /// is written, and each accepted row copies the catalog's default prices
    /// at that instant. IMEIs already in the store are skipped by the bulk
    /// insert, so the returned count may be lower than the batch size.
    pub async fn bulk_intake(&self, caller: &Caller, scans: &[ScanItem]) -> AppResult<u64> {
        caller.require(permissions::MANAGE_INVENTORY)?;

        if scans.is_empty() {
            return Err(AppError::Validation("Scan data array is required".to_string()));
        }

        if let Some(imei) = first_duplicate_imei(scans) {
            return Err(AppError::Validation(format!(
                "Duplicate IMEI {} detected in the scanned list. Please review and rescan.",
                imei
            )));
        }

        let in_stock = self
            .repository
            .device_statuses
            .find_by_name(STATUS_IN_STOCK)
            .await?
            .ok_or_else(|| {
                AppError::Configuration(format!(
                    "System status \"{}\" is not configured. Contact support.",
                    STATUS_IN_STOCK
                ))
            })?;

        let models = self.repository.phone_models.find_all().await?;
        let model_map: HashMap<Uuid, _> = models.iter().map(|m| (m.id, m)).collect();

        let mut rows: Vec<NewDevice> = Vec::with_capacity(scans.len());
        for scan in scans {
            let model = model_map.get(&scan.model_id).ok_or_else(|| {
                AppError::Validation(format!("Phone model {} not found", scan.model_id))
            })?;

            rows.push(NewDevice {
                model_id: model.id,
                imei: scan.imei.clone(),
                cost_price: model.default_cost_price,
                selling_price: model.default_selling_price,
                status_id: in_stock.id,
            });
        }

        let inserted = self
            .repository
            .devices
            .bulk_insert(&rows, caller.user_id)
            .await?;

        self.audit.log_action(
            "BULK_STOCK_ADDED",
            caller.user_id,
            "Device",
            None,
            json!({
                "total_scanned": scans.len(),
                "total_added": inserted,
            }),
        );

        Ok(inserted)
    }

    /// Assign (or with `assign_to = None`, unassign) a list of devices to a
    /// seller. Assignment is independent of sale eligibility; the ownership
    /// gate is enforced at sale time, not here.
    pub async fn assign_devices(
        &self,
        caller: &Caller,
        imeis: &[String],
        assign_to: Option<Uuid>,
    ) -> AppResult<u64> {
        caller.require(permissions::ASSIGN_DEVICES)?;

        if imeis.is_empty() {
            return Err(AppError::Validation("IMEI list cannot be empty".to_string()));
        }

        let updated = self
            .repository
            .devices
            .bulk_set_owner(imeis, assign_to)
            .await?;

        let action = if assign_to.is_some() {
            "DEVICE_ASSIGNED"
        } else {
            "DEVICE_UNASSIGNED"
        };

        self.audit.log_action(
            action,
            caller.user_id,
            "Device",
            None,
            json!({
                "count": updated,
                "assigned_to": assign_to,
                "imeis": imeis,
            }),
        );

        Ok(updated)
    }

    /// List devices assigned to a seller. Callers see their own list;
    /// inventory managers may name another user.
    pub async fn list_assigned(
        &self,
        caller: &Caller,
        target_user: Option<Uuid>,
    ) -> AppResult<Vec<Device>> {
        caller.require(permissions::VIEW_DEVICES)?;

        let user_id = match target_user {
            Some(id) if id != caller.user_id => {
                caller.require(permissions::MANAGE_INVENTORY)?;
                id
            }
            Some(id) => id,
            None => caller.user_id,
        };

        self.repository.devices.find_assigned_to(user_id).await
    }

    /// List all catalog entries
    pub async fn list_models(&self, caller: &Caller) -> AppResult<Vec<PhoneModel>> {
        caller.require(permissions::VIEW_DEVICES)?;
        self.repository.phone_models.find_all().await
    }

    /// Create a new catalog entry
    pub async fn create_model(
        &self,
        caller: &Caller,
        model: &CreatePhoneModel,
    ) -> AppResult<PhoneModel> {
        caller.require(permissions::MANAGE_INVENTORY)?;

        let created = self.repository.phone_models.create(model).await?;

        self.audit.log_action(
            "MODEL_CREATED",
            caller.user_id,
            "PhoneModel",
            Some(created.id),
            json!({ "name": created.name }),
        );

        Ok(created)
    }

    /// Look up a single device by IMEI
    pub async fn find_by_imei(&self, caller: &Caller, imei: &str) -> AppResult<Device> {
        caller.require(permissions::VIEW_DEVICES)?;

        self.repository
            .devices
            .find_by_imei(imei)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Device with IMEI {} not found", imei)))
    }
}

/// First IMEI that appears more than once in the batch, if any. Duplicates
/// inside one batch are a caller mistake, reported before any row is
/// written; duplicates against pre-existing stock are skipped silently by
/// the insert instead.
fn first_duplicate_imei(scans: &[ScanItem]) -> Option<&str> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(scans.len());
    scans
        .iter()
        .map(|s| s.imei.as_str())
        .find(|imei| !seen.insert(*imei))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(imei: &str) -> ScanItem {
        ScanItem {
            imei: imei.to_string(),
            model_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn detects_in_batch_duplicate() {
        let scans = vec![scan("351234"), scan("352222"), scan("351234")];
        assert_eq!(first_duplicate_imei(&scans), Some("351234"));
    }

    #[test]
    fn distinct_batch_passes() {
        let scans = vec![scan("351234"), scan("352222")];
        assert_eq!(first_duplicate_imei(&scans), None);
        assert_eq!(first_duplicate_imei(&[]), None);
    }
}
