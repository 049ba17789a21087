//! Device inventory endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::device::{Device, ScanItem},
};

use super::AuthenticatedUser;

/// Bulk intake request: one entry per scanned device
#[derive(Deserialize, ToSchema)]
pub struct BulkIntakeRequest {
    /// Scanned `(imei, model)` pairs
    pub scans: Vec<ScanItem>,
}

/// Bulk intake result
#[derive(Serialize, ToSchema)]
pub struct BulkIntakeResponse {
    /// Number of devices in the scanned batch
    pub scanned_count: usize,
    /// Number of devices actually added (pre-existing IMEIs are skipped)
    pub accepted_count: u64,
    /// Status message
    pub message: String,
}

/// Bulk assignment request
#[derive(Deserialize, ToSchema)]
pub struct AssignDevicesRequest {
    /// IMEIs of the devices to (un)assign
    pub imeis: Vec<String>,
    /// Seller to assign the devices to; omit to unassign
    pub assign_to_user_id: Option<Uuid>,
}

/// Bulk assignment result
#[derive(Serialize, ToSchema)]
pub struct AssignDevicesResponse {
    /// Number of device rows updated
    pub updated_count: u64,
    /// Status message
    pub message: String,
}

/// Query parameters for the assigned-devices listing
#[derive(Deserialize, IntoParams)]
pub struct AssignedQuery {
    /// View another user's list (inventory managers only)
    pub user_id: Option<Uuid>,
}

/// Take a single scanned device into stock
#[utoipa::path(
    post,
    path = "/devices",
    tag = "devices",
    security(("bearer_auth" = [])),
    request_body = ScanItem,
    responses(
        (status = 201, description = "Device added", body = Device),
        (status = 400, description = "Blank IMEI or unknown model"),
        (status = 403, description = "Missing inventory:manage permission"),
        (status = 409, description = "A device with that IMEI already exists")
    )
)]
pub async fn add_device(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<ScanItem>,
) -> AppResult<(StatusCode, Json<Device>)> {
    let caller = claims.into_caller();

    let device = state.services.devices.add_device(&caller, &request).await?;
    Ok((StatusCode::CREATED, Json(device)))
}

/// Take a batch of scanned devices into stock
#[utoipa::path(
    post,
    path = "/devices/bulk-stock-update",
    tag = "devices",
    security(("bearer_auth" = [])),
    request_body = BulkIntakeRequest,
    responses(
        (status = 201, description = "Batch processed", body = BulkIntakeResponse),
        (status = 400, description = "Empty batch, in-batch duplicate IMEI, or unknown model"),
        (status = 403, description = "Missing inventory:manage permission")
    )
)]
pub async fn bulk_stock_update(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<BulkIntakeRequest>,
) -> AppResult<(StatusCode, Json<BulkIntakeResponse>)> {
    let caller = claims.into_caller();
    let scanned_count = request.scans.len();

    let accepted_count = state
        .services
        .devices
        .bulk_intake(&caller, &request.scans)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BulkIntakeResponse {
            scanned_count,
            accepted_count,
            message: format!("{} new device(s) added to stock", accepted_count),
        }),
    ))
}

/// Assign or unassign devices to a seller
#[utoipa::path(
    post,
    path = "/devices/assign",
    tag = "devices",
    security(("bearer_auth" = [])),
    request_body = AssignDevicesRequest,
    responses(
        (status = 200, description = "Devices updated", body = AssignDevicesResponse),
        (status = 400, description = "Empty IMEI list"),
        (status = 403, description = "Missing device:assign permission")
    )
)]
pub async fn assign_devices(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<AssignDevicesRequest>,
) -> AppResult<Json<AssignDevicesResponse>> {
    let caller = claims.into_caller();

    let updated_count = state
        .services
        .devices
        .assign_devices(&caller, &request.imeis, request.assign_to_user_id)
        .await?;

    let verb = if request.assign_to_user_id.is_some() {
        "assigned"
    } else {
        "unassigned"
    };

    Ok(Json(AssignDevicesResponse {
        updated_count,
        message: format!("{} device(s) successfully {}", updated_count, verb),
    }))
}

/// List devices assigned to a seller
#[utoipa::path(
    get,
    path = "/devices/assigned",
    tag = "devices",
    security(("bearer_auth" = [])),
    params(AssignedQuery),
    responses(
        (status = 200, description = "Assigned devices", body = Vec<Device>),
        (status = 403, description = "Missing device:view permission")
    )
)]
pub async fn list_assigned(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<AssignedQuery>,
) -> AppResult<Json<Vec<Device>>> {
    let caller = claims.into_caller();

    let devices = state
        .services
        .devices
        .list_assigned(&caller, query.user_id)
        .await?;

    Ok(Json(devices))
}

/// Look up a device by IMEI
#[utoipa::path(
    get,
    path = "/devices/{imei}",
    tag = "devices",
    security(("bearer_auth" = [])),
    params(
        ("imei" = String, Path, description = "Device IMEI")
    ),
    responses(
        (status = 200, description = "Device found", body = Device),
        (status = 404, description = "No device with that IMEI")
    )
)]
pub async fn get_device(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(imei): Path<String>,
) -> AppResult<Json<Device>> {
    let caller = claims.into_caller();

    if imei.trim().is_empty() {
        return Err(AppError::Validation("IMEI is required".to_string()));
    }

    let device = state.services.devices.find_by_imei(&caller, &imei).await?;
    Ok(Json(device))
}
