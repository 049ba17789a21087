//! Application configuration endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::configuration::Configuration};

use super::AuthenticatedUser;

/// Update configuration request
#[derive(Deserialize, ToSchema)]
pub struct UpdateConfigurationRequest {
    /// New value for the configuration key
    pub value: String,
}

/// List configuration entries
#[utoipa::path(
    get,
    path = "/settings",
    tag = "settings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Configuration entries", body = Vec<Configuration>),
        (status = 403, description = "Missing config:manage permission")
    )
)]
pub async fn list_settings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Configuration>>> {
    let caller = claims.into_caller();

    let configurations = state.services.settings.list(&caller).await?;
    Ok(Json(configurations))
}

/// Update one configuration value
#[utoipa::path(
    put,
    path = "/settings/{key}",
    tag = "settings",
    security(("bearer_auth" = [])),
    params(
        ("key" = String, Path, description = "Configuration key")
    ),
    request_body = UpdateConfigurationRequest,
    responses(
        (status = 200, description = "Configuration updated", body = Configuration),
        (status = 403, description = "Key is not editable or permission missing"),
        (status = 404, description = "Unknown configuration key")
    )
)]
pub async fn update_setting(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(key): Path<String>,
    Json(request): Json<UpdateConfigurationRequest>,
) -> AppResult<Json<Configuration>> {
    let caller = claims.into_caller();

    let configuration = state
        .services
        .settings
        .update(&caller, &key, &request.value)
        .await?;

    Ok(Json(configuration))
}
