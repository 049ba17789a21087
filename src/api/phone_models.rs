//! Catalog (phone model) endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::phone_model::{CreatePhoneModel, PhoneModel},
};

use super::AuthenticatedUser;

/// List catalog entries
#[utoipa::path(
    get,
    path = "/models",
    tag = "models",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Catalog entries", body = Vec<PhoneModel>)
    )
)]
pub async fn list_models(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<PhoneModel>>> {
    let caller = claims.into_caller();

    let models = state.services.devices.list_models(&caller).await?;
    Ok(Json(models))
}

/// Create a catalog entry
#[utoipa::path(
    post,
    path = "/models",
    tag = "models",
    security(("bearer_auth" = [])),
    request_body = CreatePhoneModel,
    responses(
        (status = 201, description = "Catalog entry created", body = PhoneModel),
        (status = 403, description = "Missing inventory:manage permission"),
        (status = 409, description = "A model with that name already exists")
    )
)]
pub async fn create_model(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreatePhoneModel>,
) -> AppResult<(StatusCode, Json<PhoneModel>)> {
    let caller = claims.into_caller();

    let model = state
        .services
        .devices
        .create_model(&caller, &request)
        .await?;

    Ok((StatusCode::CREATED, Json(model)))
}
