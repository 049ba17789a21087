//! Sale commitment endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::sale::{CompletedSale, SaleItemInput},
};

use super::AuthenticatedUser;

/// Create sale request
#[derive(Deserialize, Validate, ToSchema)]
pub struct CreateSaleRequest {
    /// Devices being sold with the price charged for each
    pub items: Vec<SaleItemInput>,
    /// Customer's name
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,
    /// Customer's email, for the receipt (optional)
    #[validate(email(message = "Customer email is invalid"))]
    pub customer_email: Option<String>,
    /// Customer's phone number (optional)
    pub customer_phone: Option<String>,
}

/// Sale creation response
#[derive(Serialize, ToSchema)]
pub struct CreateSaleResponse {
    /// Status message with the receipt number
    pub message: String,
    /// The committed sale with its line items
    #[serde(flatten)]
    pub sale: CompletedSale,
}

/// Commit a sale
#[utoipa::path(
    post,
    path = "/sales",
    tag = "sales",
    security(("bearer_auth" = [])),
    request_body = CreateSaleRequest,
    responses(
        (status = 201, description = "Sale committed", body = CreateSaleResponse),
        (status = 400, description = "Empty items, missing customer name, or duplicate device"),
        (status = 403, description = "Missing sale:create permission"),
        (status = 409, description = "A device is sold, foreign-assigned, or does not exist")
    )
)]
pub async fn create_sale(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateSaleRequest>,
) -> AppResult<(StatusCode, Json<CreateSaleResponse>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let caller = claims.into_caller();

    let sale = state
        .services
        .sales
        .commit_sale(
            &caller,
            &request.items,
            &request.customer_name,
            request.customer_email,
            request.customer_phone,
        )
        .await?;

    let message = format!(
        "Sale completed successfully. Receipt No: {}",
        sale.sale.receipt_no
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateSaleResponse { message, sale }),
    ))
}

/// Get a committed sale with its line items
#[utoipa::path(
    get,
    path = "/sales/{id}",
    tag = "sales",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Sale ID")
    ),
    responses(
        (status = 200, description = "Sale details", body = CompletedSale),
        (status = 403, description = "Not the seller and missing sale:view_all permission"),
        (status = 404, description = "Sale not found")
    )
)]
pub async fn get_sale(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(sale_id): Path<Uuid>,
) -> AppResult<Json<CompletedSale>> {
    let caller = claims.into_caller();

    let sale = state.services.sales.get_sale(&caller, sale_id).await?;
    Ok(Json(sale))
}
