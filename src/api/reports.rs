//! Reporting endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::AppResult,
    models::report::{DailyProfit, StockReport},
};

use super::AuthenticatedUser;

/// Date range for the profit report, both bounds inclusive
#[derive(Deserialize, IntoParams)]
pub struct ProfitReportQuery {
    /// Range start, `YYYY-MM-DD`
    pub start_date: String,
    /// Range end, `YYYY-MM-DD`
    pub end_date: String,
}

/// Daily profit summary over a date range
#[utoipa::path(
    get,
    path = "/reports/profit",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(ProfitReportQuery),
    responses(
        (status = 200, description = "Daily sales and profit figures", body = Vec<DailyProfit>),
        (status = 400, description = "Malformed date or inverted range"),
        (status = 403, description = "Missing report:view_financial permission")
    )
)]
pub async fn get_profit_report(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<ProfitReportQuery>,
) -> AppResult<Json<Vec<DailyProfit>>> {
    let caller = claims.into_caller();

    let report = state
        .services
        .reports
        .profit_report(&caller, &query.start_date, &query.end_date)
        .await?;

    Ok(Json(report))
}

/// Current stock summary aggregated by catalog entry
#[utoipa::path(
    get,
    path = "/reports/stock",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Stock counts and value per model", body = Vec<StockReport>),
        (status = 403, description = "Missing report permission")
    )
)]
pub async fn get_stock_report(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<StockReport>>> {
    let caller = claims.into_caller();

    let report = state.services.reports.stock_report(&caller).await?;
    Ok(Json(report))
}
