use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use farmhub_order::DeliveryFeeCorrector;
use farmhub_pricing::{calculate_fee, FeeQuote};
use farmhub_shared::{Customer, DeliveryRoute, Order};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct FixParams {
    #[serde(rename = "dryRun")]
    pub dry_run: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixResponse {
    pub success: bool,
    pub orders_checked: usize,
    pub orders_updated: usize,
    pub corrected_count: usize,
    pub skipped_count: usize,
    pub error_count: usize,
    pub dry_run: bool,
    pub logs: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub order: Order,
    pub customer: Option<Customer>,
    pub route: Option<DeliveryRoute>,
}

/// ANY /fix-order-delivery-fees
/// Recompute and correct delivery fees on every order.
pub async fn fix_order_delivery_fees(
    State(state): State<AppState>,
    method: Method,
    params: Result<Query<FixParams>, QueryRejection>,
) -> Result<Response, AppError> {
    if method == Method::OPTIONS {
        return Ok((StatusCode::OK, "ok").into_response());
    }
    let Query(params) = params.map_err(|e| AppError::ValidationError(e.body_text()))?;

    let mut config = state.corrector.clone();
    if let Some(dry_run) = params.dry_run {
        config.dry_run = config.dry_run || dry_run;
    }

    let corrector = DeliveryFeeCorrector::new(state.store.clone(), config);
    let report = corrector.correct_all().await?;

    Ok(Json(FixResponse {
        success: true,
        orders_checked: report.orders_checked,
        orders_updated: report.orders_updated(),
        corrected_count: report.corrected_count,
        skipped_count: report.skipped_count,
        error_count: report.error_count,
        dry_run: report.dry_run,
        logs: report.logs,
    })
    .into_response())
}

/// POST /v1/delivery-fees/quote
/// Price delivery for an order without touching the store.
pub async fn quote_delivery_fee(Json(req): Json<QuoteRequest>) -> Result<Json<FeeQuote>, AppError> {
    let customer = req.customer.as_ref();
    // A route that is not the customer's route is no route at all
    let route = req
        .route
        .as_ref()
        .filter(|r| customer.and_then(|c| c.delivery_route_id) == Some(r.id));

    let quote = calculate_fee(&req.order, customer, route)
        .map_err(|e| AppError::ValidationError(e.to_string()))?;
    Ok(Json(quote))
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
