use axum::{
    http::{header, HeaderName, Method},
    routing::{any, get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod batch;
pub mod delivery_fees;
pub mod error;
pub mod state;
pub mod telemetry;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // Browser clients call the batch endpoint directly
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("apikey"),
            HeaderName::from_static("x-client-info"),
        ]);

    Router::new()
        .route("/health", get(delivery_fees::health))
        .route("/fix-order-delivery-fees", any(delivery_fees::fix_order_delivery_fees))
        .route(
            "/functions/v1/fix-order-delivery-fees",
            any(delivery_fees::fix_order_delivery_fees),
        )
        .route("/v1/delivery-fees/quote", post(delivery_fees::quote_delivery_fee))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
