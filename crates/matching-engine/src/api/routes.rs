//! HTTP routes for the matching engine reference adapter.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::*;

/// Routes:
/// - POST /orders              - submit an order
/// - GET  /orders               - both books, as arrays
/// - GET  /highest-buy-order    - top of the buy book, or 404
/// - GET  /highest-sell-order   - top of the sell book, or 404
/// - GET  /health               - liveness check
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/orders", post(submit_order).get(get_orders))
        .route("/highest-buy-order", get(highest_buy_order))
        .route("/highest-sell-order", get(highest_sell_order))
        .with_state(state)
}
