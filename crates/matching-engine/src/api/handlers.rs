//! HTTP handlers for the reference matching engine adapter.
//!
//! This module is a reference adapter, not the source of truth for engine
//! behavior: it exists to exercise [`Engine`] over HTTP. All input
//! validation happens here, before an order ever reaches
//! [`Engine::submit`].

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::Side;
use serde::{Deserialize, Serialize};

use crate::domain::Order;
use crate::engine::Engine;
use crate::error::MatchingError;

pub type ApiState = Arc<Engine>;

/// Wire representation of an order: `{ID:int, Type:"BUY"|"SELL",
/// Price:number, Amount:int}`. `Index` is accepted but never trusted; it
/// is the engine's own `heap_index` bookkeeping, not something a client
/// can set.
#[derive(Debug, Deserialize)]
pub struct OrderWire {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Type")]
    pub order_type: String,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "Amount")]
    pub amount: i64,
}

/// Wire representation of a resident order for `GET` responses. Mirrors
/// [`OrderWire`]'s field names so the schema is symmetric between requests
/// and responses.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Type")]
    pub order_type: String,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "Amount")]
    pub amount: u64,
    #[serde(rename = "Index")]
    pub index: i64,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            order_type: match order.side {
                Side::Buy => "BUY".to_string(),
                Side::Sell => "SELL".to_string(),
            },
            price: order.price,
            amount: order.amount,
            index: order.heap_index,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrdersResponse {
    pub buy_orders: Vec<OrderResponse>,
    pub sell_orders: Vec<OrderResponse>,
}

/// An adapter-level rejection. Carries its own HTTP status so malformed
/// input (400) and "book is empty" (404) render distinctly.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<MatchingError> for ApiError {
    fn from(error: MatchingError) -> Self {
        match error {
            MatchingError::InvalidOrder(_) => ApiError::bad_request(error.to_string()),
            MatchingError::Internal(_) => ApiError::internal(error.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
    }
}

fn parse_side(raw: &str) -> Result<Side, ApiError> {
    match raw {
        "BUY" => Ok(Side::Buy),
        "SELL" => Ok(Side::Sell),
        other => Err(ApiError::bad_request(format!(
            "Type must be \"BUY\" or \"SELL\", got {:?}",
            other
        ))),
    }
}

/// `POST /orders`
pub async fn submit_order(
    State(engine): State<ApiState>,
    Json(wire): Json<OrderWire>,
) -> Result<StatusCode, ApiError> {
    let side = parse_side(&wire.order_type)?;

    if !wire.price.is_finite() || wire.price <= 0.0 {
        return Err(ApiError::bad_request("Price must be a finite positive number"));
    }
    if wire.amount <= 0 {
        return Err(ApiError::bad_request("Amount must be a positive integer"));
    }

    let order = Order::new(wire.id, side, wire.price, wire.amount as u64);
    engine.submit(order).await?;

    Ok(StatusCode::CREATED)
}

/// `GET /orders`
pub async fn get_orders(State(engine): State<ApiState>) -> Json<OrdersResponse> {
    let (buys, sells) = engine.book_snapshot();
    Json(OrdersResponse {
        buy_orders: buys.into_iter().map(OrderResponse::from).collect(),
        sell_orders: sells.into_iter().map(OrderResponse::from).collect(),
    })
}

/// `GET /highest-buy-order`
pub async fn highest_buy_order(State(engine): State<ApiState>) -> Result<Json<OrderResponse>, ApiError> {
    engine
        .best_buy()
        .map(|order| Json(OrderResponse::from(order)))
        .ok_or_else(|| ApiError::not_found("buy book is empty"))
}

/// `GET /highest-sell-order`
pub async fn highest_sell_order(State(engine): State<ApiState>) -> Result<Json<OrderResponse>, ApiError> {
    engine
        .best_sell()
        .map(|order| Json(OrderResponse::from(order)))
        .ok_or_else(|| ApiError::not_found("sell book is empty"))
}

/// `GET /health`. Ambient liveness check, not part of the core contract.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_side_accepts_only_exact_casing() {
        assert!(matches!(parse_side("BUY"), Ok(Side::Buy)));
        assert!(matches!(parse_side("SELL"), Ok(Side::Sell)));
        assert!(parse_side("buy").is_err());
        assert!(parse_side("Buy").is_err());
        assert!(parse_side("").is_err());
    }

    #[test]
    fn order_response_round_trips_side_as_uppercase() {
        let order = Order::new(1, Side::Sell, 50.0, 3);
        let response = OrderResponse::from(order);
        assert_eq!(response.order_type, "SELL");
        assert_eq!(response.id, 1);
        assert_eq!(response.amount, 3);
    }

    #[test]
    fn order_wire_deserializes_expected_schema() {
        let wire: OrderWire =
            serde_json::from_str(r#"{"ID":1,"Type":"BUY","Price":100.5,"Amount":5}"#).unwrap();
        assert_eq!(wire.id, 1);
        assert_eq!(wire.order_type, "BUY");
        assert_eq!(wire.price, 100.5);
        assert_eq!(wire.amount, 5);
    }

    #[test]
    fn invalid_order_maps_to_bad_request() {
        let error: ApiError = MatchingError::InvalidOrder("bad order".to_string()).into();
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_error_maps_to_server_error() {
        let error: ApiError = MatchingError::Internal("ingress channel closed".to_string()).into();
        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
