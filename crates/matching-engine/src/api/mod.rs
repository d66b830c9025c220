//! HTTP adapter for the matching engine. A reference wiring of the engine
//! over HTTP, not the definition of its behavior.

pub mod handlers;
pub mod routes;

pub use handlers::{ApiState, OrderResponse, OrderWire, OrdersResponse};
pub use routes::create_router;
