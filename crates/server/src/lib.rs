//! HTTP server infrastructure for OpenExchange
//!
//! This crate provides an Axum-based HTTP server with a small trait-based
//! lifecycle ([`Server`]/[`ServerExt`]) and graceful shutdown coordinated
//! through a `CancellationToken`.
//!
//! # Quick Start
//!
//! ```ignore
//! use server::{HttpServer, ServerConfig, Server, ServerExt};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::new("0.0.0.0", 8080);
//!     let server = HttpServer::simple(config);
//!
//!     server.run_with_ctrl_c().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`config`] - HTTP bind settings
//! - [`traits`] - `Server` and `ServerExt` traits
//! - [`http`] - HTTP server using Axum
//! - [`shutdown`] - Graceful shutdown utilities

pub mod config;
pub mod error;
pub mod http;
pub mod shutdown;
pub mod traits;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use http::{simple_health_handler, HttpServer};
pub use shutdown::{shutdown_signal, ShutdownController};
pub use traits::{Server, ServerExt};
