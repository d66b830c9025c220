//! Continuous double-auction order matching engine for a single fungible
//! instrument.
//!
//! # Architecture
//!
//! Two [`book::PriorityBook`]s (one per side) sit behind independent locks
//! inside an [`engine::Engine`]. Producers call [`engine::Engine::submit`],
//! which hands the order to a bounded or unbounded ingress channel; a single
//! ingestion worker ([`engine::Engine::run_ingestion`]) drains that channel
//! into the correct book. Independently, a matcher worker
//! ([`engine::Engine::run_matcher`]) wakes on a timer and repeatedly crosses
//! the top of each book, emitting trades to a [`sink::TradeSink`].
//!
//! ## Core Components
//!
//! - [`domain`] - `Order` and `Trade`
//! - [`book`] - `PriorityBook`, the array-embedded binary heap
//! - [`engine`] - ingestion, matching sweep, and the query surface
//! - [`sink`] - where completed trades go
//! - [`error`] - `MatchingError`
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use common::Side;
//! use config::MatchingConfig;
//! use matching_engine::{domain::Order, engine::Engine, sink::LoggingTradeSink};
//!
//! # async fn run() {
//! let (engine, rx) = Engine::new(&MatchingConfig::default(), Arc::new(LoggingTradeSink));
//! let cancel = tokio_util::sync::CancellationToken::new();
//! tokio::spawn(engine.clone().run_ingestion(rx, cancel.clone()));
//! tokio::spawn(engine.clone().run_matcher(cancel.clone()));
//!
//! engine.submit(Order::new(1, Side::Buy, 100.0, 5)).await.unwrap();
//! engine.submit(Order::new(2, Side::Sell, 100.0, 5)).await.unwrap();
//! # }
//! ```

pub mod book;
pub mod domain;
pub mod engine;
pub mod error;
pub mod sink;

#[cfg(feature = "api")]
pub mod api;

pub use book::PriorityBook;
pub use domain::{Order, Trade};
pub use engine::{Engine, IngressReceiver};
pub use error::MatchingError;
pub use sink::{LoggingTradeSink, TradeSink};
