//! Configuration for the matching engine process: exchange metadata,
//! matching settings, and the HTTP adapter's bind address.
//!
//! Loaded from YAML with `${VAR}` / `$VAR` environment-variable
//! substitution (see [`substitution`]), then checked with
//! [`validator::validate_config`], which returns a report of errors,
//! warnings, and defaults applied rather than failing on the first
//! problem.

use serde::{Deserialize, Serialize};

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

/// Top-level configuration document for the `openx` process.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    pub exchange: ExchangeConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            exchange: ExchangeConfig::default(),
            matching: MatchingConfig::default(),
            http: HttpConfig::default(),
            log_format: default_log_format(),
        }
    }
}

/// Identifying metadata for the exchange instance. Does not affect matching
/// behavior; surfaced in logs and the `/health` endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExchangeConfig {
    #[serde(default = "default_exchange_name")]
    pub name: String,
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            name: default_exchange_name(),
            environment: default_environment(),
        }
    }
}

/// Tunables for the matching core: ingress channel capacity, matcher
/// sweep cadence, and trade pricing rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchingConfig {
    /// Capacity of the ingress channel. `0` means unbounded.
    #[serde(default = "default_ingress_capacity")]
    pub ingress_capacity: usize,
    /// Sleep between matcher sweeps when nothing crossed, in milliseconds.
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,
    /// Which side's price a trade is recorded at. Only `"maker"` is
    /// implemented.
    #[serde(default = "default_trade_price_rule")]
    pub trade_price_rule: String,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            ingress_capacity: default_ingress_capacity(),
            sweep_interval_ms: default_sweep_interval_ms(),
            trade_price_rule: default_trade_price_rule(),
        }
    }
}

/// HTTP adapter bind settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    #[serde(default = "default_http_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_http_host(),
            port: default_http_port(),
        }
    }
}
