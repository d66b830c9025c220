//! Default values used by [`crate::parser::generate_default_config`] and by
//! `#[serde(default = "...")]` fields that need a value before validation
//! has a chance to run.

pub fn default_exchange_name() -> String {
    "My Exchange".to_string()
}

pub fn default_environment() -> String {
    "development".to_string()
}

pub fn default_ingress_capacity() -> usize {
    1024
}

pub fn default_sweep_interval_ms() -> u64 {
    50
}

pub fn default_trade_price_rule() -> String {
    "maker".to_string()
}

pub fn default_http_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_http_port() -> u16 {
    8080
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}
