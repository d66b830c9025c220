use crate::*;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ValidationError {
    #[error("Exchange name is required")]
    MissingExchangeName,

    #[error("{field} must be a positive integer")]
    InvalidPositiveInteger { field: String },

    #[error("Invalid trade_price_rule: {0}. Must be one of: maker")]
    InvalidTradePriceRule(String),

    #[error("Invalid log_format: {0}. Must be one of: pretty, json, compact")]
    InvalidLogFormat(String),

    #[error("http.port must not be 0")]
    InvalidHttpPort,
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct DefaultApplied {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub defaults_applied: Vec<DefaultApplied>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            defaults_applied: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_default(&mut self, field: &str, value: &str) {
        self.defaults_applied.push(DefaultApplied {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub fn validate_config(config: &EngineConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_exchange(&config.exchange, &mut report);
    validate_matching(&config.matching, &mut report);
    validate_http(&config.http, &mut report);

    if !["pretty", "json", "compact"].contains(&config.log_format.as_str()) {
        report.add_error(ValidationError::InvalidLogFormat(config.log_format.clone()));
    }

    report
}

fn validate_exchange(exchange: &ExchangeConfig, report: &mut ValidationReport) {
    if exchange.name.trim().is_empty() {
        report.add_error(ValidationError::MissingExchangeName);
    }
}

fn validate_matching(matching: &MatchingConfig, report: &mut ValidationReport) {
    if matching.sweep_interval_ms == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "matching.sweep_interval_ms".to_string(),
        });
    }

    if matching.trade_price_rule != "maker" {
        report.add_error(ValidationError::InvalidTradePriceRule(
            matching.trade_price_rule.clone(),
        ));
    }

    if matching.ingress_capacity == 0 {
        report.add_warning(
            "matching.ingress_capacity",
            "0 means an unbounded ingress channel; submit() will never apply backpressure",
        );
    }
}

fn validate_http(http: &HttpConfig, report: &mut ValidationReport) {
    if http.port == 0 {
        report.add_error(ValidationError::InvalidHttpPort);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let report = validate_config(&EngineConfig::default());
        assert!(report.is_valid(), "errors: {:?}", report.errors);
    }

    #[test]
    fn zero_sweep_interval_is_rejected() {
        let mut config = EngineConfig::default();
        config.matching.sweep_interval_ms = 0;
        let report = validate_config(&config);
        assert!(!report.is_valid());
    }

    #[test]
    fn blank_exchange_name_is_rejected() {
        let mut config = EngineConfig::default();
        config.exchange.name = "  ".to_string();
        let report = validate_config(&config);
        assert!(!report.is_valid());
    }
}
