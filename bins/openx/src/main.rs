//! `openx`: process entry point for the matching engine.
//!
//! Wires together configuration loading, structured logging, the
//! [`matching_engine::Engine`] and its two long-lived workers, and the
//! reference HTTP adapter, then runs until a shutdown signal arrives.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use cli::{Cli, Commands};
use config::{generate_default_config, load_config, save_config, validate_config, EngineConfig};
use matching_engine::api::create_router;
use matching_engine::{Engine, LoggingTradeSink};
use observability::{init_logging, LogFormat};
use server::{HttpServer, ServerConfig, ServerExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Start { config, http } => start(config, http).await,
        Commands::Validate { config } => validate(config).await,
        Commands::Init { output } => init(output).await,
    }
}

/// `openx start`: load and validate configuration, then run the engine and
/// its HTTP adapter until interrupted.
async fn start<P: AsRef<Path>>(config_path: P, http_override: Option<u16>) -> Result<()> {
    let config_path = config_path.as_ref();
    let mut engine_config = load_config(config_path)
        .with_context(|| format!("failed to load configuration from {:?}", config_path))?;

    if let Some(port) = http_override {
        engine_config.http.port = port;
    }

    let log_format = LogFormat::parse(&engine_config.log_format).unwrap_or_default();
    init_logging(&engine_config.exchange.name, log_format)?;

    info!(path = ?config_path, "configuration loaded");

    let report = validate_config(&engine_config);
    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message, "configuration warning");
    }
    if !report.is_valid() {
        for err in &report.errors {
            error!("{}", err);
        }
        anyhow::bail!("cannot start exchange: configuration is invalid");
    }

    run_engine(engine_config).await
}

/// Builds the engine, spawns its ingestion and matcher workers, serves the
/// HTTP adapter, and blocks until Ctrl+C, then shuts every task down.
async fn run_engine(config: EngineConfig) -> Result<()> {
    let sink = Arc::new(LoggingTradeSink);
    let (engine, ingress_rx) = Engine::new(&config.matching, sink);
    let cancel = CancellationToken::new();

    let ingestion = tokio::spawn(engine.clone().run_ingestion(ingress_rx, cancel.clone()));
    let matcher = tokio::spawn(engine.clone().run_matcher(cancel.clone()));

    let router = create_router(engine.clone());
    let server_config = ServerConfig::new(config.http.host.clone(), config.http.port);
    let http_server = HttpServer::new(server_config, router);

    info!(
        host = %config.http.host,
        port = config.http.port,
        "matching engine HTTP adapter starting"
    );

    let result = http_server.run_with_ctrl_c().await;

    info!("shutdown signal received, stopping matching engine workers");
    cancel.cancel();
    let _ = ingestion.await;
    let _ = matcher.await;

    result.context("HTTP adapter exited with an error")
}

/// `openx validate`: load the configuration and report errors/warnings
/// without starting anything.
async fn validate<P: AsRef<Path>>(config_path: P) -> Result<()> {
    let config_path = config_path.as_ref();
    debug!(path = ?config_path, "validating configuration");

    let config = load_config(config_path)
        .with_context(|| format!("failed to load configuration from {:?}", config_path))?;
    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.defaults_applied.is_empty() {
        println!("Defaults Applied ({}):", report.defaults_applied.len());
        for default in &report.defaults_applied {
            println!("  [info] {} = {}", default.field, default.value);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Exchange: {}", config.exchange.name);
    println!("Environment: {}", config.exchange.environment);
    println!(
        "Matching: ingress_capacity={} sweep_interval_ms={} trade_price_rule={}",
        config.matching.ingress_capacity,
        config.matching.sweep_interval_ms,
        config.matching.trade_price_rule,
    );
    println!("HTTP: {}:{}", config.http.host, config.http.port);

    Ok(())
}

/// `openx init`: write a fresh configuration file populated with defaults.
async fn init<P: AsRef<Path>>(output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    debug!(path = ?output_path, "initializing new configuration file");

    let config = generate_default_config();

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {:?}", parent))?;
        }
    }

    save_config(&config, output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!(
        "Next: run `openx validate --config {:?}` then `openx start --config {:?}`",
        output_path, output_path
    );

    Ok(())
}
