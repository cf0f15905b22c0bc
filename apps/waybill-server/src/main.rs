//! Waybill server binary: configuration, logging and the HTTP listener.

mod config;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format as _, Yaml};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use waybill_db::TenantDbManager;

use config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "waybill-server", version, about = "Multi-tenant authentication backend")]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, default_value = "config/waybill.yaml")]
    config: PathBuf,

    /// Override the listen port from the configuration file.
    #[arg(short, long)]
    port: Option<u16>,

    /// Print the effective configuration and exit.
    #[arg(long)]
    print_config: bool,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default_directive = match verbose {
        0 => "info",
        1 => "debug,sqlx=info",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config: AppConfig = Figment::new()
        .merge(Yaml::file(&cli.config))
        .merge(Env::prefixed("WAYBILL__").split("__"))
        .extract()
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }
    run(config).await
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let manager = Arc::new(TenantDbManager::new(config.database.clone())?);
    let app = waybill_auth::rest_router(Arc::clone(&manager), &config.auth)
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid listen address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "waybill server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    manager.close_all().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "could not install the shutdown handler");
        return;
    }
    tracing::info!("shutdown signal received");
}
