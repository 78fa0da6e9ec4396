use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = mock_bmc::config::Cli::parse();
    run_server(cli.config).await
}

async fn run_server(config: mock_bmc::config::Config) -> Result<()> {
    let _ = rustls::crypto::ring::default_provider().install_default();

    let catalog = Arc::new(mock_bmc::catalog::ResourceCatalog::new());
    let power = mock_bmc::power::PowerStateCell::new();

    let cert = mock_bmc::tls::load_or_generate(&config.cert_dir)?;
    let tls_config = Arc::new(mock_bmc::tls::build_rustls_config(&cert)?);

    let app = mock_bmc::http::build_router(catalog, power).layer(TraceLayer::new_for_http());

    info!(
        http_bind = %config.http_bind,
        https_bind = %config.https_bind,
        cert_dir = %config.cert_dir.display(),
        "starting mock-bmc"
    );

    let http_listener = tokio::net::TcpListener::bind(config.http_bind).await?;
    let https_listener = tokio::net::TcpListener::bind(config.https_bind).await?;

    let http = tokio::spawn(mock_bmc::server::serve_plaintext(http_listener, app.clone()));
    let https = tokio::spawn(mock_bmc::server::serve_tls(https_listener, tls_config, app));

    tokio::select! {
        res = http => res??,
        res = https => res??,
        _ = shutdown_signal() => {}
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).compact().init();
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
