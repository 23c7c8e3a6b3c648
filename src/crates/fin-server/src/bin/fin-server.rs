//! Standalone control-plane binary: loads `RuntimeConfig`, wires the
//! in-memory backends, and serves the fixed route table.

use fin_server::routes::create_router;
use fin_server::runtime::build_app_state;
use fin_tooling::config::RuntimeConfig;
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = RuntimeConfig::from_env()?;
    fin_tooling::logging::init(&config);

    tracing::info!(checkpoint_backend = ?config.checkpoint_backend, artifact_backend = ?config.artifact_backend, "loaded runtime configuration");

    let state = build_app_state(&config)?;
    let router = create_router(state);

    let port: u16 = std::env::var("PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(8080);
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let addr: SocketAddr = format!("{host}:{port}").parse()?;

    tracing::info!(%addr, "fin-server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
