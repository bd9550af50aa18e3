use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use tincan_server::config::Config;
use tincan_server::server::{AppState, router};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let state = AppState::new();
    let app = router(state);

    let addr: SocketAddr = config.listen_addr().parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {} (signaling at /ws)", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
