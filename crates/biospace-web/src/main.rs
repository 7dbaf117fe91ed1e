//! BioSpace Explorer web server
//!
//! Run with: cargo run -p biospace-web

use std::net::SocketAddr;

use biospace_web::config::Config;
use biospace_web::router::build_router;
use biospace_web::state::AppState;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting BioSpace Explorer web server...");

    let config = Config::load()?;
    let state = AppState::from_config(&config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    info!(%addr, api = %config.api.base_url, "Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
