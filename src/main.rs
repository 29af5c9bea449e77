mod chat;
mod config;
mod server;
mod store;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::chat::{ChatProxy, GroqProvider};
use crate::config::Cli;
use crate::server::routes::build_routes;
use crate::server::state::AppState;
use crate::store::RecordStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the environment may already be set.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let store = RecordStore::new(&cli.data_dir);
    let provider = GroqProvider::new(&cli.api_key, &cli.model, &cli.api_base);
    let chat = ChatProxy::new(Arc::new(provider));
    info!(
        "Data directory {:?}, chat via {} ({})",
        store.data_dir(),
        chat.provider_name(),
        cli.model
    );

    let app = build_routes(AppState::new(store, chat));

    let addr = cli.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server is running on port {}", cli.port);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
