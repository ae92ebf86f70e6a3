use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use menu_chat::api_connection::connection::OpenRouterChat;
use menu_chat::api_connection::endpoints::Provider;
use menu_chat::cli::parse_args;
use menu_chat::conversation::ConversationDriver;
use menu_chat::server::{build_router, AppState};
use menu_chat::telemetry::init_tracing;

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok(); // Load .env file for API keys

    init_tracing().context("Failed to initialize logging")?;
    let cli_args = parse_args();

    let provider = Provider::openrouter(&cli_args.api_key_env).with_base_url(&cli_args.base_url);
    let model = OpenRouterChat::new(
        provider,
        &cli_args.model,
        Duration::from_secs(cli_args.request_timeout_secs),
    )
    .context("Failed to build HTTP client for the model provider")?
    .with_temperature(cli_args.temperature)
    .with_max_tokens(cli_args.max_tokens);

    let driver = ConversationDriver::new(Arc::new(model));
    let app = build_router(AppState::new(driver));

    let address = cli_args.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind '{}'", address))?;
    info!(%address, model = %cli_args.model, "menu chat server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server terminated unexpectedly")?;

    Ok(())
}
