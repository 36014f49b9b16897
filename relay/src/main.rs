//! Push Notification Relay
//!
//! Stores Expo push tokens for users and dietitians and fans notifications
//! out to them:
//! 1. `POST /api/save-push-token` registers a device token
//! 2. `POST /api/send-notification` delivers to one identity or to
//!    `all-dietitians`
//!
//! Usage:
//!   pushrelay --port 3000
//!
//! Tokens are held in memory and are lost on restart.

use std::sync::Arc;
use anyhow::{Context, Result};
use clap::Parser;
use pushrelay_delivery::{
    DeliveryConfig, ExpoClient, ExpoConfig, MemoryRegistry, Orchestrator, DEFAULT_SOUND,
    MAX_PUSH_BATCH_SIZE,
};
use pushrelay::build_router;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "pushrelay")]
#[command(about = "Push notification relay for users and dietitians")]
struct Args {
    /// HTTP port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Address to bind the HTTP listener to
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// Base URL of the Expo push service
    #[arg(long, env = "EXPO_API_URL", default_value = "https://exp.host")]
    expo_url: String,

    /// Expo access token, if push security is enabled for the project
    #[arg(long, env = "EXPO_ACCESS_TOKEN", hide_env_values = true)]
    expo_access_token: Option<String>,

    /// Maximum messages per provider request
    #[arg(long, default_value_t = MAX_PUSH_BATCH_SIZE)]
    batch_size: usize,

    /// Provider request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    info!("Push relay starting...");

    let provider = ExpoClient::new(ExpoConfig {
        api_base_url: args.expo_url.clone(),
        access_token: args.expo_access_token.clone(),
        timeout_secs: args.timeout_secs,
    })
    .context("Failed to create Expo client")?;

    let batch_size = args.batch_size.clamp(1, MAX_PUSH_BATCH_SIZE);
    let orchestrator = Arc::new(Orchestrator::new(
        Arc::new(MemoryRegistry::new()),
        Arc::new(provider),
        DeliveryConfig {
            max_batch_size: batch_size,
            sound: DEFAULT_SOUND.to_string(),
        },
    ));

    let app = build_router(orchestrator);
    let addr = format!("{}:{}", args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind HTTP listener on {}", addr))?;

    info!("Server running on port {}", args.port);
    info!("Expo endpoint: {} (batch size {})", args.expo_url, batch_size);

    axum::serve(listener, app).await.context("HTTP server failed")?;
    Ok(())
}
