//! taskboard: command-line client for the Taskboard REST API
//!
//! Reads go through the SDK's entity cache, writes through its mutation
//! executor, and lists are rendered with the same view projection a UI
//! would use.

mod commands;
mod config;
mod output;

use clap::Parser;
use taskboard_sdk::TaskboardClient;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    // Logs go to stderr so command output stays clean
    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "taskboard={0},taskboard_sdk={0},taskboard_client={0}",
                    log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!(api_url = %args.api_url, "starting");

    let client = TaskboardClient::from_config(args.sdk_config())?;
    commands::run(&client, args.command).await
}
