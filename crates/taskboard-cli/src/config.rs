//! Command-line arguments
//!
//! Every connection setting can also come from the environment (or a `.env`
//! file loaded at startup).

use crate::commands::Command;
use clap::Parser;
use std::time::Duration;
use taskboard_client::ClientConfig;
use taskboard_sdk::{CacheConfig, SdkConfig};

/// Taskboard - workspaces, projects and tasks from the terminal
#[derive(Parser, Debug)]
#[command(name = "taskboard")]
#[command(about = "Command-line client for the Taskboard REST API")]
pub struct Args {
    /// Base URL of the REST API
    #[arg(long, env = "TASKBOARD_API_URL", default_value = "http://localhost:5000/api-v1")]
    pub api_url: String,

    /// Bearer token of the signed-in user
    #[arg(long, env = "TASKBOARD_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "TASKBOARD_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,

    /// Seconds before cached data is refetched
    #[arg(long, env = "TASKBOARD_STALE_SECS", default_value = "30")]
    pub stale_secs: u64,

    /// Public URL of the web app, used for invite links
    #[arg(long, env = "TASKBOARD_APP_URL")]
    pub app_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn sdk_config(&self) -> SdkConfig {
        SdkConfig {
            client: ClientConfig {
                base_url: self.api_url.clone(),
                token: self.token.clone(),
                timeout_secs: self.timeout_secs,
            },
            cache: CacheConfig {
                stale_time: Duration::from_secs(self.stale_secs),
                ..Default::default()
            },
            app_url: self.app_url.clone(),
        }
    }
}
