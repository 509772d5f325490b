//! SDK configuration

use crate::error::{Result, SdkError};
use std::str::FromStr;
use std::time::Duration;
use taskboard_client::ClientConfig;

/// Entity cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Age after which a cached value is refetched on the next read
    pub stale_time: Duration,
    /// Capacity of the change-event channel shared by subscribers
    pub event_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(30),
            event_capacity: 256,
        }
    }
}

impl CacheConfig {
    /// Create from environment variables.
    ///
    /// Unset variables keep their defaults; set-but-invalid numbers are errors.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(secs) = env_number::<u64>("TASKBOARD_STALE_SECS")? {
            config.stale_time = Duration::from_secs(secs);
        }

        if let Some(capacity) = env_number::<usize>("TASKBOARD_EVENT_CAPACITY")? {
            config.event_capacity = capacity.max(1);
        }

        Ok(config)
    }
}

fn env_number<T: FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(val) => parse_number(name, &val).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_number<T: FromStr>(name: &str, val: &str) -> Result<T> {
    val.trim()
        .parse()
        .map_err(|_| SdkError::Config(format!("{}: invalid number '{}'", name, val)))
}

/// Everything needed to build a `TaskboardClient` over HTTP
#[derive(Debug, Clone, Default)]
pub struct SdkConfig {
    pub client: ClientConfig,
    pub cache: CacheConfig,
    /// Public URL of the web app, used to build invite links
    pub app_url: Option<String>,
}

impl SdkConfig {
    /// Create from environment variables.
    ///
    /// Unset variables keep their defaults; set-but-invalid numbers are errors.
    pub fn from_env() -> Result<Self> {
        let mut config = Self {
            cache: CacheConfig::from_env()?,
            ..Default::default()
        };

        if let Ok(url) = std::env::var("TASKBOARD_API_URL") {
            config.client.base_url = url;
        }

        if let Ok(token) = std::env::var("TASKBOARD_TOKEN") {
            if !token.is_empty() {
                config.client.token = Some(token);
            }
        }

        if let Some(secs) = env_number("TASKBOARD_TIMEOUT_SECS")? {
            config.client.timeout_secs = secs;
        }

        if let Ok(url) = std::env::var("TASKBOARD_APP_URL") {
            config.app_url = Some(url);
        }

        Ok(config)
    }

    /// Shareable link that joins a workspace
    pub fn invite_link(&self, workspace_id: &str) -> Option<String> {
        self.app_url
            .as_deref()
            .map(|base| format!("{}/workspace-invite/{}", base.trim_end_matches('/'), workspace_id))
    }
}
