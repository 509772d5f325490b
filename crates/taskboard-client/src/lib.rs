//! Rust client for the Taskboard REST API
//!
//! Typed access to workspaces, projects, tasks, comments and activity.
//!
//! # Example
//!
//! ```rust,no_run
//! use taskboard_client::{ApiClient, ClientConfig, TaskStatus};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::new(ClientConfig {
//!     base_url: "http://localhost:5000/api-v1".into(),
//!     token: Some("secret".into()),
//!     ..Default::default()
//! })?;
//!
//! // Tasks assigned to me
//! let tasks = client.get_my_tasks().await?;
//!
//! // Move one forward
//! if let Some(task) = tasks.first() {
//!     client
//!         .update_task_field(&task.id, "status", TaskStatus::Done.as_str().into())
//!         .await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod types;

// Re-export main types
pub use client::ApiClient;
pub use error::{ClientError, Result};
pub use types::*;
