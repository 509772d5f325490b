//! Taskboard SDK
//!
//! Client-side data layer for the Taskboard REST API.
//!
//! # Architecture
//!
//! - **Gateway**: the remote source of truth, behind the `Gateway` trait
//! - **Entity cache**: keyed query results with coalescing, prefix
//!   invalidation and change subscriptions
//! - **Mutation executor**: validate, write once, invalidate affected keys
//! - **View projector**: filter, search, sort and board grouping of tasks,
//!   plus progress and member search
//!
//! # Example
//!
//! ```rust,ignore
//! use taskboard_sdk::{MockGateway, QueryKey, SdkConfig, TaskboardClient};
//! use std::sync::Arc;
//!
//! let gateway = Arc::new(MockGateway::new().with_response(QueryKey::Workspaces, json!([])));
//! let client = TaskboardClient::new(gateway, SdkConfig::default());
//!
//! let workspaces = client.workspaces().await?;
//! ```

// Structured query keys and the entity cache
pub mod cache;

// High-level client
pub mod client;

// Configuration
pub mod config;

// Error types
pub mod error;

// Gateway trait and implementations
pub mod gateway;

// Writes and invalidation
pub mod mutation;

// Role checks
pub mod permissions;

// Signed-in user
pub mod session;

// Form validation
pub mod validation;

// Task list projection
pub mod view;

pub use cache::{
    CacheEvent, CacheEventKind, EntityCache, KeyPrefix, QueryKey, QuerySnapshot, QueryStatus,
    Subscription,
};
pub use client::TaskboardClient;
pub use config::{CacheConfig, SdkConfig};
pub use error::{Result, SdkError};
pub use gateway::{Gateway, HttpGateway, MockGateway};
pub use mutation::{Mutation, MutationExecutor, MutationOutcome};
pub use permissions::{Action, RoleEnforcer};
pub use session::Session;
pub use validation::{Validate, ValidationErrors};
pub use view::{
    project_progress, Board, GroupBy, ProjectOverview, SortDirection, StatusCounts, TaskFilter,
    ViewParams, ViewResult,
};
