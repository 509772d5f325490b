//! Core trait for data gateways.
//!
//! The cache and the mutation executor only ever talk to a `Gateway`. The
//! HTTP implementation wraps the REST client; the mock serves canned values
//! in tests.

use crate::cache::QueryKey;
use crate::error::Result;
use crate::mutation::Mutation;
use async_trait::async_trait;
use serde_json::Value;

/// Source of truth for every cached query and every write.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Identifier for logs (e.g. base URL).
    fn id(&self) -> &str;

    /// Load the value behind a query key.
    async fn fetch(&self, key: &QueryKey) -> Result<Value>;

    /// Perform a write and return the entity the gateway answered with.
    async fn mutate(&self, mutation: &Mutation) -> Result<Value>;
}
