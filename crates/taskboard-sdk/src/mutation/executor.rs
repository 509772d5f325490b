//! Mutation execution
//!
//! Validate, write once through the gateway, then invalidate what the write
//! made stale. Nothing is invalidated unless the gateway confirmed success.

use super::request::Mutation;
use crate::cache::EntityCache;
use crate::error::{Result, SdkError};
use crate::gateway::Gateway;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of a mutation, ready for a notification
#[derive(Debug, Clone)]
pub enum MutationOutcome {
    /// Entity returned by the gateway
    Success(Value),
    /// What went wrong; `message` is shown to the user as-is
    Failure { message: String, error: SdkError },
}

impl MutationOutcome {
    fn failed(error: SdkError) -> Self {
        MutationOutcome::Failure {
            message: error.user_message(),
            error,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, MutationOutcome::Success(_))
    }

    /// Failure message, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            MutationOutcome::Success(_) => None,
            MutationOutcome::Failure { message, .. } => Some(message),
        }
    }

    pub fn into_result(self) -> Result<Value> {
        match self {
            MutationOutcome::Success(value) => Ok(value),
            MutationOutcome::Failure { error, .. } => Err(error),
        }
    }
}

/// Runs mutations against a gateway and keeps a cache consistent with them
#[derive(Clone)]
pub struct MutationExecutor {
    gateway: Arc<dyn Gateway>,
    cache: EntityCache,
}

impl MutationExecutor {
    pub fn new(gateway: Arc<dyn Gateway>, cache: EntityCache) -> Self {
        Self { gateway, cache }
    }

    pub async fn execute(&self, mutation: Mutation) -> MutationOutcome {
        let kind = mutation.kind();

        if let Err(errors) = mutation.validate() {
            warn!(mutation = kind, errors = %errors, "mutation rejected by validation");
            return MutationOutcome::failed(SdkError::Validation(errors));
        }

        match self.gateway.mutate(&mutation).await {
            Ok(response) => {
                let keys = mutation.affected_keys(&response);
                for key in &keys {
                    self.cache.invalidate(key);
                }
                info!(
                    mutation = kind,
                    target = mutation.target_id().unwrap_or("-"),
                    invalidated = keys.len(),
                    "mutation succeeded"
                );
                MutationOutcome::Success(response)
            }
            Err(err) => {
                warn!(mutation = kind, error = %err, "mutation failed");
                MutationOutcome::failed(err)
            }
        }
    }
}
