//! Mock gateway for testing.

use super::traits::Gateway;
use crate::cache::QueryKey;
use crate::error::{Result, SdkError};
use crate::mutation::Mutation;
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Mock gateway for testing.
///
/// Serves configured values per query key and records every call. Unknown
/// keys answer `NotFound`.
pub struct MockGateway {
    responses: DashMap<QueryKey, Result<Value>>,
    fetch_counts: DashMap<QueryKey, u32>,
    mutation_response: Mutex<Option<Result<Value>>>,
    mutations: Mutex<Vec<Mutation>>,
    mutation_count: AtomicU32,
    latency: Option<Duration>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            responses: DashMap::new(),
            fetch_counts: DashMap::new(),
            mutation_response: Mutex::new(None),
            mutations: Mutex::new(Vec::new()),
            mutation_count: AtomicU32::new(0),
            latency: None,
        }
    }

    /// Serve `value` for `key`.
    pub fn with_response(self, key: QueryKey, value: Value) -> Self {
        self.set_response(key, value);
        self
    }

    /// Delay every call, so concurrent callers overlap.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn set_response(&self, key: QueryKey, value: Value) {
        self.responses.insert(key, Ok(value));
    }

    /// Make fetches of `key` fail.
    pub fn set_failure(&self, key: QueryKey, error: SdkError) {
        self.responses.insert(key, Err(error));
    }

    /// Answer every mutation with `value`.
    pub fn set_mutation_response(&self, value: Value) {
        *lock(&self.mutation_response) = Some(Ok(value));
    }

    /// Make every mutation fail.
    pub fn set_mutation_failure(&self, error: SdkError) {
        *lock(&self.mutation_response) = Some(Err(error));
    }

    /// Number of fetches issued for `key`.
    pub fn fetch_count(&self, key: &QueryKey) -> u32 {
        self.fetch_counts.get(key).map(|count| *count).unwrap_or(0)
    }

    /// Number of fetches across all keys.
    pub fn total_fetches(&self) -> u32 {
        self.fetch_counts.iter().map(|entry| *entry.value()).sum()
    }

    /// Number of mutations that reached the gateway.
    pub fn mutation_count(&self) -> u32 {
        self.mutation_count.load(Ordering::SeqCst)
    }

    /// Mutations received, in order.
    pub fn mutations(&self) -> Vec<Mutation> {
        lock(&self.mutations).clone()
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Gateway for MockGateway {
    fn id(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, key: &QueryKey) -> Result<Value> {
        *self.fetch_counts.entry(key.clone()).or_insert(0) += 1;
        self.delay().await;

        match self.responses.get(key) {
            Some(response) => response.value().clone(),
            None => Err(SdkError::NotFound(key.to_string())),
        }
    }

    async fn mutate(&self, mutation: &Mutation) -> Result<Value> {
        self.mutation_count.fetch_add(1, Ordering::SeqCst);
        lock(&self.mutations).push(mutation.clone());
        self.delay().await;

        let configured = lock(&self.mutation_response).clone();
        match configured {
            Some(response) => response,
            None => Ok(json!({ "_id": mutation.target_id().unwrap_or("mock") })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_gateway_serves_and_counts() {
        let gateway = MockGateway::new().with_response(QueryKey::User, json!({"_id": "u1"}));

        assert_eq!(gateway.fetch(&QueryKey::User).await.unwrap()["_id"], "u1");
        assert_eq!(gateway.fetch_count(&QueryKey::User), 1);

        let missing = gateway.fetch(&QueryKey::Workspaces).await;
        assert!(matches!(missing, Err(SdkError::NotFound(_))));
        assert_eq!(gateway.total_fetches(), 2);
    }

    #[tokio::test]
    async fn test_mock_gateway_mutation_failure() {
        let gateway = MockGateway::new();
        gateway.set_mutation_failure(SdkError::Server {
            status: 400,
            message: "Task not found".into(),
        });

        let result = gateway
            .mutate(&Mutation::ToggleWatch { task_id: "t1".into() })
            .await;
        assert!(result.is_err());
        assert_eq!(gateway.mutation_count(), 1);
        assert_eq!(gateway.mutations().len(), 1);
    }
}
