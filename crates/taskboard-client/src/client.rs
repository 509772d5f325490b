//! HTTP client for the Taskboard REST API

use crate::error::{ClientError, Result};
use crate::types::*;
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// HTTP client for the Taskboard REST API
///
/// # Example
///
/// ```rust,no_run
/// use taskboard_client::{ApiClient, ClientConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::new(ClientConfig {
///     base_url: "http://localhost:5000/api-v1".into(),
///     token: Some("secret".into()),
///     ..Default::default()
/// })?;
///
/// let tasks = client.get_my_tasks().await?;
/// let details = client.get_task("t1").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ClientConfig,
    client: Client,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = config.token {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ClientError::Config("token contains invalid header characters".into()))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // ==================== Workspaces ====================

    /// List workspaces the current user belongs to
    pub async fn list_workspaces(&self) -> Result<Vec<Workspace>> {
        self.get_json(&self.url(&["workspaces"])).await
    }

    /// Get a workspace with its projects
    pub async fn get_workspace_projects(&self, workspace_id: &str) -> Result<WorkspaceProjects> {
        self.get_json(&self.url(&["workspaces", workspace_id, "projects"])).await
    }

    /// Get a workspace with members
    pub async fn get_workspace_details(&self, workspace_id: &str) -> Result<Workspace> {
        self.get_json(&self.url(&["workspaces", workspace_id])).await
    }

    /// Get dashboard statistics for a workspace
    pub async fn get_workspace_stats(&self, workspace_id: &str) -> Result<WorkspaceStats> {
        self.get_json(&self.url(&["workspaces", workspace_id, "stats"])).await
    }

    /// Create a workspace
    pub async fn create_workspace(&self, input: &CreateWorkspaceInput) -> Result<Workspace> {
        self.send_json(reqwest::Method::POST, &self.url(&["workspaces"]), input)
            .await
    }

    /// Invite a member by email
    pub async fn invite_member(
        &self,
        workspace_id: &str,
        input: &InviteMemberInput,
    ) -> Result<serde_json::Value> {
        let url = self.url(&["workspaces", workspace_id, "invite-member"]);
        self.send_json(reqwest::Method::POST, &url, input).await
    }

    /// Accept an emailed invitation token
    pub async fn accept_invite_token(&self, token: &str) -> Result<serde_json::Value> {
        let url = self.url(&["workspaces", "accept-invite-token"]);
        let body = serde_json::json!({ "token": token });
        self.send_json(reqwest::Method::POST, &url, &body).await
    }

    /// Accept a generated invite link for a workspace
    pub async fn accept_generate_invite(&self, workspace_id: &str) -> Result<serde_json::Value> {
        let url = self.url(&["workspaces", workspace_id, "accept-generate-invite"]);
        self.send_json(reqwest::Method::POST, &url, &serde_json::json!({}))
            .await
    }

    // ==================== Projects ====================

    /// Get a project with its tasks
    pub async fn get_project_tasks(&self, project_id: &str) -> Result<ProjectTasks> {
        self.get_json(&self.url(&["projects", project_id, "tasks"])).await
    }

    /// Create a project inside a workspace
    pub async fn create_project(
        &self,
        workspace_id: &str,
        input: &CreateProjectInput,
    ) -> Result<Project> {
        let url = self.url(&["projects", workspace_id, "create-project"]);
        self.send_json(reqwest::Method::POST, &url, input).await
    }

    // ==================== Tasks ====================

    /// Get a task with its project
    pub async fn get_task(&self, task_id: &str) -> Result<TaskDetails> {
        self.get_json(&self.url(&["tasks", task_id])).await
    }

    /// Tasks assigned to the current user
    pub async fn get_my_tasks(&self) -> Result<Vec<Task>> {
        self.get_json(&self.url(&["tasks", "my-tasks"])).await
    }

    /// Comments on a task
    pub async fn get_task_comments(&self, task_id: &str) -> Result<Vec<Comment>> {
        self.get_json(&self.url(&["tasks", task_id, "comments"])).await
    }

    /// Activity history of a task
    pub async fn get_task_activity(&self, task_id: &str) -> Result<Vec<ActivityLog>> {
        self.get_json(&self.url(&["tasks", task_id, "activity"])).await
    }

    /// Create a task in a project
    pub async fn create_task(&self, project_id: &str, input: &CreateTaskInput) -> Result<Task> {
        let url = self.url(&["tasks", project_id, "create-task"]);
        self.send_json(reqwest::Method::POST, &url, input).await
    }

    /// Update a single task field (`title`, `description`, `status`, `priority`, `assignees`)
    pub async fn update_task_field(
        &self,
        task_id: &str,
        field: &str,
        value: serde_json::Value,
    ) -> Result<Task> {
        let url = self.url(&["tasks", task_id, field]);
        let mut body = serde_json::Map::new();
        body.insert(field.to_string(), value);
        self.send_json(reqwest::Method::PUT, &url, &body).await
    }

    /// Add a subtask
    pub async fn add_subtask(&self, task_id: &str, title: &str) -> Result<Task> {
        let url = self.url(&["tasks", task_id, "add-subtask"]);
        let body = serde_json::json!({ "title": title });
        self.send_json(reqwest::Method::POST, &url, &body).await
    }

    /// Mark a subtask completed or open
    pub async fn update_subtask(
        &self,
        task_id: &str,
        subtask_id: &str,
        completed: bool,
    ) -> Result<Task> {
        let url = self.url(&["tasks", task_id, "update-subtask", subtask_id]);
        let body = serde_json::json!({ "completed": completed });
        self.send_json(reqwest::Method::PUT, &url, &body).await
    }

    /// Add a comment to a task
    pub async fn add_comment(&self, task_id: &str, text: &str) -> Result<Comment> {
        let url = self.url(&["tasks", task_id, "add-comment"]);
        let body = serde_json::json!({ "text": text });
        self.send_json(reqwest::Method::POST, &url, &body).await
    }

    /// Toggle whether the current user watches a task
    pub async fn watch_task(&self, task_id: &str) -> Result<Task> {
        let url = self.url(&["tasks", task_id, "watch"]);
        self.send_json(reqwest::Method::POST, &url, &serde_json::json!({}))
            .await
    }

    /// Toggle the archived flag of a task
    pub async fn archive_task(&self, task_id: &str) -> Result<Task> {
        let url = self.url(&["tasks", task_id, "achieved"]);
        self.send_json(reqwest::Method::POST, &url, &serde_json::json!({}))
            .await
    }

    // ==================== Users ====================

    /// Profile of the authenticated user
    pub async fn get_user_profile(&self) -> Result<User> {
        self.get_json(&self.url(&["users", "profile"])).await
    }

    /// Update the authenticated user's profile
    pub async fn update_user_profile(&self, input: &UpdateProfileInput) -> Result<User> {
        let url = self.url(&["users", "profile"]);
        self.send_json(reqwest::Method::PUT, &url, input).await
    }

    // ==================== Helper Methods ====================

    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.config.base_url.trim_end_matches('/').to_string();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!(url = %url, "GET");
        let response = self.client.get(url).send().await?;
        self.handle_response(response).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        url: &str,
        body: &B,
    ) -> Result<T> {
        tracing::debug!(url = %url, method = %method, "write");
        let response = self
            .client
            .request(method, url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            let path = response.url().path().to_string();
            return Err(ClientError::NotFound(path));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_body(status.as_u16(), &body));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            ClientError::InvalidResponse(format!("unexpected response shape: {}", e))
        })
    }
}
