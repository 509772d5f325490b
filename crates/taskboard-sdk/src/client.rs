//! High-level client
//!
//! Typed reads through the entity cache, writes through the mutation
//! executor, and the view projections built on both.

use crate::cache::{EntityCache, QueryKey};
use crate::config::SdkConfig;
use crate::error::Result;
use crate::gateway::{Gateway, HttpGateway};
use crate::mutation::{Mutation, MutationExecutor, MutationOutcome};
use crate::session::Session;
use crate::view::{project, search_members, ProjectOverview, ViewParams, ViewResult};
use std::sync::Arc;
use taskboard_client::{
    ActivityLog, ApiClient, Comment, Project, ProjectTasks, Task, TaskDetails, User, Workspace,
    WorkspaceMember, WorkspaceProjects, WorkspaceStats,
};

/// Taskboard client
///
/// # Example
///
/// ```rust,no_run
/// use taskboard_sdk::{Mutation, SdkConfig, TaskboardClient, ViewParams};
/// use taskboard_client::TaskStatus;
///
/// # async fn example() -> taskboard_sdk::Result<()> {
/// let client = TaskboardClient::from_config(SdkConfig::from_env()?)?;
/// let mut session = client.session();
/// let user_id = session.load().await?.id.clone();
///
/// let params = ViewParams::from_query("filter=todo&sort=asc")?;
/// let view = client.my_tasks_view(&user_id, &params).await?;
///
/// if let Some(task) = view.tasks.first() {
///     let outcome = client
///         .execute(Mutation::UpdateTaskStatus {
///             task_id: task.id.clone(),
///             status: TaskStatus::InProgress,
///         })
///         .await;
///     println!("{:?}", outcome.message());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TaskboardClient {
    cache: EntityCache,
    executor: MutationExecutor,
    config: SdkConfig,
}

impl TaskboardClient {
    /// Client over any gateway
    pub fn new(gateway: Arc<dyn Gateway>, config: SdkConfig) -> Self {
        let cache = EntityCache::new(gateway.clone(), config.cache.clone());
        let executor = MutationExecutor::new(gateway, cache.clone());
        Self {
            cache,
            executor,
            config,
        }
    }

    /// Client over the REST API
    pub fn from_config(config: SdkConfig) -> Result<Self> {
        let api = ApiClient::new(config.client.clone())?;
        Ok(Self::new(Arc::new(HttpGateway::new(api)), config))
    }

    pub fn cache(&self) -> &EntityCache {
        &self.cache
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Fresh session sharing this client's cache
    pub fn session(&self) -> Session {
        Session::new(self.cache.clone())
    }

    /// Shareable workspace invite link, when an app URL is configured
    pub fn invite_link(&self, workspace_id: &str) -> Option<String> {
        self.config.invite_link(workspace_id)
    }

    // ==================== Queries ====================

    pub async fn workspaces(&self) -> Result<Vec<Workspace>> {
        self.cache.fetch_as(&QueryKey::Workspaces).await
    }

    /// Workspace with its projects
    pub async fn workspace(&self, workspace_id: &str) -> Result<WorkspaceProjects> {
        self.cache
            .fetch_as(&QueryKey::Workspace(workspace_id.to_string()))
            .await
    }

    /// Workspace with its members
    pub async fn workspace_details(&self, workspace_id: &str) -> Result<Workspace> {
        self.cache
            .fetch_as(&QueryKey::WorkspaceDetails(workspace_id.to_string()))
            .await
    }

    pub async fn workspace_stats(&self, workspace_id: &str) -> Result<WorkspaceStats> {
        self.cache
            .fetch_as(&QueryKey::WorkspaceStats(workspace_id.to_string()))
            .await
    }

    /// Project with its tasks
    pub async fn project(&self, project_id: &str) -> Result<ProjectTasks> {
        self.cache
            .fetch_as(&QueryKey::Project(project_id.to_string()))
            .await
    }

    /// Task with its project
    pub async fn task(&self, task_id: &str) -> Result<TaskDetails> {
        self.cache.fetch_as(&QueryKey::Task(task_id.to_string())).await
    }

    pub async fn my_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        self.cache
            .fetch_as(&QueryKey::MyTasks(user_id.to_string()))
            .await
    }

    pub async fn comments(&self, task_id: &str) -> Result<Vec<Comment>> {
        self.cache
            .fetch_as(&QueryKey::Comments(task_id.to_string()))
            .await
    }

    pub async fn task_activity(&self, task_id: &str) -> Result<Vec<ActivityLog>> {
        self.cache
            .fetch_as(&QueryKey::TaskActivity(task_id.to_string()))
            .await
    }

    pub async fn profile(&self) -> Result<User> {
        self.cache.fetch_as(&QueryKey::User).await
    }

    // ==================== Views ====================

    /// My tasks with filter, search, sort and grouping applied
    pub async fn my_tasks_view(&self, user_id: &str, params: &ViewParams) -> Result<ViewResult> {
        let tasks = self.my_tasks(user_id).await?;
        Ok(project(&tasks, params))
    }

    /// Project header figures and board
    pub async fn project_overview(&self, project_id: &str) -> Result<(Project, ProjectOverview)> {
        let ProjectTasks { project, tasks } = self.project(project_id).await?;
        let overview = ProjectOverview::from_tasks(&tasks);
        Ok((project, overview))
    }

    /// Workspace members matching a directory search
    pub async fn members(&self, workspace_id: &str, query: &str) -> Result<Vec<WorkspaceMember>> {
        let workspace = self.workspace_details(workspace_id).await?;
        Ok(search_members(&workspace.members, query)
            .into_iter()
            .cloned()
            .collect())
    }

    // ==================== Writes ====================

    /// Validate and perform a write, invalidating what it affects
    pub async fn execute(&self, mutation: Mutation) -> MutationOutcome {
        self.executor.execute(mutation).await
    }
}
