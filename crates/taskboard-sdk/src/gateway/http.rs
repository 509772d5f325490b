//! Gateway backed by the Taskboard REST API

use super::traits::Gateway;
use crate::cache::QueryKey;
use crate::error::Result;
use crate::mutation::Mutation;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use taskboard_client::ApiClient;

/// REST gateway
pub struct HttpGateway {
    client: ApiClient,
}

impl HttpGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

fn to_value<T: Serialize>(entity: T) -> Result<Value> {
    Ok(serde_json::to_value(entity)?)
}

#[async_trait]
impl Gateway for HttpGateway {
    fn id(&self) -> &str {
        &self.client.config().base_url
    }

    async fn fetch(&self, key: &QueryKey) -> Result<Value> {
        let client = &self.client;
        match key {
            QueryKey::Workspaces => to_value(client.list_workspaces().await?),
            QueryKey::Workspace(id) => to_value(client.get_workspace_projects(id).await?),
            QueryKey::WorkspaceStats(id) => to_value(client.get_workspace_stats(id).await?),
            QueryKey::WorkspaceDetails(id) => to_value(client.get_workspace_details(id).await?),
            QueryKey::Project(id) => to_value(client.get_project_tasks(id).await?),
            QueryKey::Task(id) => to_value(client.get_task(id).await?),
            // The API scopes my-tasks to the bearer token; the user id only keys the cache
            QueryKey::MyTasks(_) => to_value(client.get_my_tasks().await?),
            QueryKey::Comments(task_id) => to_value(client.get_task_comments(task_id).await?),
            QueryKey::TaskActivity(task_id) => to_value(client.get_task_activity(task_id).await?),
            QueryKey::User => to_value(client.get_user_profile().await?),
        }
    }

    async fn mutate(&self, mutation: &Mutation) -> Result<Value> {
        let client = &self.client;
        match mutation {
            Mutation::CreateTask { project_id, input } => {
                to_value(client.create_task(project_id, input).await?)
            }
            Mutation::UpdateTaskTitle { task_id, title } => {
                to_value(client.update_task_field(task_id, "title", json!(title)).await?)
            }
            Mutation::UpdateTaskDescription { task_id, description } => to_value(
                client
                    .update_task_field(task_id, "description", json!(description))
                    .await?,
            ),
            Mutation::UpdateTaskStatus { task_id, status } => to_value(
                client
                    .update_task_field(task_id, "status", json!(status.as_str()))
                    .await?,
            ),
            Mutation::UpdateTaskPriority { task_id, priority } => to_value(
                client
                    .update_task_field(task_id, "priority", json!(priority.as_str()))
                    .await?,
            ),
            Mutation::UpdateTaskAssignees { task_id, assignees } => to_value(
                client
                    .update_task_field(task_id, "assignees", json!(assignees))
                    .await?,
            ),
            Mutation::AddSubtask { task_id, title } => {
                to_value(client.add_subtask(task_id, title).await?)
            }
            Mutation::UpdateSubtask {
                task_id,
                subtask_id,
                completed,
            } => to_value(client.update_subtask(task_id, subtask_id, *completed).await?),
            Mutation::AddComment { task_id, text } => {
                to_value(client.add_comment(task_id, text).await?)
            }
            Mutation::ToggleWatch { task_id } => to_value(client.watch_task(task_id).await?),
            Mutation::ToggleArchive { task_id } => to_value(client.archive_task(task_id).await?),
            Mutation::CreateWorkspace { input } => to_value(client.create_workspace(input).await?),
            Mutation::CreateProject { workspace_id, input } => {
                to_value(client.create_project(workspace_id, input).await?)
            }
            Mutation::InviteMember { workspace_id, input } => {
                Ok(client.invite_member(workspace_id, input).await?)
            }
            Mutation::AcceptInviteToken { token } => Ok(client.accept_invite_token(token).await?),
            Mutation::AcceptGeneratedInvite { workspace_id } => {
                Ok(client.accept_generate_invite(workspace_id).await?)
            }
            Mutation::UpdateProfile { input } => to_value(client.update_user_profile(input).await?),
        }
    }
}
