//! Types for the Taskboard REST API
//!
//! Field names follow the API's JSON: camelCase with Mongo-style `_id`
//! identifiers. Enumerations never fail to parse; values this client does not
//! know become `Unknown(raw)`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST API (e.g. "https://tasks.example.com/api-v1")
    pub base_url: String,
    /// Bearer token for authenticated access
    pub token: Option<String>,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api-v1".to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

// ============================================================================
// Enumerations
// ============================================================================

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
            /// Value not recognised by this client
            Unknown(String),
        }

        impl $name {
            /// Parse from the wire representation
            pub fn parse(s: &str) -> Self {
                match s {
                    $($wire => Self::$variant,)+
                    other => Self::Unknown(other.to_string()),
                }
            }

            /// Wire representation
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Unknown(raw) => raw,
                }
            }

            /// False for `Unknown` values
            pub fn is_known(&self) -> bool {
                !matches!(self, Self::Unknown(_))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::parse(&s)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum! {
    /// Task workflow status
    TaskStatus {
        Todo => "To Do",
        InProgress => "In Progress",
        Done => "Done",
    }
}

wire_enum! {
    /// Task priority
    TaskPriority {
        Low => "Low",
        Medium => "Medium",
        High => "High",
    }
}

wire_enum! {
    /// Project lifecycle status
    ProjectStatus {
        Planning => "Planning",
        InProgress => "In Progress",
        Completed => "Completed",
        OnHold => "On Hold",
        Cancelled => "Cancelled",
    }
}

wire_enum! {
    /// Role of a user within a workspace
    WorkspaceRole {
        Owner => "owner",
        Admin => "admin",
        Member => "member",
        Viewer => "viewer",
    }
}

wire_enum! {
    /// Role of a user within a project
    ProjectRole {
        Manager => "manager",
        Contributor => "contributor",
        Viewer => "viewer",
    }
}

wire_enum! {
    /// Kind of recorded activity
    ActivityAction {
        CreatedTask => "created_task",
        CreatedSubtask => "created_subtask",
        UpdatedTask => "updated_task",
        UpdatedSubtask => "updated_subtask",
        CompletedTask => "completed_task",
        CreatedProject => "created_project",
        UpdatedProject => "updated_project",
        CompletedProject => "completed_project",
        CreatedWorkspace => "created_workspace",
        AddedComment => "added_comment",
        AddedMember => "added_member",
        RemovedMember => "removed_member",
        JoinedWorkspace => "joined_workspace",
        AddedAttachment => "added_attachment",
    }
}

// ============================================================================
// References
// ============================================================================

/// Entities that carry an API identifier
pub trait Identified {
    fn id(&self) -> &str;
}

/// A reference that the API returns either as a bare id or populated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityRef<T> {
    /// Bare identifier
    Id(String),
    /// Populated entity
    Populated(T),
}

impl<T: Identified> EntityRef<T> {
    /// Identifier of the referenced entity
    pub fn id(&self) -> &str {
        match self {
            EntityRef::Id(id) => id,
            EntityRef::Populated(entity) => entity.id(),
        }
    }

    /// The populated entity, if the API sent one
    pub fn populated(&self) -> Option<&T> {
        match self {
            EntityRef::Id(_) => None,
            EntityRef::Populated(entity) => Some(entity),
        }
    }
}

// ============================================================================
// Entities
// ============================================================================

/// Application user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

impl Identified for User {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Membership of a user in a workspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceMember {
    pub user: EntityRef<User>,
    pub role: WorkspaceRole,
    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,
}

/// Top-level container of projects and members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub owner: Option<EntityRef<User>>,
    #[serde(default)]
    pub members: Vec<WorkspaceMember>,
    #[serde(default)]
    pub projects: Vec<EntityRef<Project>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identified for Workspace {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Membership of a user in a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMember {
    pub user: EntityRef<User>,
    pub role: ProjectRole,
}

/// Unit of work inside a workspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub workspace: EntityRef<Workspace>,
    #[serde(default)]
    pub members: Vec<ProjectMember>,
    #[serde(default)]
    pub tasks: Vec<EntityRef<Task>>,
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub progress: Option<u8>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Identified for Project {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Project as embedded in task listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub workspace: Option<String>,
}

impl Identified for ProjectSummary {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Checklist item under a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Atomic unit of work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    pub project: EntityRef<ProjectSummary>,
    #[serde(default)]
    pub assignees: Vec<EntityRef<User>>,
    #[serde(default)]
    pub watchers: Vec<EntityRef<User>>,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl Identified for Task {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Comment left on a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    pub text: String,
    pub author: EntityRef<User>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    pub task: String,
}

/// Free-form detail attached to an activity entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityDetails {
    #[serde(default)]
    pub description: Option<String>,
}

/// Entry in a task's activity history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    #[serde(rename = "_id")]
    pub id: String,
    pub action: ActivityAction,
    pub user: EntityRef<User>,
    #[serde(default)]
    pub details: ActivityDetails,
    #[serde(default)]
    pub resource_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Composite responses
// ============================================================================

/// Response of `GET /tasks/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDetails {
    pub task: Task,
    pub project: Project,
}

/// Response of `GET /projects/{id}/tasks`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectTasks {
    pub project: Project,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Response of `GET /workspaces/{id}/projects`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceProjects {
    pub workspace: Workspace,
    #[serde(default)]
    pub projects: Vec<Project>,
}

/// Headline counters of a workspace dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsSummary {
    pub total_projects: u64,
    pub total_tasks: u64,
    pub total_project_in_progress: u64,
    pub total_task_completed: u64,
    pub total_task_to_do: u64,
    pub total_task_in_progress: u64,
}

/// Response of `GET /workspaces/{id}/stats`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceStats {
    #[serde(default)]
    pub stats: StatsSummary,
    #[serde(default)]
    pub task_trends_data: Vec<serde_json::Value>,
    #[serde(default)]
    pub project_status_data: Vec<serde_json::Value>,
    #[serde(default)]
    pub task_priority_data: Vec<serde_json::Value>,
    #[serde(default)]
    pub workspace_productivity_data: Vec<serde_json::Value>,
    #[serde(default)]
    pub upcoming_tasks: Vec<Task>,
    #[serde(default)]
    pub recent_projects: Vec<Project>,
}

// ============================================================================
// Write payloads
// ============================================================================

/// Body of `POST /tasks/{projectId}/create-task`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInput {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: String,
    pub assignees: Vec<String>,
}

/// Body of `POST /workspaces`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateWorkspaceInput {
    pub name: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Member entry of a project creation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMemberInput {
    pub user: String,
    pub role: ProjectRole,
}

/// Body of `POST /projects/{workspaceId}/create-project`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectInput {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub start_date: String,
    pub due_date: String,
    #[serde(default)]
    pub members: Vec<ProjectMemberInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

/// Body of `POST /workspaces/{id}/invite-member`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InviteMemberInput {
    pub email: String,
    pub role: WorkspaceRole,
}

/// Body of `PUT /users/profile`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}
