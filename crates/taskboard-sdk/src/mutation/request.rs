//! Mutation requests
//!
//! One variant per write the REST API offers. Each mutation targets exactly
//! one entity and declares which cached queries it makes stale.

use crate::cache::QueryKey;
use crate::validation::{Validate, ValidationErrors};
use serde_json::Value;
use taskboard_client::{
    CreateProjectInput, CreateTaskInput, CreateWorkspaceInput, InviteMemberInput, TaskPriority,
    TaskStatus, UpdateProfileInput,
};

/// A single write against the gateway
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    CreateTask {
        project_id: String,
        input: CreateTaskInput,
    },
    UpdateTaskTitle {
        task_id: String,
        title: String,
    },
    UpdateTaskDescription {
        task_id: String,
        description: String,
    },
    UpdateTaskStatus {
        task_id: String,
        status: TaskStatus,
    },
    UpdateTaskPriority {
        task_id: String,
        priority: TaskPriority,
    },
    UpdateTaskAssignees {
        task_id: String,
        assignees: Vec<String>,
    },
    AddSubtask {
        task_id: String,
        title: String,
    },
    UpdateSubtask {
        task_id: String,
        subtask_id: String,
        completed: bool,
    },
    AddComment {
        task_id: String,
        text: String,
    },
    /// Toggle whether the current user watches the task
    ToggleWatch {
        task_id: String,
    },
    /// Toggle the archived flag of the task
    ToggleArchive {
        task_id: String,
    },
    CreateWorkspace {
        input: CreateWorkspaceInput,
    },
    CreateProject {
        workspace_id: String,
        input: CreateProjectInput,
    },
    InviteMember {
        workspace_id: String,
        input: InviteMemberInput,
    },
    AcceptInviteToken {
        token: String,
    },
    AcceptGeneratedInvite {
        workspace_id: String,
    },
    UpdateProfile {
        input: UpdateProfileInput,
    },
}

impl Mutation {
    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            Mutation::CreateTask { .. } => "create_task",
            Mutation::UpdateTaskTitle { .. } => "update_task_title",
            Mutation::UpdateTaskDescription { .. } => "update_task_description",
            Mutation::UpdateTaskStatus { .. } => "update_task_status",
            Mutation::UpdateTaskPriority { .. } => "update_task_priority",
            Mutation::UpdateTaskAssignees { .. } => "update_task_assignees",
            Mutation::AddSubtask { .. } => "add_subtask",
            Mutation::UpdateSubtask { .. } => "update_subtask",
            Mutation::AddComment { .. } => "add_comment",
            Mutation::ToggleWatch { .. } => "toggle_watch",
            Mutation::ToggleArchive { .. } => "toggle_archive",
            Mutation::CreateWorkspace { .. } => "create_workspace",
            Mutation::CreateProject { .. } => "create_project",
            Mutation::InviteMember { .. } => "invite_member",
            Mutation::AcceptInviteToken { .. } => "accept_invite_token",
            Mutation::AcceptGeneratedInvite { .. } => "accept_generated_invite",
            Mutation::UpdateProfile { .. } => "update_profile",
        }
    }

    /// Id of the entity the request addresses, when it names one
    pub fn target_id(&self) -> Option<&str> {
        match self {
            Mutation::CreateTask { project_id, .. } => Some(project_id.as_str()),
            Mutation::UpdateTaskTitle { task_id, .. }
            | Mutation::UpdateTaskDescription { task_id, .. }
            | Mutation::UpdateTaskStatus { task_id, .. }
            | Mutation::UpdateTaskPriority { task_id, .. }
            | Mutation::UpdateTaskAssignees { task_id, .. }
            | Mutation::AddSubtask { task_id, .. }
            | Mutation::UpdateSubtask { task_id, .. }
            | Mutation::AddComment { task_id, .. }
            | Mutation::ToggleWatch { task_id }
            | Mutation::ToggleArchive { task_id } => Some(task_id.as_str()),
            Mutation::CreateProject { workspace_id, .. }
            | Mutation::InviteMember { workspace_id, .. }
            | Mutation::AcceptGeneratedInvite { workspace_id } => Some(workspace_id.as_str()),
            Mutation::CreateWorkspace { .. }
            | Mutation::AcceptInviteToken { .. }
            | Mutation::UpdateProfile { .. } => None,
        }
    }

    /// Client-side checks run before anything is sent
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(id) = self.target_id() {
            errors.min_len("id", id, 1, "Target id is required");
        }
        if let Mutation::UpdateSubtask { subtask_id, .. } = self {
            errors.min_len("subtaskId", subtask_id, 1, "Subtask id is required");
        }
        errors.into_result()?;

        match self {
            Mutation::CreateTask { input, .. } => input.validate(),
            Mutation::CreateWorkspace { input } => input.validate(),
            Mutation::CreateProject { input, .. } => input.validate(),
            Mutation::InviteMember { input, .. } => input.validate(),
            Mutation::UpdateProfile { input } => input.validate(),
            Mutation::UpdateTaskTitle { title, .. } => {
                ValidationErrors::require_text("title", title, "Task title is required")
            }
            Mutation::AddSubtask { title, .. } => {
                ValidationErrors::require_text("title", title, "Subtask title is required")
            }
            Mutation::AddComment { text, .. } => {
                ValidationErrors::require_text("text", text, "Comment text is required")
            }
            Mutation::AcceptInviteToken { token } => {
                ValidationErrors::require_text("token", token, "Invite token is required")
            }
            Mutation::UpdateTaskStatus { status, .. } if !status.is_known() => {
                let mut errors = ValidationErrors::new();
                errors.add("status", format!("Invalid status '{}'", status));
                Err(errors)
            }
            Mutation::UpdateTaskPriority { priority, .. } if !priority.is_known() => {
                let mut errors = ValidationErrors::new();
                errors.add("priority", format!("Invalid priority '{}'", priority));
                Err(errors)
            }
            _ => Ok(()),
        }
    }

    /// Cached queries made stale by a successful write.
    ///
    /// Ids are read from the gateway's response where it carries them, falling
    /// back to the ids in the request.
    pub fn affected_keys(&self, response: &Value) -> Vec<QueryKey> {
        match self {
            Mutation::UpdateTaskTitle { task_id, .. }
            | Mutation::UpdateTaskDescription { task_id, .. }
            | Mutation::UpdateTaskStatus { task_id, .. }
            | Mutation::UpdateTaskPriority { task_id, .. }
            | Mutation::UpdateTaskAssignees { task_id, .. }
            | Mutation::AddSubtask { task_id, .. }
            | Mutation::UpdateSubtask { task_id, .. }
            | Mutation::ToggleWatch { task_id }
            | Mutation::ToggleArchive { task_id } => {
                let id = ref_id(response, "_id").unwrap_or_else(|| task_id.clone());
                vec![QueryKey::Task(id.clone()), QueryKey::TaskActivity(id)]
            }
            Mutation::AddComment { task_id, .. } => {
                let id = ref_id(response, "task").unwrap_or_else(|| task_id.clone());
                vec![QueryKey::Comments(id.clone()), QueryKey::TaskActivity(id)]
            }
            Mutation::CreateTask { project_id, .. } => {
                let id = ref_id(response, "project").unwrap_or_else(|| project_id.clone());
                vec![QueryKey::Project(id)]
            }
            Mutation::CreateProject { workspace_id, .. } => {
                let id = ref_id(response, "workspace").unwrap_or_else(|| workspace_id.clone());
                vec![QueryKey::Workspace(id)]
            }
            Mutation::CreateWorkspace { .. }
            | Mutation::AcceptInviteToken { .. }
            | Mutation::AcceptGeneratedInvite { .. } => vec![QueryKey::Workspaces],
            Mutation::UpdateProfile { .. } => vec![QueryKey::User],
            Mutation::InviteMember { .. } => Vec::new(),
        }
    }
}

/// Id stored under `field`, either as a bare string or a populated `{_id}`
fn ref_id(value: &Value, field: &str) -> Option<String> {
    match value.get(field)? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Object(map) => map.get("_id")?.as_str().map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_update_affects_task_and_activity() {
        let mutation = Mutation::UpdateTaskStatus {
            task_id: "t1".into(),
            status: TaskStatus::Done,
        };
        assert_eq!(
            mutation.affected_keys(&json!({"_id": "t1"})),
            vec![QueryKey::Task("t1".into()), QueryKey::TaskActivity("t1".into())]
        );
    }

    #[test]
    fn test_create_task_uses_project_from_response() {
        let mutation = Mutation::CreateTask {
            project_id: "p-request".into(),
            input: CreateTaskInput {
                title: "Write docs".into(),
                description: None,
                status: TaskStatus::Todo,
                priority: TaskPriority::Low,
                due_date: "2024-05-01".into(),
                assignees: vec!["u1".into()],
            },
        };

        let populated = json!({"_id": "t9", "project": {"_id": "p1", "title": "Docs"}});
        assert_eq!(mutation.affected_keys(&populated), vec![QueryKey::Project("p1".into())]);

        assert_eq!(
            mutation.affected_keys(&json!({})),
            vec![QueryKey::Project("p-request".into())]
        );
    }

    #[test]
    fn test_comment_keys() {
        let mutation = Mutation::AddComment {
            task_id: "t1".into(),
            text: "Looks good".into(),
        };
        assert_eq!(
            mutation.affected_keys(&json!({"_id": "c1", "task": "t1"})),
            vec![QueryKey::Comments("t1".into()), QueryKey::TaskActivity("t1".into())]
        );
    }

    #[test]
    fn test_invite_member_affects_nothing() {
        let mutation = Mutation::InviteMember {
            workspace_id: "w1".into(),
            input: InviteMemberInput {
                email: "new@example.com".into(),
                role: taskboard_client::WorkspaceRole::Member,
            },
        };
        assert!(mutation.affected_keys(&json!({})).is_empty());
    }

    #[test]
    fn test_blank_comment_is_rejected() {
        let mutation = Mutation::AddComment {
            task_id: "t1".into(),
            text: "  ".into(),
        };
        let errors = mutation.validate().unwrap_err();
        assert_eq!(errors.field("text"), ["Comment text is required"]);
    }

    #[test]
    fn test_missing_target_id_is_rejected() {
        let mutation = Mutation::ToggleWatch { task_id: String::new() };
        assert!(!mutation.validate().unwrap_err().field("id").is_empty());
    }

    #[test]
    fn test_unknown_priority_is_rejected() {
        let mutation = Mutation::UpdateTaskPriority {
            task_id: "t1".into(),
            priority: TaskPriority::Unknown("Urgent".into()),
        };
        assert!(mutation.validate().is_err());
    }
}
