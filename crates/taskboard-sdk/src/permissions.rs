//! Role-based permission checks
//!
//! Workspace roles gate structural changes (projects, invitations); project
//! roles gate task edits, with workspace owners and admins allowed everywhere.

use crate::error::{Result, SdkError};
use taskboard_client::{Identified, Project, ProjectRole, Workspace, WorkspaceRole};

/// Role-gated actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateProject,
    InviteMember,
    CreateTask,
    EditTask,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::CreateProject => "create project",
            Action::InviteMember => "invite member",
            Action::CreateTask => "create task",
            Action::EditTask => "edit task",
        }
    }
}

/// Checks what the current user may do, based on their memberships
#[derive(Debug, Clone)]
pub struct RoleEnforcer {
    user_id: String,
}

impl RoleEnforcer {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Role in a workspace; the owner reference counts even without a member entry
    pub fn workspace_role(&self, workspace: &Workspace) -> Option<WorkspaceRole> {
        if workspace
            .owner
            .as_ref()
            .map_or(false, |owner| owner.id() == self.user_id)
        {
            return Some(WorkspaceRole::Owner);
        }
        workspace
            .members
            .iter()
            .find(|member| member.user.id() == self.user_id)
            .map(|member| member.role.clone())
    }

    /// Role in a project
    pub fn project_role(&self, project: &Project) -> Option<ProjectRole> {
        project
            .members
            .iter()
            .find(|member| member.user.id() == self.user_id)
            .map(|member| member.role.clone())
    }

    /// Creating projects and inviting members require workspace owner or admin
    pub fn check_workspace(&self, action: Action, workspace: &Workspace) -> Result<()> {
        let role = self.workspace_role(workspace);
        if is_workspace_admin(role.as_ref()) {
            return Ok(());
        }
        Err(self.denied(
            action,
            "workspace owner or admin",
            role.as_ref().map_or("no membership", WorkspaceRole::as_str).to_string(),
            workspace.id(),
        ))
    }

    /// Task changes require project manager or contributor, or workspace
    /// owner or admin. The workspace falls back to the one embedded in the
    /// project.
    pub fn check_project(
        &self,
        action: Action,
        project: &Project,
        workspace: Option<&Workspace>,
    ) -> Result<()> {
        let project_role = self.project_role(project);
        if matches!(
            project_role,
            Some(ProjectRole::Manager) | Some(ProjectRole::Contributor)
        ) {
            return Ok(());
        }

        let workspace_role = workspace
            .or_else(|| project.workspace.populated())
            .and_then(|workspace| self.workspace_role(workspace));
        if is_workspace_admin(workspace_role.as_ref()) {
            return Ok(());
        }

        let actual = format!(
            "project {}, workspace {}",
            project_role.as_ref().map_or("no membership", ProjectRole::as_str),
            workspace_role.as_ref().map_or("no membership", WorkspaceRole::as_str),
        );
        Err(self.denied(
            action,
            "project manager or contributor, or workspace owner or admin",
            actual,
            project.id(),
        ))
    }

    fn denied(&self, action: Action, required: &str, actual: String, target: &str) -> SdkError {
        tracing::debug!(
            user = %self.user_id,
            action = action.as_str(),
            resource = target,
            "permission denied"
        );
        SdkError::AccessDenied {
            action: action.as_str().to_string(),
            required: required.to_string(),
            actual,
        }
    }
}

fn is_workspace_admin(role: Option<&WorkspaceRole>) -> bool {
    matches!(role, Some(WorkspaceRole::Owner) | Some(WorkspaceRole::Admin))
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_client::{EntityRef, ProjectMember, ProjectStatus, WorkspaceMember};

    fn workspace(members: Vec<(&str, WorkspaceRole)>) -> Workspace {
        Workspace {
            id: "w1".into(),
            name: "Acme".into(),
            description: None,
            color: "#ff0000".into(),
            owner: Some(EntityRef::Id("owner".into())),
            members: members
                .into_iter()
                .map(|(id, role)| WorkspaceMember {
                    user: EntityRef::Id(id.into()),
                    role,
                    joined_at: None,
                })
                .collect(),
            projects: Vec::new(),
            created_at: None,
        }
    }

    fn project(members: Vec<(&str, ProjectRole)>) -> Project {
        Project {
            id: "p1".into(),
            title: "Launch".into(),
            description: None,
            status: ProjectStatus::Planning,
            workspace: EntityRef::Id("w1".into()),
            members: members
                .into_iter()
                .map(|(id, role)| ProjectMember {
                    user: EntityRef::Id(id.into()),
                    role,
                })
                .collect(),
            tasks: Vec::new(),
            start_date: None,
            due_date: None,
            progress: None,
            tags: Vec::new(),
            is_archived: false,
            created_at: None,
        }
    }

    #[test]
    fn test_owner_without_member_entry() {
        let ws = workspace(vec![]);
        let enforcer = RoleEnforcer::new("owner");
        assert_eq!(enforcer.workspace_role(&ws), Some(WorkspaceRole::Owner));
        assert!(enforcer.check_workspace(Action::InviteMember, &ws).is_ok());
    }

    #[test]
    fn test_member_cannot_create_project() {
        let ws = workspace(vec![("u1", WorkspaceRole::Member)]);
        let err = RoleEnforcer::new("u1")
            .check_workspace(Action::CreateProject, &ws)
            .unwrap_err();
        match err {
            SdkError::AccessDenied { action, actual, .. } => {
                assert_eq!(action, "create project");
                assert_eq!(actual, "member");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_task_edit_rules() {
        let ws = workspace(vec![("admin", WorkspaceRole::Admin), ("m", WorkspaceRole::Member)]);
        let p = project(vec![("c", ProjectRole::Contributor), ("v", ProjectRole::Viewer)]);

        assert!(RoleEnforcer::new("c").check_project(Action::EditTask, &p, None).is_ok());
        assert!(RoleEnforcer::new("admin")
            .check_project(Action::EditTask, &p, Some(&ws))
            .is_ok());
        assert!(RoleEnforcer::new("v")
            .check_project(Action::EditTask, &p, Some(&ws))
            .is_err());
        assert!(RoleEnforcer::new("m")
            .check_project(Action::EditTask, &p, Some(&ws))
            .is_err());
    }

    #[test]
    fn test_task_edit_denial_names_both_roles() {
        let ws = workspace(vec![("m", WorkspaceRole::Member)]);
        let p = project(vec![("m", ProjectRole::Viewer)]);

        let err = RoleEnforcer::new("m")
            .check_project(Action::EditTask, &p, Some(&ws))
            .unwrap_err();
        match err {
            SdkError::AccessDenied {
                action,
                required,
                actual,
            } => {
                assert_eq!(action, "edit task");
                assert_eq!(
                    required,
                    "project manager or contributor, or workspace owner or admin"
                );
                assert_eq!(actual, "project viewer, workspace member");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = RoleEnforcer::new("stranger")
            .check_project(Action::CreateTask, &p, None)
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("have project no membership, workspace no membership"));
    }
}
