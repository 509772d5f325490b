//! Form validation
//!
//! Inputs are checked client-side before any request is sent. Failures carry
//! messages keyed by the offending field so a form can show them inline.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use taskboard_client::{
    CreateProjectInput, CreateTaskInput, CreateWorkspaceInput, InviteMemberInput,
    UpdateProfileInput, WorkspaceRole,
};

/// Field-level validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages recorded for a field
    pub fn field(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All fields with messages
    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Require at least `min` characters (after trimming)
    pub fn min_len(&mut self, field: &str, value: &str, min: usize, message: &str) {
        if value.trim().chars().count() < min {
            self.add(field, message);
        }
    }

    /// Single-field check for free-text inputs such as comments
    pub fn require_text(field: &str, value: &str, message: &str) -> Result<(), ValidationErrors> {
        let mut errors = Self::new();
        errors.min_len(field, value, 1, message);
        errors.into_result()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Types that can be checked before submission
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Loose address check: one `@`, non-empty local part, dotted domain
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && !email.contains(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}

impl Validate for CreateWorkspaceInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.min_len("name", &self.name, 3, "Name must be at least 3 characters");
        errors.min_len("color", &self.color, 3, "Color must be at least 3 characters");
        errors.into_result()
    }
}

impl Validate for CreateProjectInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.min_len("title", &self.title, 3, "Title must be at least 3 characters");
        if !self.status.is_known() {
            errors.add("status", format!("Invalid project status '{}'", self.status));
        }
        errors.min_len("startDate", &self.start_date, 10, "Start date is required");
        errors.min_len("dueDate", &self.due_date, 10, "Due date is required");
        for member in &self.members {
            if !member.role.is_known() {
                errors.add("members", format!("Invalid member role '{}'", member.role));
            }
        }
        errors.into_result()
    }
}

impl Validate for CreateTaskInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.min_len("title", &self.title, 1, "Task title is required");
        if !self.status.is_known() {
            errors.add("status", format!("Invalid status '{}'", self.status));
        }
        if !self.priority.is_known() {
            errors.add("priority", format!("Invalid priority '{}'", self.priority));
        }
        errors.min_len("dueDate", &self.due_date, 1, "Due date is required");
        if self.assignees.is_empty() {
            errors.add("assignees", "At least one assignee is required");
        }
        errors.into_result()
    }
}

impl Validate for InviteMemberInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !is_valid_email(&self.email) {
            errors.add("email", "Invalid email address");
        }
        // Ownership is never granted through an invitation
        if !matches!(
            self.role,
            WorkspaceRole::Admin | WorkspaceRole::Member | WorkspaceRole::Viewer
        ) {
            errors.add("role", format!("Invalid role '{}'", self.role));
        }
        errors.into_result()
    }
}

impl Validate for UpdateProfileInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.min_len("name", &self.name, 1, "Name is required");
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_client::{ProjectMemberInput, ProjectRole, ProjectStatus, TaskPriority, TaskStatus};

    fn task_input() -> CreateTaskInput {
        CreateTaskInput {
            title: "Ship release".into(),
            description: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            due_date: "2024-03-01".into(),
            assignees: vec!["u1".into()],
        }
    }

    #[test]
    fn test_valid_task_passes() {
        assert!(task_input().validate().is_ok());
    }

    #[test]
    fn test_task_requires_assignee_and_title() {
        let input = CreateTaskInput {
            title: "   ".into(),
            assignees: vec![],
            ..task_input()
        };

        let errors = input.validate().unwrap_err();
        assert_eq!(errors.field("title"), ["Task title is required"]);
        assert_eq!(errors.field("assignees"), ["At least one assignee is required"]);
        assert!(errors.field("dueDate").is_empty());
    }

    #[test]
    fn test_task_rejects_unknown_status() {
        let input = CreateTaskInput {
            status: TaskStatus::Unknown("Blocked".into()),
            ..task_input()
        };
        assert!(!input.validate().unwrap_err().field("status").is_empty());
    }

    #[test]
    fn test_workspace_name_and_color_length() {
        let input = CreateWorkspaceInput {
            name: "ab".into(),
            color: "#f".into(),
            description: None,
        };
        let errors = input.validate().unwrap_err();
        assert_eq!(errors.fields().count(), 2);
    }

    #[test]
    fn test_project_dates_and_roles() {
        let input = CreateProjectInput {
            title: "Website".into(),
            description: None,
            status: ProjectStatus::Planning,
            start_date: "2024-01".into(),
            due_date: "2024-06-30".into(),
            members: vec![ProjectMemberInput {
                user: "u1".into(),
                role: ProjectRole::Unknown("owner".into()),
            }],
            tags: None,
        };

        let errors = input.validate().unwrap_err();
        assert_eq!(errors.field("startDate"), ["Start date is required"]);
        assert!(errors.field("dueDate").is_empty());
        assert_eq!(errors.field("members").len(), 1);
    }

    #[test]
    fn test_invite_member() {
        let ok = InviteMemberInput {
            email: "dev@example.com".into(),
            role: WorkspaceRole::Member,
        };
        assert!(ok.validate().is_ok());

        let owner = InviteMemberInput {
            email: "dev@example".into(),
            role: WorkspaceRole::Owner,
        };
        let errors = owner.validate().unwrap_err();
        assert_eq!(errors.field("email"), ["Invalid email address"]);
        assert_eq!(errors.field("role").len(), 1);
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a.b@c.io"));
        assert!(!is_valid_email("a@@c.io"));
        assert!(!is_valid_email("@c.io"));
        assert!(!is_valid_email("a@c."));
        assert!(!is_valid_email("a b@c.io"));
    }

    #[test]
    fn test_display_lists_every_message() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "required");
        errors.add("assignees", "at least one");
        assert_eq!(errors.to_string(), "assignees: at least one; title: required");
    }
}
