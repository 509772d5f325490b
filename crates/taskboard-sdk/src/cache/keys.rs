//! Cache key definitions
//!
//! Keys are structured tuples (entity kind + identifying parameters). Prefix
//! matching works segment by segment, so `workspace/w1` covers
//! `workspace/w1/stats` but `task/t1` never covers `task-activity/t1`.

use std::fmt;

/// Key of a cached query
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueryKey {
    /// Workspaces of the current user
    Workspaces,
    /// Workspace with its projects
    Workspace(String),
    /// Dashboard statistics of a workspace
    WorkspaceStats(String),
    /// Workspace with its members
    WorkspaceDetails(String),
    /// Project with its tasks
    Project(String),
    /// Task with its project
    Task(String),
    /// Tasks assigned to a user
    MyTasks(String),
    /// Comments on a task
    Comments(String),
    /// Activity history of a task
    TaskActivity(String),
    /// Profile of the current user
    User,
}

impl QueryKey {
    /// Segments of the key, most general first
    pub fn segments(&self) -> Vec<&str> {
        match self {
            QueryKey::Workspaces => vec!["workspaces"],
            QueryKey::Workspace(id) => vec!["workspace", id],
            QueryKey::WorkspaceStats(id) => vec!["workspace", id, "stats"],
            QueryKey::WorkspaceDetails(id) => vec!["workspace", id, "details"],
            QueryKey::Project(id) => vec!["project", id],
            QueryKey::Task(id) => vec!["task", id],
            QueryKey::MyTasks(user_id) => vec!["my-tasks", user_id],
            QueryKey::Comments(task_id) => vec!["comments", task_id],
            QueryKey::TaskActivity(task_id) => vec!["task-activity", task_id],
            QueryKey::User => vec!["user"],
        }
    }

    /// Kind segment (e.g. "task", "comments")
    pub fn kind(&self) -> &'static str {
        match self {
            QueryKey::Workspaces => "workspaces",
            QueryKey::Workspace(_)
            | QueryKey::WorkspaceStats(_)
            | QueryKey::WorkspaceDetails(_) => "workspace",
            QueryKey::Project(_) => "project",
            QueryKey::Task(_) => "task",
            QueryKey::MyTasks(_) => "my-tasks",
            QueryKey::Comments(_) => "comments",
            QueryKey::TaskActivity(_) => "task-activity",
            QueryKey::User => "user",
        }
    }

    /// Whether this key lies under the given prefix
    pub fn starts_with(&self, prefix: &KeyPrefix) -> bool {
        let segments = self.segments();
        prefix.0.len() <= segments.len()
            && prefix.0.iter().zip(segments.iter()).all(|(p, s)| p == s)
    }

    /// Prefix covering this key and every key extending it
    pub fn as_prefix(&self) -> KeyPrefix {
        KeyPrefix(self.segments().into_iter().map(str::to_string).collect())
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments().join("/"))
    }
}

/// Leading segments of a family of keys
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPrefix(Vec<String>);

impl KeyPrefix {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl From<&QueryKey> for KeyPrefix {
    fn from(key: &QueryKey) -> Self {
        key.as_prefix()
    }
}

impl fmt::Display for KeyPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/*", self.0.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_prefix_covers_children() {
        let prefix = QueryKey::Workspace("w1".into()).as_prefix();
        assert!(QueryKey::Workspace("w1".into()).starts_with(&prefix));
        assert!(QueryKey::WorkspaceStats("w1".into()).starts_with(&prefix));
        assert!(QueryKey::WorkspaceDetails("w1".into()).starts_with(&prefix));
        assert!(!QueryKey::WorkspaceStats("w2".into()).starts_with(&prefix));
    }

    #[test]
    fn test_task_prefix_is_segment_wise() {
        let prefix = QueryKey::Task("t1".into()).as_prefix();
        assert!(QueryKey::Task("t1".into()).starts_with(&prefix));
        assert!(!QueryKey::TaskActivity("t1".into()).starts_with(&prefix));
        assert!(!QueryKey::Task("t10".into()).starts_with(&prefix));
    }

    #[test]
    fn test_kind_prefix() {
        let all_tasks = KeyPrefix::new(["task"]);
        assert!(QueryKey::Task("a".into()).starts_with(&all_tasks));
        assert!(!QueryKey::Comments("a".into()).starts_with(&all_tasks));
    }

    #[test]
    fn test_display() {
        assert_eq!(QueryKey::WorkspaceStats("w1".into()).to_string(), "workspace/w1/stats");
        assert_eq!(KeyPrefix::new(["my-tasks"]).to_string(), "my-tasks/*");
    }
}
