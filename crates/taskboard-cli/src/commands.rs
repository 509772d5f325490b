//! Subcommands and their execution

use crate::output;
use anyhow::{bail, Context};
use clap::Subcommand;
use serde_json::Value;
use taskboard_client::{
    CreateProjectInput, CreateTaskInput, CreateWorkspaceInput, InviteMemberInput, ProjectStatus,
    TaskPriority, TaskStatus, UpdateProfileInput, WorkspaceProjects, WorkspaceRole,
};
use taskboard_sdk::{
    Action, GroupBy, Mutation, MutationOutcome, SortDirection, TaskFilter, TaskboardClient,
    ViewParams,
};
use tracing::debug;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List my workspaces
    Workspaces,

    /// Show a workspace with its projects and statistics
    Workspace { id: String },

    /// Search workspace members by name, email or role
    Members {
        workspace_id: String,
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Show a project board with progress
    Project { id: String },

    /// List tasks assigned to me
    MyTasks {
        /// all, todo, inprogress, done, achieved or high
        #[arg(long)]
        filter: Option<String>,
        /// Due date order: asc or desc
        #[arg(long)]
        sort: Option<String>,
        /// Text to look for in title or description
        #[arg(long)]
        search: Option<String>,
        /// Group into status columns
        #[arg(long)]
        board: bool,
        /// Saved view as a query string (filter=…&sort=…&search=…)
        #[arg(long)]
        view: Option<String>,
    },

    /// Show a task with subtasks, comments and activity
    Task { id: String },

    /// Create a task in a project
    CreateTask {
        project_id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "To Do")]
        status: String,
        #[arg(long, default_value = "Medium")]
        priority: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: String,
        /// User id; repeat for several
        #[arg(long = "assignee")]
        assignees: Vec<String>,
    },

    /// Change a task title
    Rename { task_id: String, title: String },

    /// Change a task description
    Describe { task_id: String, description: String },

    /// Move a task to another status
    Status { task_id: String, status: String },

    /// Change a task priority
    Priority { task_id: String, priority: String },

    /// Replace a task's assignees
    Assign {
        task_id: String,
        #[arg(required = true)]
        assignees: Vec<String>,
    },

    /// Add a subtask
    Subtask { task_id: String, title: String },

    /// Mark a subtask done (or open again with --reopen)
    CompleteSubtask {
        task_id: String,
        subtask_id: String,
        #[arg(long)]
        reopen: bool,
    },

    /// Comment on a task
    Comment { task_id: String, text: String },

    /// Start or stop watching a task
    Watch { task_id: String },

    /// Archive or unarchive a task
    Archive { task_id: String },

    /// Create a workspace
    CreateWorkspace {
        name: String,
        #[arg(long, default_value = "#3b82f6")]
        color: String,
        #[arg(long)]
        description: Option<String>,
    },

    /// Create a project in a workspace
    CreateProject {
        workspace_id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, default_value = "Planning")]
        status: String,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: String,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },

    /// Invite someone to a workspace by email
    Invite {
        workspace_id: String,
        email: String,
        #[arg(long, default_value = "member")]
        role: String,
    },

    /// Accept an invitation
    Join {
        /// Token from an invitation email
        #[arg(long, conflicts_with = "workspace")]
        token: Option<String>,
        /// Workspace of a shared invite link
        #[arg(long)]
        workspace: Option<String>,
    },

    /// Show or update my profile
    Profile {
        #[arg(long)]
        name: Option<String>,
    },
}

/// Accepts CLI spellings (`todo`, `in-progress`) as well as API values
fn parse_status(value: &str) -> TaskStatus {
    match value.to_lowercase().as_str() {
        "todo" | "to-do" | "to do" => TaskStatus::Todo,
        "inprogress" | "in-progress" | "in progress" => TaskStatus::InProgress,
        "done" => TaskStatus::Done,
        _ => TaskStatus::parse(value),
    }
}

fn parse_priority(value: &str) -> TaskPriority {
    match value.to_lowercase().as_str() {
        "low" => TaskPriority::Low,
        "medium" => TaskPriority::Medium,
        "high" => TaskPriority::High,
        _ => TaskPriority::parse(value),
    }
}

pub async fn run(client: &TaskboardClient, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Workspaces => output::workspaces(&client.workspaces().await?),

        Command::Workspace { id } => {
            let WorkspaceProjects { workspace, projects } = client.workspace(&id).await?;
            let stats = client.workspace_stats(&id).await?;
            output::workspace(&workspace, &projects, &stats);
            if let Some(link) = client.invite_link(&id) {
                println!("Invite link: {}", link);
            }
        }

        Command::Members {
            workspace_id,
            search,
        } => output::members(&client.members(&workspace_id, &search).await?),

        Command::Project { id } => {
            let (project, overview) = client.project_overview(&id).await?;
            output::project(&project, &overview);
        }

        Command::MyTasks {
            filter,
            sort,
            search,
            board,
            view,
        } => {
            let mut params = match view {
                Some(query) => ViewParams::from_query(&query)?,
                None => ViewParams::default(),
            };
            if let Some(filter) = filter {
                params.filter = TaskFilter::parse(&filter);
            }
            if let Some(sort) = sort {
                params.sort = SortDirection::parse(&sort);
            }
            if let Some(search) = search {
                params.search = search;
            }
            if board {
                params.group_by = Some(GroupBy::Status);
            }

            let mut session = client.session();
            let user_id = session.load().await?.id.clone();
            let result = client.my_tasks_view(&user_id, &params).await?;
            output::task_view(&result);
            println!("\nview: ?{}", params.to_query()?);
        }

        Command::Task { id } => {
            let details = client.task(&id).await?;
            let comments = client.comments(&id).await?;
            let activity = client.task_activity(&id).await?;
            output::task_details(&details, &comments, &activity);
        }

        Command::CreateTask {
            project_id,
            title,
            description,
            status,
            priority,
            due,
            assignees,
        } => {
            let project = client.project(&project_id).await?.project;
            enforcer(client)
                .await?
                .check_project(Action::CreateTask, &project, None)?;

            let input = CreateTaskInput {
                title,
                description,
                status: parse_status(&status),
                priority: parse_priority(&priority),
                due_date: due,
                assignees,
            };
            let created = mutate(client, Mutation::CreateTask { project_id, input }).await?;
            output::created("task", &created);
        }

        Command::Rename { task_id, title } => {
            require_task_edit(client, &task_id).await?;
            mutate(client, Mutation::UpdateTaskTitle { task_id, title }).await?;
            println!("Title updated");
        }

        Command::Describe {
            task_id,
            description,
        } => {
            require_task_edit(client, &task_id).await?;
            mutate(
                client,
                Mutation::UpdateTaskDescription {
                    task_id,
                    description,
                },
            )
            .await?;
            println!("Description updated");
        }

        Command::Status { task_id, status } => {
            require_task_edit(client, &task_id).await?;
            let status = parse_status(&status);
            mutate(client, Mutation::UpdateTaskStatus { task_id, status: status.clone() }).await?;
            println!("Status changed to {}", status);
        }

        Command::Priority { task_id, priority } => {
            require_task_edit(client, &task_id).await?;
            let priority = parse_priority(&priority);
            mutate(
                client,
                Mutation::UpdateTaskPriority {
                    task_id,
                    priority: priority.clone(),
                },
            )
            .await?;
            println!("Priority changed to {}", priority);
        }

        Command::Assign { task_id, assignees } => {
            require_task_edit(client, &task_id).await?;
            mutate(client, Mutation::UpdateTaskAssignees { task_id, assignees }).await?;
            println!("Assignees updated");
        }

        Command::Subtask { task_id, title } => {
            mutate(client, Mutation::AddSubtask { task_id, title }).await?;
            println!("Subtask added");
        }

        Command::CompleteSubtask {
            task_id,
            subtask_id,
            reopen,
        } => {
            mutate(
                client,
                Mutation::UpdateSubtask {
                    task_id,
                    subtask_id,
                    completed: !reopen,
                },
            )
            .await?;
            println!("Subtask {}", if reopen { "reopened" } else { "completed" });
        }

        Command::Comment { task_id, text } => {
            mutate(client, Mutation::AddComment { task_id, text }).await?;
            println!("Comment added");
        }

        Command::Watch { task_id } => {
            mutate(client, Mutation::ToggleWatch { task_id }).await?;
            println!("Watch status toggled");
        }

        Command::Archive { task_id } => {
            require_task_edit(client, &task_id).await?;
            let updated = mutate(client, Mutation::ToggleArchive { task_id }).await?;
            let archived = updated.get("isArchived").and_then(Value::as_bool).unwrap_or(false);
            println!("Task {}", if archived { "archived" } else { "unarchived" });
        }

        Command::CreateWorkspace {
            name,
            color,
            description,
        } => {
            let input = CreateWorkspaceInput {
                name,
                color,
                description,
            };
            let created = mutate(client, Mutation::CreateWorkspace { input }).await?;
            output::created("workspace", &created);
        }

        Command::CreateProject {
            workspace_id,
            title,
            description,
            status,
            start,
            due,
            tags,
        } => {
            let workspace = client.workspace_details(&workspace_id).await?;
            enforcer(client)
                .await?
                .check_workspace(Action::CreateProject, &workspace)?;

            let input = CreateProjectInput {
                title,
                description,
                status: ProjectStatus::parse(&status),
                start_date: start,
                due_date: due,
                members: Vec::new(),
                tags,
            };
            let created = mutate(client, Mutation::CreateProject { workspace_id, input }).await?;
            output::created("project", &created);
        }

        Command::Invite {
            workspace_id,
            email,
            role,
        } => {
            let workspace = client.workspace_details(&workspace_id).await?;
            enforcer(client)
                .await?
                .check_workspace(Action::InviteMember, &workspace)?;

            let input = InviteMemberInput {
                email,
                role: WorkspaceRole::parse(&role.to_lowercase()),
            };
            let link = client.invite_link(&workspace_id);
            mutate(client, Mutation::InviteMember { workspace_id, input }).await?;
            println!("Invitation sent");
            if let Some(link) = link {
                println!("Or share: {}", link);
            }
        }

        Command::Join { token, workspace } => {
            let mutation = match (token, workspace) {
                (Some(token), _) => Mutation::AcceptInviteToken { token },
                (None, Some(workspace_id)) => Mutation::AcceptGeneratedInvite { workspace_id },
                (None, None) => bail!("pass --token or --workspace"),
            };
            mutate(client, mutation).await?;
            println!("Joined workspace");
        }

        Command::Profile { name: Some(name) } => {
            let input = UpdateProfileInput {
                name,
                profile_picture: None,
            };
            mutate(client, Mutation::UpdateProfile { input }).await?;
            output::profile(&client.profile().await?);
        }

        Command::Profile { name: None } => output::profile(&client.profile().await?),
    }
    Ok(())
}

async fn mutate(client: &TaskboardClient, mutation: Mutation) -> anyhow::Result<Value> {
    debug!(mutation = mutation.kind(), "executing");
    match client.execute(mutation).await {
        MutationOutcome::Success(value) => Ok(value),
        MutationOutcome::Failure { message, .. } => bail!(message),
    }
}

async fn enforcer(client: &TaskboardClient) -> anyhow::Result<taskboard_sdk::RoleEnforcer> {
    let mut session = client.session();
    session.load().await.context("loading profile")?;
    Ok(session.enforcer()?)
}

/// Project members with edit rights, or workspace owners and admins
async fn require_task_edit(client: &TaskboardClient, task_id: &str) -> anyhow::Result<()> {
    let enforcer = enforcer(client).await?;
    let details = client.task(task_id).await?;

    let workspace = match details.project.workspace.populated() {
        Some(_) => None,
        None => client
            .workspace_details(details.project.workspace.id())
            .await
            .ok(),
    };
    enforcer.check_project(Action::EditTask, &details.project, workspace.as_ref())?;
    Ok(())
}
