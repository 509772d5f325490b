//! Plain-text rendering

use chrono::{DateTime, Utc};
use serde_json::Value;
use taskboard_client::{
    ActivityLog, Comment, Project, Task, TaskDetails, User, Workspace, WorkspaceMember,
    WorkspaceStats,
};
use taskboard_sdk::view::{dedupe_users, display_name};
use taskboard_sdk::{Board, ProjectOverview, ViewResult};

fn date(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn task_line(task: &Task) -> String {
    let priority = task.priority.as_ref().map_or("-", |p| p.as_str());
    let archived = if task.is_archived { " [archived]" } else { "" };
    format!(
        "{:<26} {:<12} {:<7} due {:<10} {}{}",
        task.id,
        task.status.as_str(),
        priority,
        date(task.due_date),
        task.title,
        archived
    )
}

pub fn workspaces(workspaces: &[Workspace]) {
    if workspaces.is_empty() {
        println!("No workspaces yet");
        return;
    }
    for workspace in workspaces {
        println!(
            "{:<26} {:<24} {} members",
            workspace.id,
            workspace.name,
            workspace.members.len()
        );
    }
}

pub fn workspace(workspace: &Workspace, projects: &[Project], stats: &WorkspaceStats) {
    println!("{} ({})", workspace.name, workspace.color);
    if let Some(description) = &workspace.description {
        println!("{}", description);
    }

    let s = &stats.stats;
    println!(
        "\nprojects: {} ({} in progress)  tasks: {} to do, {} in progress, {} done of {}",
        s.total_projects,
        s.total_project_in_progress,
        s.total_task_to_do,
        s.total_task_in_progress,
        s.total_task_completed,
        s.total_tasks
    );

    println!("\nProjects");
    if projects.is_empty() {
        println!("  none");
    }
    for project in projects {
        println!(
            "  {:<26} {:<12} {}",
            project.id,
            project.status.as_str(),
            project.title
        );
    }
}

pub fn members(members: &[WorkspaceMember]) {
    if members.is_empty() {
        println!("No matching members");
        return;
    }
    for member in members {
        let email = member.user.populated().map_or("", |u| u.email.as_str());
        println!(
            "{:<24} {:<30} {}",
            display_name(&member.user),
            email,
            member.role
        );
    }
}

fn board(board: &Board) {
    for (title, tasks) in board.columns() {
        if tasks.is_empty() && title == "Other" {
            continue;
        }
        println!("\n{} ({})", title, tasks.len());
        for task in tasks {
            println!("  {}", task_line(task));
        }
    }
}

pub fn project(project: &Project, overview: &ProjectOverview) {
    println!("{} [{}]  {}% done", project.title, project.status, overview.progress);
    if let Some(description) = &project.description {
        println!("{}", description);
    }
    let counts = &overview.counts;
    println!(
        "to do: {}  in progress: {}  done: {}",
        counts.todo, counts.in_progress, counts.done
    );
    board(&overview.board);
}

pub fn task_view(view: &ViewResult) {
    match &view.board {
        Some(grouped) => board(grouped),
        None if view.tasks.is_empty() => println!("No tasks found"),
        None => {
            for task in &view.tasks {
                println!("{}", task_line(task));
            }
        }
    }
}

pub fn task_details(details: &TaskDetails, comments: &[Comment], activity: &[ActivityLog]) {
    let task = &details.task;
    println!("{}", task.title);
    println!("{}", task_line(task));
    println!("project: {}", details.project.title);
    if let Some(description) = &task.description {
        println!("\n{}", description);
    }

    let assignees = dedupe_users(&task.assignees);
    let names: Vec<&str> = assignees.iter().map(display_name).collect();
    println!("\nassignees: {}", names.join(", "));
    println!("watchers: {}", dedupe_users(&task.watchers).len());

    if !task.subtasks.is_empty() {
        println!("\nSubtasks");
        for subtask in &task.subtasks {
            let mark = if subtask.completed { "x" } else { " " };
            println!("  [{}] {} ({})", mark, subtask.title, subtask.id);
        }
    }

    println!("\nComments ({})", comments.len());
    for comment in comments {
        println!("  {}: {}", display_name(&comment.author), comment.text);
    }

    println!("\nActivity");
    for entry in activity {
        println!(
            "  {} {} {}",
            date(entry.created_at),
            display_name(&entry.user),
            entry.details.description.as_deref().unwrap_or(entry.action.as_str())
        );
    }
}

pub fn profile(user: &User) {
    println!("{} <{}>", user.name, user.email);
    println!("id: {}", user.id);
}

pub fn created(kind: &str, entity: &Value) {
    let id = entity.get("_id").and_then(Value::as_str).unwrap_or("?");
    println!("Created {} {}", kind, id);
}
