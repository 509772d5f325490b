//! Task list projection: filter, search, sort, group
//!
//! Pure functions of their inputs. The same tasks and parameters always give
//! the same view.

use super::board::Board;
use super::params::{GroupBy, SortDirection, TaskFilter, ViewParams};
use super::progress::{project_progress, StatusCounts};
use taskboard_client::{Task, TaskPriority, TaskStatus};

/// Projected task list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewResult {
    /// Filtered, searched and sorted tasks
    pub tasks: Vec<Task>,
    /// Present when the params ask for board grouping
    pub board: Option<Board>,
}

/// Apply view parameters to a task list
pub fn project(tasks: &[Task], params: &ViewParams) -> ViewResult {
    let needle = params.search.trim().to_lowercase();

    let mut selected: Vec<Task> = tasks
        .iter()
        .filter(|task| matches_filter(task, &params.filter))
        .filter(|task| matches_search(task, &needle))
        .cloned()
        .collect();
    sort_by_due_date(&mut selected, params.sort);

    let board = params
        .group_by
        .map(|GroupBy::Status| Board::from_tasks(selected.iter().cloned()));

    ViewResult {
        tasks: selected,
        board,
    }
}

/// Whether a task passes a filter.
///
/// Status and priority filters match on that field alone, archived or not;
/// `achieved` shows only archived tasks. `all` and unknown filters pass
/// everything.
pub fn matches_filter(task: &Task, filter: &TaskFilter) -> bool {
    match filter {
        TaskFilter::All | TaskFilter::Other(_) => true,
        TaskFilter::Achieved => task.is_archived,
        TaskFilter::Todo => task.status == TaskStatus::Todo,
        TaskFilter::InProgress => task.status == TaskStatus::InProgress,
        TaskFilter::Done => task.status == TaskStatus::Done,
        TaskFilter::High => task.priority == Some(TaskPriority::High),
    }
}

/// Case-insensitive substring match on title or description.
///
/// `needle` must already be lowercase; empty matches everything.
fn matches_search(task: &Task, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    task.title.to_lowercase().contains(needle)
        || task
            .description
            .as_deref()
            .map_or(false, |d| d.to_lowercase().contains(needle))
}

/// Stable sort by due date. Tasks without a due date keep their positions;
/// dated tasks are reordered among the remaining slots.
pub fn sort_by_due_date(tasks: &mut [Task], direction: SortDirection) {
    let slots: Vec<usize> = tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| task.due_date.is_some())
        .map(|(i, _)| i)
        .collect();

    let mut dated: Vec<Task> = slots.iter().map(|&i| tasks[i].clone()).collect();
    dated.sort_by(|a, b| match direction {
        SortDirection::Asc => a.due_date.cmp(&b.due_date),
        SortDirection::Desc => b.due_date.cmp(&a.due_date),
    });

    for (slot, task) in slots.into_iter().zip(dated) {
        tasks[slot] = task;
    }
}

/// Header figures and board for a project page
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectOverview {
    pub counts: StatusCounts,
    pub progress: u8,
    pub board: Board,
}

impl ProjectOverview {
    /// Archived tasks are left off the board but still count toward progress
    pub fn from_tasks(tasks: &[Task]) -> Self {
        Self {
            counts: StatusCounts::from_tasks(tasks),
            progress: project_progress(tasks),
            board: Board::from_tasks(tasks.iter().filter(|t| !t.is_archived).cloned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::test_support::{dated, task};

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_all_is_identity() {
        let mut archived = task("c", TaskStatus::Done);
        archived.is_archived = true;
        let tasks = vec![task("a", TaskStatus::Todo), task("b", TaskStatus::Done), archived];

        let params = ViewParams::default();
        let view = project(&tasks, &ViewParams { sort: SortDirection::Asc, ..params });
        assert_eq!(view.tasks, tasks);
        assert!(view.board.is_none());
    }

    #[test]
    fn test_filters_are_subsets() {
        let mut archived = task("c", TaskStatus::Todo);
        archived.is_archived = true;
        let mut high = task("d", TaskStatus::InProgress);
        high.priority = Some(TaskPriority::High);
        let tasks = vec![task("a", TaskStatus::Todo), task("b", TaskStatus::Done), archived, high];

        let view = |filter| {
            project(
                &tasks,
                &ViewParams {
                    filter,
                    ..Default::default()
                },
            )
        };

        assert_eq!(ids(&view(TaskFilter::Todo).tasks), ["a", "c"]);
        assert_eq!(ids(&view(TaskFilter::Achieved).tasks), ["c"]);
        assert_eq!(ids(&view(TaskFilter::High).tasks), ["d"]);
        assert_eq!(ids(&view(TaskFilter::InProgress).tasks), ["d"]);
        assert_eq!(view(TaskFilter::Other("mine".into())).tasks.len(), 4);
    }

    #[test]
    fn test_status_filter_keeps_archived_task() {
        let mut archived = task("old", TaskStatus::Todo);
        archived.is_archived = true;
        archived.priority = Some(TaskPriority::High);

        assert!(matches_filter(&archived, &TaskFilter::Todo));
        assert!(matches_filter(&archived, &TaskFilter::High));
        assert!(!matches_filter(&archived, &TaskFilter::Done));

        let params = ViewParams {
            filter: TaskFilter::Todo,
            ..Default::default()
        };
        assert_eq!(ids(&project(&[archived], &params).tasks), ["old"]);
    }

    #[test]
    fn test_search_handles_missing_description() {
        let mut described = task("a", TaskStatus::Todo);
        described.title = "Plan".into();
        described.description = Some("Deploy the API".into());
        let mut bare = task("b", TaskStatus::Todo);
        bare.title = "DEPLOY docs".into();
        let mut unrelated = task("c", TaskStatus::Todo);
        unrelated.title = "Review".into();

        let params = ViewParams {
            search: "deploy".into(),
            ..Default::default()
        };
        let view = project(&[described, bare, unrelated], &params);
        assert_eq!(ids(&view.tasks), ["a", "b"]);
    }

    #[test]
    fn test_sort_keeps_undated_in_place() {
        let tasks = vec![
            dated("jan3", "2024-01-03"),
            task("none", TaskStatus::Todo),
            dated("jan1", "2024-01-01"),
        ];

        let mut asc = tasks.clone();
        sort_by_due_date(&mut asc, SortDirection::Asc);
        assert_eq!(ids(&asc), ["jan1", "none", "jan3"]);

        let mut desc = tasks;
        sort_by_due_date(&mut desc, SortDirection::Desc);
        assert_eq!(ids(&desc), ["jan3", "none", "jan1"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_dates() {
        let mut tasks = vec![
            dated("first", "2024-02-01"),
            dated("second", "2024-02-01"),
            dated("early", "2024-01-01"),
        ];
        sort_by_due_date(&mut tasks, SortDirection::Desc);
        assert_eq!(ids(&tasks), ["first", "second", "early"]);
    }

    #[test]
    fn test_projection_is_idempotent() {
        let tasks = vec![
            dated("x", "2024-03-01"),
            dated("y", "2024-01-01"),
            task("z", TaskStatus::Done),
        ];
        let params = ViewParams {
            sort: SortDirection::Asc,
            ..Default::default()
        };

        let once = project(&tasks, &params);
        let twice = project(&once.tasks, &params);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_board_has_other_column() {
        let tasks = vec![
            task("a", TaskStatus::Todo),
            task("b", TaskStatus::Unknown("Blocked".into())),
            task("c", TaskStatus::Done),
        ];
        let params = ViewParams {
            group_by: Some(GroupBy::Status),
            ..Default::default()
        };

        let board = project(&tasks, &params).board.unwrap();
        assert_eq!(ids(&board.todo), ["a"]);
        assert_eq!(ids(&board.done), ["c"]);
        assert_eq!(ids(&board.other), ["b"]);
        assert_eq!(board.len(), 3);
    }

    #[test]
    fn test_project_overview() {
        let mut archived = task("c", TaskStatus::Done);
        archived.is_archived = true;
        let overview = ProjectOverview::from_tasks(&[
            task("a", TaskStatus::Todo),
            task("b", TaskStatus::Done),
            archived,
        ]);

        assert_eq!(overview.progress, 67);
        assert_eq!(overview.counts.done, 2);
        assert_eq!(overview.board.len(), 2);
    }
}
