//! Progress and status counts

use serde::Serialize;
use taskboard_client::{Task, TaskStatus};

/// Share of done tasks as a whole percentage, rounded half up.
///
/// An empty list is 0%.
pub fn project_progress(tasks: &[Task]) -> u8 {
    let total = tasks.len();
    if total == 0 {
        return 0;
    }
    let done = tasks.iter().filter(|t| t.status == TaskStatus::Done).count();
    // round(100 * done / total) in integers
    ((200 * done + total) / (2 * total)) as u8
}

/// Tasks per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
    pub other: usize,
}

impl StatusCounts {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let mut counts = Self::default();
        for task in tasks {
            match task.status {
                TaskStatus::Todo => counts.todo += 1,
                TaskStatus::InProgress => counts.in_progress += 1,
                TaskStatus::Done => counts.done += 1,
                TaskStatus::Unknown(_) => counts.other += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.todo + self.in_progress + self.done + self.other
    }
}
