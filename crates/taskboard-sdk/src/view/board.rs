//! Board grouping by task status

use taskboard_client::{Task, TaskStatus};

/// Tasks in status columns. Statuses this client does not know land in
/// `other` instead of disappearing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    pub todo: Vec<Task>,
    pub in_progress: Vec<Task>,
    pub done: Vec<Task>,
    pub other: Vec<Task>,
}

impl Board {
    /// Group tasks, keeping their relative order inside each column
    pub fn from_tasks<I>(tasks: I) -> Self
    where
        I: IntoIterator<Item = Task>,
    {
        let mut board = Board::default();
        for task in tasks {
            match task.status {
                TaskStatus::Todo => board.todo.push(task),
                TaskStatus::InProgress => board.in_progress.push(task),
                TaskStatus::Done => board.done.push(task),
                TaskStatus::Unknown(_) => board.other.push(task),
            }
        }
        board
    }

    /// Columns in display order
    pub fn columns(&self) -> [(&'static str, &[Task]); 4] {
        [
            ("To Do", self.todo.as_slice()),
            ("In Progress", self.in_progress.as_slice()),
            ("Done", self.done.as_slice()),
            ("Other", self.other.as_slice()),
        ]
    }

    pub fn len(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.done.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
