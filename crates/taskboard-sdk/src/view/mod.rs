//! View projection
//!
//! Turns raw entities plus view parameters into what a screen shows.

mod board;
mod members;
mod params;
mod progress;
mod projector;

pub use board::Board;
pub use members::{dedupe_users, display_name, search_members};
pub use params::{GroupBy, SortDirection, TaskFilter, ViewParams};
pub use progress::{project_progress, StatusCounts};
pub use projector::{matches_filter, project, sort_by_due_date, ProjectOverview, ViewResult};
