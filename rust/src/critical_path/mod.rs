//! Critical path lower bound on workflow makespan.
//!
//! The bound assumes unlimited machines of a single type, so independent branches
//! run fully in parallel and only the longest dependency chain matters.

mod calculation;
mod types;

pub use calculation::{calculate_critical_path, critical_path_length, TaskData};
pub use types::{CriticalPathResult, TaskTiming};
