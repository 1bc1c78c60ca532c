//! Types for critical path calculation.

use rustc_hash::{FxHashMap, FxHashSet};

/// Per-task timing from the forward and backward passes, in seconds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TaskTiming {
    /// Earliest possible start time (from forward pass).
    pub earliest_start: f64,
    /// Earliest possible finish time (from forward pass).
    pub earliest_finish: f64,
    /// Latest start that does not delay the workflow (from backward pass).
    pub latest_start: f64,
    /// Latest finish that does not delay the workflow (from backward pass).
    pub latest_finish: f64,
    /// Slack = latest_start - earliest_start.
    pub slack: f64,
}

impl TaskTiming {
    pub fn is_critical(&self) -> bool {
        // Allow small epsilon for floating point comparison
        self.slack.abs() < 1e-9
    }
}

/// Result of critical path calculation for a whole workflow.
#[derive(Clone, Debug, Default)]
pub struct CriticalPathResult {
    /// Timing information for each task, keyed by task ID.
    pub task_timings: FxHashMap<String, TaskTiming>,
    /// Task IDs with zero slack.
    pub critical_path_tasks: FxHashSet<String>,
    /// Longest weighted path through the DAG; a lower bound on makespan.
    pub critical_path_length: f64,
    /// Sum of all task execution times on the machine.
    pub total_work: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_timing_critical() {
        let timing = TaskTiming {
            earliest_start: 0.0,
            earliest_finish: 5.0,
            latest_start: 0.0,
            latest_finish: 5.0,
            slack: 0.0,
        };
        assert!(timing.is_critical());

        let timing_with_slack = TaskTiming {
            earliest_start: 0.0,
            earliest_finish: 5.0,
            latest_start: 2.0,
            latest_finish: 7.0,
            slack: 2.0,
        };
        assert!(!timing_with_slack.is_critical());
    }
}
