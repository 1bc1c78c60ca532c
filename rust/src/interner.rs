//! Dense integer IDs for workflow tasks.
//!
//! Critical path passes index plain vectors by task ID instead of hashing strings.

use rustc_hash::FxHashMap;

use crate::error::AnalysisError;
use crate::models::Workflow;

/// Interned task ID (u32 for compact storage).
pub type TaskIdInt = u32;

/// Bidirectional mapping between task ID strings and dense integers.
///
/// IDs are assigned in sorted string order so tie-breaks are deterministic.
#[derive(Debug, Clone, Default)]
pub struct TaskIdInterner {
    to_int: FxHashMap<String, TaskIdInt>,
    from_int: Vec<String>,
}

impl TaskIdInterner {
    /// Intern every task of a workflow. Duplicate task IDs are rejected.
    pub fn from_workflow(workflow: &Workflow) -> Result<Self, AnalysisError> {
        let mut ids: Vec<&str> = workflow.tasks.iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        if let Some(pair) = ids.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(AnalysisError::InvalidArgument(format!(
                "duplicate task id {:?} in workflow {:?}",
                pair[0], workflow.id
            )));
        }

        let mut to_int = FxHashMap::with_capacity_and_hasher(ids.len(), Default::default());
        let mut from_int = Vec::with_capacity(ids.len());
        for (i, id) in ids.into_iter().enumerate() {
            to_int.insert(id.to_string(), i as TaskIdInt);
            from_int.push(id.to_string());
        }
        Ok(Self { to_int, from_int })
    }

    /// Get the integer ID for a task, if it belongs to the workflow.
    #[inline]
    pub fn get(&self, s: &str) -> Option<TaskIdInt> {
        self.to_int.get(s).copied()
    }

    /// Get the task string for an integer ID.
    #[inline]
    pub fn resolve(&self, id: TaskIdInt) -> Option<&str> {
        self.from_int.get(id as usize).map(|s| s.as_str())
    }

    /// Number of interned tasks.
    pub fn len(&self) -> usize {
        self.from_int.len()
    }

    pub fn is_empty(&self) -> bool {
        self.from_int.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;

    #[test]
    fn test_ids_follow_sorted_order() {
        let wf = Workflow::new(
            "0",
            vec![
                Task::new("c", 1.0, vec![]),
                Task::new("a", 1.0, vec![]),
                Task::new("b", 1.0, vec![]),
            ],
        );
        let interner = TaskIdInterner::from_workflow(&wf).unwrap();

        assert_eq!(interner.len(), 3);
        assert_eq!(interner.get("a"), Some(0));
        assert_eq!(interner.get("c"), Some(2));
        assert_eq!(interner.resolve(1), Some("b"));
        assert_eq!(interner.get("nonexistent"), None);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let wf = Workflow::new(
            "0",
            vec![Task::new("a", 1.0, vec![]), Task::new("a", 2.0, vec![])],
        );
        assert!(matches!(
            TaskIdInterner::from_workflow(&wf),
            Err(AnalysisError::InvalidArgument(_))
        ));
    }
}
