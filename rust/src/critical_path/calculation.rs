//! Critical path calculation using forward and backward passes.

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

use crate::error::AnalysisError;
use crate::interner::{TaskIdInt, TaskIdInterner};
use crate::models::{MachineType, Workflow};

use super::types::{CriticalPathResult, TaskTiming};

/// Pre-computed task data for the passes.
/// All lookups use direct array indexing by interned task ID.
pub struct TaskData {
    /// Task ID string <-> integer mapping.
    pub index: TaskIdInterner,
    /// Execution time of each task on the machine, in seconds.
    pub durations: Vec<f64>,
    /// Dependencies of each task, sorted by ID.
    pub deps: Vec<Vec<TaskIdInt>>,
    /// Reverse dependencies (dependents) of each task, sorted by ID.
    pub dependents: Vec<Vec<TaskIdInt>>,
}

impl TaskData {
    /// Build task data for a workflow running on `machine`.
    ///
    /// Dependencies on IDs outside the workflow are treated as already satisfied.
    pub fn new(workflow: &Workflow, machine: &MachineType) -> Result<Self, AnalysisError> {
        let index = TaskIdInterner::from_workflow(workflow)?;
        let n = index.len();

        let mut durations = vec![0.0; n];
        let mut deps: Vec<Vec<TaskIdInt>> = vec![Vec::new(); n];
        let mut dependents: Vec<Vec<TaskIdInt>> = vec![Vec::new(); n];

        for task in &workflow.tasks {
            let Some(id) = index.get(&task.id) else {
                continue;
            };
            let idx = id as usize;
            durations[idx] = task.size / machine.speed;

            for dep in &task.dependencies {
                if let Some(dep_id) = index.get(dep) {
                    deps[idx].push(dep_id);
                    dependents[dep_id as usize].push(id);
                }
            }
        }

        for list in deps.iter_mut().chain(dependents.iter_mut()) {
            list.sort_unstable();
        }

        Ok(Self {
            index,
            durations,
            deps,
            dependents,
        })
    }

    /// Get number of tasks.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Order tasks so every dependency precedes its dependents (Kahn's algorithm).
    ///
    /// Fails with the sorted IDs of every task left unprocessed when the graph has a cycle.
    pub fn topological_order(&self) -> Result<Vec<TaskIdInt>, AnalysisError> {
        let n = self.len();
        let mut in_degree: Vec<usize> = self.deps.iter().map(|d| d.len()).collect();

        let mut queue: VecDeque<TaskIdInt> = (0..n as TaskIdInt)
            .filter(|&id| in_degree[id as usize] == 0)
            .collect();
        let mut order = Vec::with_capacity(n);

        while let Some(id) = queue.pop_front() {
            order.push(id);
            for &dependent in &self.dependents[id as usize] {
                let degree = &mut in_degree[dependent as usize];
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(dependent);
                }
            }
        }

        if order.len() != n {
            // Interned IDs follow string order, so this is already sorted
            let stuck: Vec<String> = (0..n as TaskIdInt)
                .filter(|&id| in_degree[id as usize] > 0)
                .filter_map(|id| self.index.resolve(id).map(str::to_string))
                .collect();
            return Err(AnalysisError::CyclicGraph(stuck));
        }

        Ok(order)
    }
}

/// Calculate the critical path of a workflow on a single machine type.
///
/// The forward pass computes earliest start/finish for every task. The backward
/// pass computes latest start/finish against the critical path length, and tasks
/// whose slack is zero form the critical path.
pub fn calculate_critical_path(
    workflow: &Workflow,
    machine: &MachineType,
) -> Result<CriticalPathResult, AnalysisError> {
    let data = TaskData::new(workflow, machine)?;
    let topo_order = data.topological_order()?;
    let n = data.len();

    // Forward pass
    let mut timings: Vec<TaskTiming> = vec![TaskTiming::default(); n];
    let mut total_work = 0.0;

    for &id in &topo_order {
        let idx = id as usize;
        let duration = data.durations[idx];
        total_work += duration;

        let earliest_start = data.deps[idx]
            .iter()
            .map(|&dep| timings[dep as usize].earliest_finish)
            .fold(0.0, f64::max);

        timings[idx].earliest_start = earliest_start;
        timings[idx].earliest_finish = earliest_start + duration;
    }

    let critical_path_length = timings
        .iter()
        .map(|t| t.earliest_finish)
        .fold(0.0, f64::max);

    // Backward pass (reverse topological order)
    for &id in topo_order.iter().rev() {
        let idx = id as usize;
        let latest_finish = data.dependents[idx]
            .iter()
            .map(|&dependent| timings[dependent as usize].latest_start)
            .reduce(f64::min)
            .unwrap_or(critical_path_length);

        let timing = &mut timings[idx];
        timing.latest_finish = latest_finish;
        timing.latest_start = latest_finish - data.durations[idx];
        timing.slack = timing.latest_start - timing.earliest_start;
    }

    let mut critical_path_tasks = FxHashSet::default();
    let mut task_timings =
        FxHashMap::with_capacity_and_hasher(n, Default::default());
    for (idx, timing) in timings.into_iter().enumerate() {
        let Some(task_id) = data.index.resolve(idx as TaskIdInt) else {
            continue;
        };
        if timing.is_critical() {
            critical_path_tasks.insert(task_id.to_string());
        }
        task_timings.insert(task_id.to_string(), timing);
    }

    Ok(CriticalPathResult {
        task_timings,
        critical_path_tasks,
        critical_path_length,
        total_work,
    })
}

/// Lower bound on the makespan of `workflow` on any number of `machine`s.
pub fn critical_path_length(
    workflow: &Workflow,
    machine: &MachineType,
) -> Result<f64, AnalysisError> {
    Ok(calculate_critical_path(workflow, machine)?.critical_path_length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;

    fn make_task(id: &str, size: f64, deps: Vec<&str>) -> Task {
        Task::new(id, size, deps.into_iter().map(str::to_string).collect())
    }

    fn make_machine() -> MachineType {
        // 1000 MIPS, so a task of size 1000 takes one second
        MachineType::new(1000.0, 100.0).unwrap()
    }

    fn make_critical_set(ids: &[&str]) -> FxHashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_workflow() {
        let wf = Workflow::new("0", vec![]);
        let result = calculate_critical_path(&wf, &make_machine()).unwrap();
        assert_eq!(result.critical_path_length, 0.0);
        assert!(result.task_timings.is_empty());
    }

    #[test]
    fn test_single_task_critical_path() {
        let wf = Workflow::new("0", vec![make_task("a", 5000.0, vec![])]);
        let result = calculate_critical_path(&wf, &make_machine()).unwrap();

        assert!((result.critical_path_length - 5.0).abs() < 1e-9);
        assert!(result.critical_path_tasks.contains("a"));
    }

    #[test]
    fn test_chain_critical_path() {
        // a -> b -> c (all on critical path)
        let wf = Workflow::new(
            "0",
            vec![
                make_task("c", 1000.0, vec!["b"]),
                make_task("a", 2000.0, vec![]),
                make_task("b", 3000.0, vec!["a"]),
            ],
        );
        let result = calculate_critical_path(&wf, &make_machine()).unwrap();

        assert!((result.critical_path_length - 6.0).abs() < 1e-9);
        assert_eq!(result.critical_path_tasks, make_critical_set(&["a", "b", "c"]));
        assert!((result.task_timings["c"].earliest_start - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_parallel_paths_with_slack() {
        // a (2s) -> target (1s)
        // b (5s) -> target (1s)
        let wf = Workflow::new(
            "0",
            vec![
                make_task("a", 2000.0, vec![]),
                make_task("b", 5000.0, vec![]),
                make_task("target", 1000.0, vec!["a", "b"]),
            ],
        );
        let result = calculate_critical_path(&wf, &make_machine()).unwrap();

        assert!((result.critical_path_length - 6.0).abs() < 1e-9);
        assert_eq!(
            result.critical_path_tasks,
            make_critical_set(&["b", "target"])
        );
        assert!((result.task_timings["a"].slack - 3.0).abs() < 1e-9);
        assert!((result.total_work - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_diamond_dependency() {
        // a -> b -> d
        // a -> c -> d
        let wf = Workflow::new(
            "0",
            vec![
                make_task("a", 1000.0, vec![]),
                make_task("b", 2000.0, vec!["a"]),
                make_task("c", 4000.0, vec!["a"]),
                make_task("d", 1000.0, vec!["b", "c"]),
            ],
        );
        let result = calculate_critical_path(&wf, &make_machine()).unwrap();

        assert!((result.critical_path_length - 6.0).abs() < 1e-9);
        assert_eq!(
            result.critical_path_tasks,
            make_critical_set(&["a", "c", "d"])
        );
    }

    #[test]
    fn test_disconnected_components_take_longest() {
        let wf = Workflow::new(
            "0",
            vec![
                make_task("a", 1000.0, vec![]),
                make_task("b", 1000.0, vec!["a"]),
                make_task("x", 7000.0, vec![]),
            ],
        );
        let length = critical_path_length(&wf, &make_machine()).unwrap();
        assert!((length - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_machine_speed_scales_length() {
        let wf = Workflow::new(
            "0",
            vec![
                make_task("a", 1000.0, vec![]),
                make_task("b", 3000.0, vec!["a"]),
            ],
        );
        let fast = MachineType::new(2000.0, 100.0).unwrap();
        let length = critical_path_length(&wf, &fast).unwrap();
        assert!((length - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_dependency_ignored() {
        let wf = Workflow::new("0", vec![make_task("a", 1000.0, vec!["missing"])]);
        let length = critical_path_length(&wf, &make_machine()).unwrap();
        assert!((length - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_circular_dependency_error() {
        // a depends on b, b depends on a; c is downstream and also stuck
        let wf = Workflow::new(
            "0",
            vec![
                make_task("root", 1000.0, vec![]),
                make_task("b", 3000.0, vec!["a"]),
                make_task("a", 5000.0, vec!["b", "root"]),
                make_task("c", 1000.0, vec!["a"]),
            ],
        );
        let result = calculate_critical_path(&wf, &make_machine());

        assert!(matches!(
            result,
            Err(AnalysisError::CyclicGraph(ref ids))
                if ids == &vec!["a".to_string(), "b".to_string(), "c".to_string()]
        ));
    }

    #[test]
    fn test_self_dependency_is_cycle() {
        let wf = Workflow::new("0", vec![make_task("a", 1000.0, vec!["a"])]);
        assert!(matches!(
            critical_path_length(&wf, &make_machine()),
            Err(AnalysisError::CyclicGraph(_))
        ));
    }
}
