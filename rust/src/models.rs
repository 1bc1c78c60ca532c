//! Core data types for the analysis: workflows, machines and results.

use pyo3::prelude::*;

use crate::error::AnalysisError;
use crate::step_function::StepFunction;

/// A single task in a workflow.
#[pyclass]
#[derive(Clone, Debug)]
pub struct Task {
    #[pyo3(get, set)]
    pub id: String,
    /// Work in millions of instructions.
    #[pyo3(get, set)]
    pub size: f64,
    /// IDs of tasks that must finish before this one can start.
    #[pyo3(get, set)]
    pub dependencies: Vec<String>,
}

impl Task {
    pub fn new(id: impl Into<String>, size: f64, dependencies: Vec<String>) -> Self {
        Self {
            id: id.into(),
            size,
            dependencies,
        }
    }
}

#[pymethods]
impl Task {
    #[new]
    #[pyo3(signature = (id, size, dependencies=None))]
    fn py_new(id: String, size: f64, dependencies: Option<Vec<String>>) -> Self {
        Self::new(id, size, dependencies.unwrap_or_default())
    }

    fn __repr__(&self) -> String {
        format!(
            "Task(id={:?}, size={}, deps={})",
            self.id,
            self.size,
            self.dependencies.len()
        )
    }
}

/// A workflow DAG. Precedence edges are carried on each task's `dependencies`.
#[pyclass]
#[derive(Clone, Debug, Default)]
pub struct Workflow {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub tasks: Vec<Task>,
}

impl Workflow {
    pub fn new(id: impl Into<String>, tasks: Vec<Task>) -> Self {
        Self {
            id: id.into(),
            tasks,
        }
    }

    /// Total work of all tasks in millions of instructions.
    pub fn total_instructions(&self) -> f64 {
        self.tasks.iter().map(|t| t.size).sum()
    }

    /// Multiply every task size by `factor`. Factors of 1.0 or less are ignored.
    pub fn scale_sizes(&mut self, factor: f64) {
        if factor > 1.0 {
            for task in &mut self.tasks {
                task.size *= factor;
            }
        }
    }
}

#[pymethods]
impl Workflow {
    #[new]
    #[pyo3(signature = (id, tasks=None))]
    fn py_new(id: String, tasks: Option<Vec<Task>>) -> Self {
        Self::new(id, tasks.unwrap_or_default())
    }

    #[pyo3(name = "total_instructions")]
    fn py_total_instructions(&self) -> f64 {
        self.total_instructions()
    }

    #[pyo3(name = "scale_sizes")]
    fn py_scale_sizes(&mut self, factor: f64) {
        self.scale_sizes(factor)
    }

    fn __len__(&self) -> usize {
        self.tasks.len()
    }

    fn __repr__(&self) -> String {
        format!("Workflow(id={:?}, tasks={})", self.id, self.tasks.len())
    }
}

/// The single machine type the whole workload runs on.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct MachineType {
    /// Millions of instructions per second.
    #[pyo3(get)]
    pub speed: f64,
    /// Watts drawn at full utilization.
    #[pyo3(get)]
    pub power_draw: f64,
}

impl MachineType {
    pub fn new(speed: f64, power_draw: f64) -> Result<Self, AnalysisError> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(AnalysisError::InvalidArgument(format!(
                "machine speed must be positive, got {}",
                speed
            )));
        }
        if !(power_draw.is_finite() && power_draw > 0.0) {
            return Err(AnalysisError::InvalidArgument(format!(
                "machine power draw must be positive, got {}",
                power_draw
            )));
        }
        Ok(Self { speed, power_draw })
    }

    /// Joules per million instructions.
    pub fn energy_per_instruction(&self) -> f64 {
        self.power_draw / self.speed
    }

    /// Millions of instructions per joule.
    pub fn instructions_per_joule(&self) -> f64 {
        self.speed / self.power_draw
    }
}

#[pymethods]
impl MachineType {
    #[new]
    fn py_new(speed: f64, power_draw: f64) -> PyResult<Self> {
        Ok(Self::new(speed, power_draw)?)
    }

    #[pyo3(name = "energy_per_instruction")]
    fn py_energy_per_instruction(&self) -> f64 {
        self.energy_per_instruction()
    }

    #[pyo3(name = "instructions_per_joule")]
    fn py_instructions_per_joule(&self) -> f64 {
        self.instructions_per_joule()
    }

    fn __repr__(&self) -> String {
        format!(
            "MachineType(speed={}, power_draw={})",
            self.speed, self.power_draw
        )
    }
}

/// Result of scoring one simulated run against its power cap.
#[pyclass]
#[derive(Clone, Debug)]
pub struct AnalysisResult {
    #[pyo3(get)]
    pub optimal_makespan: f64,
    #[pyo3(get)]
    pub critical_path_length: f64,
    #[pyo3(get)]
    pub achieved_makespan: f64,
    /// `achieved_makespan / optimal_makespan`.
    #[pyo3(get)]
    pub ratio: f64,
    #[pyo3(get)]
    pub max_power_usage: f64,
    /// Energy drawn by the run over `[0, achieved_makespan]`.
    #[pyo3(get)]
    pub total_energy_consumed: f64,
    #[pyo3(get)]
    pub power_cap: StepFunction,
    #[pyo3(get)]
    pub power_usage: StepFunction,
    /// `power_cap - power_usage`.
    #[pyo3(get)]
    pub power_gap: StepFunction,
}

#[pymethods]
impl AnalysisResult {
    fn __repr__(&self) -> String {
        format!(
            "AnalysisResult(optimal={}, achieved={}, ratio={})",
            self.optimal_makespan, self.achieved_makespan, self.ratio
        )
    }
}

/// Per-run summary written out for SLR plotting.
#[pyclass]
#[derive(Clone, Debug, Default)]
pub struct RunStats {
    #[pyo3(get, set)]
    pub application: String,
    #[pyo3(get, set)]
    pub size: u32,
    #[pyo3(get, set)]
    pub dip_fraction: f64,
    #[pyo3(get, set)]
    pub optimal_makespan: f64,
    #[pyo3(get, set)]
    pub makespan: f64,
}

#[pymethods]
impl RunStats {
    #[new]
    fn new(
        application: String,
        size: u32,
        dip_fraction: f64,
        optimal_makespan: f64,
        makespan: f64,
    ) -> Self {
        Self {
            application,
            size,
            dip_fraction,
            optimal_makespan,
            makespan,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "RunStats(application={:?}, size={}, dip_fraction={})",
            self.application, self.size, self.dip_fraction
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_instructions() {
        let wf = Workflow::new(
            "0",
            vec![
                Task::new("a", 100.0, vec![]),
                Task::new("b", 250.5, vec!["a".to_string()]),
            ],
        );
        assert_eq!(wf.total_instructions(), 350.5);
    }

    #[test]
    fn test_scale_sizes_only_grows() {
        let mut wf = Workflow::new("0", vec![Task::new("a", 10.0, vec![])]);
        wf.scale_sizes(0.5);
        assert_eq!(wf.tasks[0].size, 10.0);
        wf.scale_sizes(3.0);
        assert_eq!(wf.tasks[0].size, 30.0);
    }

    #[test]
    fn test_machine_derived_quantities() {
        let m = MachineType::new(1000.0, 100.0).unwrap();
        assert_eq!(m.energy_per_instruction(), 0.1);
        assert_eq!(m.instructions_per_joule(), 10.0);
    }

    #[test]
    fn test_machine_rejects_non_positive() {
        assert!(matches!(
            MachineType::new(0.0, 100.0),
            Err(AnalysisError::InvalidArgument(_))
        ));
        assert!(matches!(
            MachineType::new(1000.0, -1.0),
            Err(AnalysisError::InvalidArgument(_))
        ));
    }
}
