//! Power-capped workflow analysis.
//!
//! Computes critical path bounds for workflow DAGs, derives synthetic power caps
//! from them, and scores simulated runs against the best makespan a cap allows.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;

mod config;
pub mod critical_path;
mod error;
mod interner;
pub mod logging;
mod models;
pub mod power_budget;
pub mod report;
pub mod step_function;

pub use config::AnalysisConfig;
pub use critical_path::{calculate_critical_path, CriticalPathResult, TaskTiming};
pub use error::AnalysisError;
pub use models::{AnalysisResult, MachineType, RunStats, Task, Workflow};
pub use power_budget::{
    analyze_run, build_dipped_cap, dipped_caps, estimate_base_power, optimal_makespan,
    power_cap_from_lists, DippedCap,
};
pub use report::{format_power_log, format_slr_plot_data, format_step_function};
pub use step_function::StepFunction;

/// Lower bound on the makespan of a workflow from its longest dependency chain.
///
/// # Raises
/// * ValueError if the workflow has a dependency cycle or duplicate task IDs
#[pyfunction]
#[pyo3(name = "critical_path_length")]
fn py_critical_path_length(
    workflow: PyRef<'_, Workflow>,
    machine: PyRef<'_, MachineType>,
) -> PyResult<f64> {
    Ok(critical_path::critical_path_length(&workflow, &machine)?)
}

/// Constant power that would deliver the workflow's energy need in `time_estimate`.
#[pyfunction]
#[pyo3(name = "estimate_base_power")]
fn py_estimate_base_power(
    workflow: PyRef<'_, Workflow>,
    machine: PyRef<'_, MachineType>,
    time_estimate: f64,
) -> PyResult<f64> {
    Ok(estimate_base_power(&workflow, &machine, time_estimate)?)
}

/// Power cap with a dip to `base_power * dip_fraction` over the middle third of the run.
#[pyfunction]
#[pyo3(name = "build_dipped_cap")]
fn py_build_dipped_cap(
    base_power: f64,
    dip_fraction: f64,
    time_estimate: f64,
) -> PyResult<StepFunction> {
    Ok(build_dipped_cap(base_power, dip_fraction, time_estimate)?)
}

/// Best achievable makespan under a power cap.
///
/// # Raises
/// * ValueError if the cap has no jumps or the workflow would finish before the
///   cap's final change
#[pyfunction]
#[pyo3(name = "optimal_makespan")]
fn py_optimal_makespan(
    power_cap: PyRef<'_, StepFunction>,
    machine: PyRef<'_, MachineType>,
    workflow: PyRef<'_, Workflow>,
) -> PyResult<f64> {
    Ok(optimal_makespan(&power_cap, &machine, &workflow)?)
}

/// Build a power cap from parallel lists of jump times and values.
///
/// # Raises
/// * ValueError if the lists differ in length or a time is negative
#[pyfunction]
#[pyo3(name = "power_cap_from_lists")]
fn py_power_cap_from_lists(times: Vec<f64>, values: Vec<f64>) -> PyResult<StepFunction> {
    Ok(power_cap_from_lists(&times, &values)?)
}

/// Build one dipped cap per configured dip fraction.
///
/// # Returns
/// * List of (dip_fraction, StepFunction) pairs in configuration order
#[pyfunction]
#[pyo3(name = "dipped_caps", signature = (workflow, machine, config=None))]
fn py_dipped_caps(
    workflow: PyRef<'_, Workflow>,
    machine: PyRef<'_, MachineType>,
    config: Option<AnalysisConfig>,
) -> PyResult<Vec<(f64, StepFunction)>> {
    let config = config.unwrap_or_default();
    let caps = dipped_caps(&workflow, &machine, &config)?;
    Ok(caps.into_iter().map(|d| (d.dip_fraction, d.cap)).collect())
}

/// Score a finished run against the optimum achievable under its cap.
#[pyfunction]
#[pyo3(
    name = "analyze_run",
    signature = (power_cap, power_usage, achieved_makespan, machine, workflow, config=None)
)]
fn py_analyze_run(
    power_cap: PyRef<'_, StepFunction>,
    power_usage: PyRef<'_, StepFunction>,
    achieved_makespan: f64,
    machine: PyRef<'_, MachineType>,
    workflow: PyRef<'_, Workflow>,
    config: Option<AnalysisConfig>,
) -> PyResult<AnalysisResult> {
    let config = config.unwrap_or_default();
    Ok(analyze_run(
        &power_cap,
        &power_usage,
        achieved_makespan,
        &machine,
        &workflow,
        &config,
    )?)
}

/// Format a step function as one line of the power log.
#[pyfunction]
#[pyo3(name = "format_step_function")]
fn py_format_step_function(label: &str, f: PyRef<'_, StepFunction>) -> String {
    format_step_function(label, &f)
}

/// Format run statistics for the SLR plot.
#[pyfunction]
#[pyo3(name = "format_slr_plot_data")]
fn py_format_slr_plot_data(stats: PyRef<'_, RunStats>) -> String {
    format_slr_plot_data(&stats)
}

/// The powercap.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Core data types
    m.add_class::<StepFunction>()?;
    m.add_class::<Task>()?;
    m.add_class::<Workflow>()?;
    m.add_class::<MachineType>()?;
    m.add_class::<AnalysisResult>()?;
    m.add_class::<RunStats>()?;

    // Config types
    m.add_class::<AnalysisConfig>()?;

    // Analysis
    m.add_function(wrap_pyfunction!(py_critical_path_length, m)?)?;
    m.add_function(wrap_pyfunction!(py_estimate_base_power, m)?)?;
    m.add_function(wrap_pyfunction!(py_build_dipped_cap, m)?)?;
    m.add_function(wrap_pyfunction!(py_optimal_makespan, m)?)?;
    m.add_function(wrap_pyfunction!(py_power_cap_from_lists, m)?)?;
    m.add_function(wrap_pyfunction!(py_dipped_caps, m)?)?;
    m.add_function(wrap_pyfunction!(py_analyze_run, m)?)?;

    // Reporting
    m.add_function(wrap_pyfunction!(py_format_step_function, m)?)?;
    m.add_function(wrap_pyfunction!(py_format_slr_plot_data, m)?)?;

    Ok(())
}
