//! Power budget analysis.
//!
//! Builds synthetic power caps from workload estimates and computes the best
//! finish time achievable under a cap. Nothing here simulates; a cap is built
//! before a run and the run's result is scored against the optimum afterwards.

use crate::config::AnalysisConfig;
use crate::critical_path::{calculate_critical_path, critical_path_length};
use crate::error::AnalysisError;
use crate::models::{AnalysisResult, MachineType, Workflow};
use crate::step_function::StepFunction;
use crate::{log_changes, log_checks, log_debug};

/// Constant power that supplies exactly the energy `workflow` needs over `time_estimate`.
pub fn estimate_base_power(
    workflow: &Workflow,
    machine: &MachineType,
    time_estimate: f64,
) -> Result<f64, AnalysisError> {
    if !(time_estimate > 0.0) {
        return Err(AnalysisError::InvalidArgument(format!(
            "time estimate must be positive, got {}",
            time_estimate
        )));
    }
    let total_energy_needed = workflow.total_instructions() * machine.energy_per_instruction();
    Ok(total_energy_needed / time_estimate)
}

/// Cap holding `base_power`, dipping to `base_power * dip_fraction` over the
/// middle third of `time_estimate`, then returning to `base_power` for good.
pub fn build_dipped_cap(
    base_power: f64,
    dip_fraction: f64,
    time_estimate: f64,
) -> Result<StepFunction, AnalysisError> {
    StepFunction::from_pairs(
        0.0,
        [
            (0.0, base_power),
            (time_estimate / 3.0, base_power * dip_fraction),
            (2.0 * time_estimate / 3.0, base_power),
        ],
    )
}

/// Cap built from parallel `times` and `values` lists, zero before the first jump.
pub fn power_cap_from_lists(times: &[f64], values: &[f64]) -> Result<StepFunction, AnalysisError> {
    StepFunction::from_parallel_lists(0.0, times, values)
}

/// Optimal makespan achievable under `power_cap`.
///
/// Every joule the cap allows before its final jump is assumed to be turned into
/// work, and the rest of the work runs at the final power level. This only holds
/// when the workflow cannot finish before the cap's last change, so that case is
/// reported as `ModelAssumptionViolated`.
pub fn optimal_makespan(
    power_cap: &StepFunction,
    machine: &MachineType,
    workflow: &Workflow,
) -> Result<f64, AnalysisError> {
    let (last_jump_time, last_jump_power) = power_cap.final_jump()?;
    let instructions_per_joule = machine.instructions_per_joule();

    let base_energy = power_cap.integral(0.0, last_jump_time)?;
    let base_instructions = base_energy * instructions_per_joule;

    let remaining_instructions = workflow.total_instructions() - base_instructions;
    if remaining_instructions < 0.0 {
        return Err(AnalysisError::ModelAssumptionViolated(format!(
            "workload of {} MInstructions finishes before the final cap change at t={} \
             ({} MInstructions possible by then)",
            workflow.total_instructions(),
            last_jump_time,
            base_instructions
        )));
    }
    if remaining_instructions > 0.0 && !(last_jump_power > 0.0) {
        return Err(AnalysisError::ModelAssumptionViolated(format!(
            "{} MInstructions remain after t={} but the final cap is {} W",
            remaining_instructions, last_jump_time, last_jump_power
        )));
    }

    let remaining_energy = remaining_instructions / instructions_per_joule;
    let remaining_time = if remaining_energy == 0.0 {
        0.0
    } else {
        remaining_energy / last_jump_power
    };
    Ok(last_jump_time + remaining_time)
}

/// A synthetic cap together with the dip fraction it was built from.
#[derive(Clone, Debug)]
pub struct DippedCap {
    pub dip_fraction: f64,
    pub cap: StepFunction,
}

/// Build one dipped cap per configured dip fraction.
///
/// The base power is sized so that the uncapped energy need would be met by the
/// time the critical path bound elapses.
pub fn dipped_caps(
    workflow: &Workflow,
    machine: &MachineType,
    config: &AnalysisConfig,
) -> Result<Vec<DippedCap>, AnalysisError> {
    let time_estimate = critical_path_length(workflow, machine)?;
    let base_power = estimate_base_power(workflow, machine, time_estimate)?;
    log_changes!(
        config.verbosity,
        "Workflow {}: critical path {:.3}s, base power {:.3}W",
        workflow.id,
        time_estimate,
        base_power
    );

    config
        .dip_fractions
        .iter()
        .map(|&dip_fraction| {
            let cap = build_dipped_cap(base_power, dip_fraction, time_estimate)?;
            log_checks!(
                config.verbosity,
                "dip {}: jumps {:?}",
                dip_fraction,
                cap.jumps()
            );
            Ok(DippedCap { dip_fraction, cap })
        })
        .collect()
}

/// Score a finished run against the optimum achievable under its cap.
pub fn analyze_run(
    power_cap: &StepFunction,
    power_usage: &StepFunction,
    achieved_makespan: f64,
    machine: &MachineType,
    workflow: &Workflow,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    if !(achieved_makespan >= 0.0) {
        return Err(AnalysisError::InvalidArgument(format!(
            "achieved makespan must be non-negative, got {}",
            achieved_makespan
        )));
    }

    let cp = calculate_critical_path(workflow, machine)?;
    log_debug!(
        config.verbosity,
        "critical path: length {:.3}s over {} tasks, total work {:.3}s",
        cp.critical_path_length,
        cp.critical_path_tasks.len(),
        cp.total_work
    );

    let optimal = optimal_makespan(power_cap, machine, workflow)?;
    let ratio = achieved_makespan / optimal;
    log_changes!(config.verbosity, "optimal makespan: {:.6}", optimal);
    log_changes!(config.verbosity, "actual makespan: {:.6}", achieved_makespan);
    log_changes!(config.verbosity, "ratio: {:.6}", ratio);

    Ok(AnalysisResult {
        optimal_makespan: optimal,
        critical_path_length: cp.critical_path_length,
        achieved_makespan,
        ratio,
        max_power_usage: power_usage.max_jump_value(),
        total_energy_consumed: power_usage.integral(0.0, achieved_makespan)?,
        power_cap: power_cap.clone(),
        power_usage: power_usage.clone(),
        power_gap: power_cap.minus(power_usage),
    })
}
