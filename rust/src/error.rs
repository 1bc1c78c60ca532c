//! Error type shared by every analysis operation.

use thiserror::Error;

/// Errors raised by the analytical core.
///
/// All of these are deterministic consistency checks on in-memory data, so callers
/// are expected to abort the analysis rather than retry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Step function has no jumps")]
    EmptyFunction,
    #[error("Circular dependency detected among tasks: {0:?}")]
    CyclicGraph(Vec<String>),
    #[error("Optimal makespan model assumption violated: {0}")]
    ModelAssumptionViolated(String),
    #[error("Mismatched lengths: {times} times but {values} values")]
    MismatchedLength { times: usize, values: usize },
}

impl From<AnalysisError> for pyo3::PyErr {
    fn from(err: AnalysisError) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
