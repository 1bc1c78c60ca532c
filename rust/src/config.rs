//! Configuration types for power-cap analysis.

use pyo3::prelude::*;

/// Configuration for building synthetic power caps and reporting.
#[pyclass]
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    /// Fractions of base power held during the mid-run dip, one cap per entry
    #[pyo3(get, set)]
    pub dip_fractions: Vec<f64>,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug.
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            dip_fractions: vec![0.2, 0.5, 0.7],
            verbosity: 0,
        }
    }
}

#[pymethods]
impl AnalysisConfig {
    #[new]
    #[pyo3(signature = (dip_fractions=None, verbosity=None))]
    fn new(dip_fractions: Option<Vec<f64>>, verbosity: Option<u8>) -> Self {
        let defaults = Self::default();
        Self {
            dip_fractions: dip_fractions.unwrap_or(defaults.dip_fractions),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "AnalysisConfig(dip_fractions={:?}, verbosity={})",
            self.dip_fractions, self.verbosity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.dip_fractions, vec![0.2, 0.5, 0.7]);
        assert_eq!(config.verbosity, 0);
    }

    #[test]
    fn test_overrides_fall_back_to_defaults() {
        let config = AnalysisConfig::new(None, Some(2));
        assert_eq!(config.dip_fractions, vec![0.2, 0.5, 0.7]);
        assert_eq!(config.verbosity, 2);
    }
}
