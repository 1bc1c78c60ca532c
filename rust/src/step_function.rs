//! Piecewise-constant functions of time.
//!
//! Power caps and measured power usage are both represented as step functions:
//! constant between discrete jump points and right-continuous at each jump.

use pyo3::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Bound;

use crate::error::AnalysisError;

/// Jump time with a total order so it can key a `BTreeMap`.
///
/// Negative zero is folded into positive zero so both address the same jump.
#[derive(Clone, Copy, Debug)]
struct Time(f64);

impl Time {
    #[inline]
    fn new(t: f64) -> Self {
        Self(t + 0.0)
    }
}

impl PartialEq for Time {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Time {}

impl PartialOrd for Time {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Time {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// A right-continuous piecewise-constant function on `[0, ∞)`.
///
/// Invariant: jump times are finite and `>= 0`, and the map keeps them sorted
/// and unique.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepFunction {
    initial_value: f64,
    jumps: BTreeMap<Time, f64>,
}

impl StepFunction {
    /// Create a function with no jumps that is `initial_value` everywhere.
    pub fn new(initial_value: f64) -> Self {
        Self {
            initial_value,
            jumps: BTreeMap::new(),
        }
    }

    /// Build a function by adding each `(time, value)` pair in order.
    pub fn from_pairs<I>(initial_value: f64, pairs: I) -> Result<Self, AnalysisError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut f = Self::new(initial_value);
        for (time, value) in pairs {
            f.add_jump(time, value)?;
        }
        Ok(f)
    }

    /// Build a function from parallel `times` and `values` lists.
    ///
    /// Lengths are checked before any jump is added.
    pub fn from_parallel_lists(
        initial_value: f64,
        times: &[f64],
        values: &[f64],
    ) -> Result<Self, AnalysisError> {
        if times.len() != values.len() {
            return Err(AnalysisError::MismatchedLength {
                times: times.len(),
                values: values.len(),
            });
        }
        Self::from_pairs(
            initial_value,
            times.iter().copied().zip(values.iter().copied()),
        )
    }

    /// Value on `[0, first_jump_time)`.
    pub fn initial_value(&self) -> f64 {
        self.initial_value
    }

    /// Set the value in force from `time` onward, overwriting any jump already at `time`.
    pub fn add_jump(&mut self, time: f64, value: f64) -> Result<(), AnalysisError> {
        if !time.is_finite() || time < 0.0 {
            return Err(AnalysisError::InvalidArgument(format!(
                "jump time must be a finite non-negative number, got {}",
                time
            )));
        }
        self.jumps.insert(Time::new(time), value);
        Ok(())
    }

    /// Value of the latest jump at or before `t`, or the initial value if there is none.
    pub fn value_at(&self, t: f64) -> f64 {
        self.jumps
            .range(..=Time::new(t))
            .next_back()
            .map(|(_, &v)| v)
            .unwrap_or(self.initial_value)
    }

    /// Integral of the function over `[a, b]`.
    pub fn integral(&self, a: f64, b: f64) -> Result<f64, AnalysisError> {
        // Also rejects NaN bounds
        if !(a <= b) {
            return Err(AnalysisError::InvalidArgument(format!(
                "integral bounds must satisfy a <= b, got a={} b={}",
                a, b
            )));
        }
        if a == b {
            return Ok(0.0);
        }

        let mut total = 0.0;
        let mut cursor = a;
        let mut value = self.value_at(a);
        let interior = (
            Bound::Excluded(Time::new(a)),
            Bound::Excluded(Time::new(b)),
        );
        for (&Time(t), &v) in self.jumps.range(interior) {
            total += value * (t - cursor);
            cursor = t;
            value = v;
        }
        total += value * (b - cursor);
        Ok(total)
    }

    /// Pointwise difference `self(t) - other(t)`.
    ///
    /// The result carries a jump at every jump time of either operand, some of which
    /// may not change the value.
    pub fn minus(&self, other: &StepFunction) -> StepFunction {
        let mut result = StepFunction::new(self.initial_value - other.initial_value);
        for &time in self.jumps.keys().chain(other.jumps.keys()) {
            result
                .jumps
                .insert(time, self.value_at(time.0) - other.value_at(time.0));
        }
        result
    }

    /// All `(time, value)` jumps in ascending time order.
    pub fn jumps(&self) -> Vec<(f64, f64)> {
        self.jumps.iter().map(|(&Time(t), &v)| (t, v)).collect()
    }

    /// Jump values in ascending time order.
    pub fn jump_values(&self) -> Vec<f64> {
        self.jumps.values().copied().collect()
    }

    /// The jump with the greatest time.
    pub fn final_jump(&self) -> Result<(f64, f64), AnalysisError> {
        self.jumps
            .iter()
            .next_back()
            .map(|(&Time(t), &v)| (t, v))
            .ok_or(AnalysisError::EmptyFunction)
    }

    /// Largest jump value, falling back to the initial value when there are no jumps.
    pub fn max_jump_value(&self) -> f64 {
        self.jumps
            .values()
            .copied()
            .reduce(f64::max)
            .unwrap_or(self.initial_value)
    }

    /// Number of jumps.
    pub fn len(&self) -> usize {
        self.jumps.len()
    }

    /// True when no jumps have been added.
    pub fn is_empty(&self) -> bool {
        self.jumps.is_empty()
    }
}

#[pymethods]
impl StepFunction {
    #[new]
    #[pyo3(signature = (initial_value=0.0))]
    fn py_new(initial_value: f64) -> Self {
        Self::new(initial_value)
    }

    #[getter(initial_value)]
    fn py_initial_value(&self) -> f64 {
        self.initial_value
    }

    #[pyo3(name = "add_jump")]
    fn py_add_jump(&mut self, time: f64, value: f64) -> PyResult<()> {
        Ok(self.add_jump(time, value)?)
    }

    #[pyo3(name = "value_at")]
    fn py_value_at(&self, t: f64) -> f64 {
        self.value_at(t)
    }

    #[pyo3(name = "integral")]
    fn py_integral(&self, a: f64, b: f64) -> PyResult<f64> {
        Ok(self.integral(a, b)?)
    }

    #[pyo3(name = "minus")]
    fn py_minus(&self, other: PyRef<'_, StepFunction>) -> StepFunction {
        self.minus(&other)
    }

    #[pyo3(name = "jumps")]
    fn py_jumps(&self) -> Vec<(f64, f64)> {
        self.jumps()
    }

    #[pyo3(name = "jump_values")]
    fn py_jump_values(&self) -> Vec<f64> {
        self.jump_values()
    }

    #[pyo3(name = "final_jump")]
    fn py_final_jump(&self) -> PyResult<(f64, f64)> {
        Ok(self.final_jump()?)
    }

    fn __len__(&self) -> usize {
        self.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "StepFunction(initial_value={}, jumps={:?})",
            self.initial_value,
            self.jumps()
        )
    }
}
