// ─────────────────────────────────────────────────────────────────────
// ARCTL — Controller Kernel PyO3 FFI Bindings
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
// Note: #[deny(unsafe_code)] not applied — PyO3 proc macros generate
// unsafe blocks internally. All hand-written code in this crate is safe.
//! Python-callable wrappers around the ARCTL controller kernel.
//!
//! # FFI Safety
//!
//! - Every `PolicyConfig` is validated before storage; invalid values
//!   raise `ValueError` at construction, never at `step` time.
//! - All exposed types are immutable value wrappers. `step` returns a new
//!   `SystemState`; nothing is mutated in place on either side.
//! - No Python callbacks cross the boundary, so the GIL is never
//!   re-acquired from Rust.
//!
//! Install: `pip install -e crates/arctl-ffi` (requires maturin).
//!
//! Usage from Python:
//! ```python
//! from arctl_kernel import PolicyConfig, RawMetrics, SystemState, step
//!
//! cfg = PolicyConfig(smoothing_alpha=1.0)
//! state = SystemState.initial(cfg, now=0.0)
//! state = step(RawMetrics(0.5, 0.0, 0.9), state, 1.0, cfg)
//! assert state.mode == "EMERGENCY"
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use arctl_core::{chronos, StepOutcome};
use arctl_types::{PolicyConfig, RawMetrics, SystemState, ValidatedPolicy};

fn value_error(e: impl ToString) -> PyErr {
    PyValueError::new_err(e.to_string())
}

// ─── PyPolicyConfig ─────────────────────────────────────────────────

/// Python-visible validated controller policy.
#[pyclass(name = "PolicyConfig", frozen)]
#[derive(Clone)]
struct PyPolicyConfig {
    inner: ValidatedPolicy,
}

#[pymethods]
impl PyPolicyConfig {
    #[new]
    #[pyo3(signature = (
        max_energy = 10,
        emergency_cost = 3,
        restore_amount = 1,
        reset_credit = 1,
        repetition_threshold = 0.6,
        smoothing_alpha = 0.3,
        emergency_timeout = 5,
        cooldown_duration = 2,
        logical_step = 1,
        lag_threshold_s = 60.0,
        absence_threshold_s = 86_400.0,
        stutter_epsilon_s = 0.01,
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        max_energy: u32,
        emergency_cost: u32,
        restore_amount: u32,
        reset_credit: u32,
        repetition_threshold: f64,
        smoothing_alpha: f64,
        emergency_timeout: u64,
        cooldown_duration: u64,
        logical_step: u64,
        lag_threshold_s: f64,
        absence_threshold_s: f64,
        stutter_epsilon_s: f64,
    ) -> PyResult<Self> {
        let config = PolicyConfig {
            max_energy,
            emergency_cost,
            restore_amount,
            reset_credit,
            repetition_threshold,
            smoothing_alpha,
            emergency_timeout,
            cooldown_duration,
            logical_step,
            lag_threshold_s,
            absence_threshold_s,
            stutter_epsilon_s,
            ..Default::default()
        };
        let inner = config.into_validated().map_err(value_error)?;
        Ok(Self { inner })
    }

    /// Construct from JSON string. Missing fields take their defaults.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let inner = ValidatedPolicy::from_json(json).map_err(value_error)?;
        Ok(Self { inner })
    }

    fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner).map_err(value_error)
    }

    #[getter]
    fn max_energy(&self) -> u32 {
        self.inner.max_energy
    }

    #[getter]
    fn emergency_cost(&self) -> u32 {
        self.inner.emergency_cost
    }

    #[getter]
    fn repetition_threshold(&self) -> f64 {
        self.inner.repetition_threshold
    }

    #[getter]
    fn smoothing_alpha(&self) -> f64 {
        self.inner.smoothing_alpha
    }

    fn __repr__(&self) -> String {
        format!(
            "PolicyConfig(max_energy={}, emergency_cost={}, repetition_threshold={}, smoothing_alpha={})",
            self.inner.max_energy,
            self.inner.emergency_cost,
            self.inner.repetition_threshold,
            self.inner.smoothing_alpha
        )
    }
}

// ─── PyRawMetrics ───────────────────────────────────────────────────

/// Per-step metric triple. Out-of-range values are clamped by the kernel.
#[pyclass(name = "RawMetrics", frozen)]
#[derive(Clone)]
struct PyRawMetrics {
    inner: RawMetrics,
}

#[pymethods]
impl PyRawMetrics {
    #[new]
    #[pyo3(signature = (entropy = 0.5, divergence = 0.0, repetition = 0.0))]
    fn new(entropy: f64, divergence: f64, repetition: f64) -> Self {
        Self {
            inner: RawMetrics::new(entropy, divergence, repetition),
        }
    }

    #[getter]
    fn entropy(&self) -> f64 {
        self.inner.entropy
    }

    #[getter]
    fn divergence(&self) -> f64 {
        self.inner.divergence
    }

    #[getter]
    fn repetition(&self) -> f64 {
        self.inner.repetition
    }

    fn __repr__(&self) -> String {
        format!(
            "RawMetrics(entropy={:.4}, divergence={:.4}, repetition={:.4})",
            self.inner.entropy, self.inner.divergence, self.inner.repetition
        )
    }
}

// ─── PySystemState ──────────────────────────────────────────────────

/// Immutable controller snapshot.
#[pyclass(name = "SystemState", frozen)]
#[derive(Clone)]
struct PySystemState {
    inner: SystemState,
}

#[pymethods]
impl PySystemState {
    #[staticmethod]
    #[pyo3(signature = (config, now = 0.0))]
    fn initial(config: &PyPolicyConfig, now: f64) -> Self {
        Self {
            inner: SystemState::initial(&config.inner, now),
        }
    }

    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let inner = serde_json::from_str(json).map_err(value_error)?;
        Ok(Self { inner })
    }

    fn to_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner).map_err(value_error)
    }

    #[getter]
    fn mode(&self) -> &'static str {
        self.inner.mode.name()
    }

    #[getter]
    fn mode_code(&self) -> &'static str {
        self.inner.mode.code()
    }

    #[getter]
    fn energy(&self) -> u32 {
        self.inner.energy
    }

    #[getter]
    fn logical_time(&self) -> u64 {
        self.inner.logical_time
    }

    #[getter]
    fn last_interaction(&self) -> f64 {
        self.inner.last_interaction
    }

    #[getter]
    fn mode_entered_at(&self) -> u64 {
        self.inner.mode_entered_at
    }

    #[getter]
    fn reset_used(&self) -> bool {
        self.inner.reset_used
    }

    /// `(entropy, divergence, repetition)` after smoothing.
    #[getter]
    fn smoothed(&self) -> (f64, f64, f64) {
        let s = self.inner.smoothed;
        (s.entropy, s.divergence, s.repetition)
    }

    #[getter]
    fn is_terminal(&self) -> bool {
        self.inner.is_terminal()
    }

    fn to_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let s = &self.inner;
        let dict = PyDict::new(py);
        dict.set_item("mode", s.mode.name())?;
        dict.set_item("energy", s.energy)?;
        dict.set_item("logical_time", s.logical_time)?;
        dict.set_item("last_interaction", s.last_interaction)?;
        dict.set_item("mode_entered_at", s.mode_entered_at)?;
        dict.set_item("reset_used", s.reset_used)?;
        dict.set_item("s_entropy", s.smoothed.entropy)?;
        dict.set_item("s_divergence", s.smoothed.divergence)?;
        dict.set_item("s_repetition", s.smoothed.repetition)?;
        Ok(dict)
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.inner == other.inner
    }

    fn __repr__(&self) -> String {
        format!(
            "SystemState(mode={}, energy={}, logical_time={}, reset_used={})",
            self.inner.mode, self.inner.energy, self.inner.logical_time, self.inner.reset_used
        )
    }
}

// ─── PyStepOutcome ──────────────────────────────────────────────────

/// Annotated result of `advance()`.
#[pyclass(name = "StepOutcome", frozen)]
struct PyStepOutcome {
    inner: StepOutcome,
}

#[pymethods]
impl PyStepOutcome {
    #[getter]
    fn state(&self) -> PySystemState {
        PySystemState {
            inner: self.inner.state.clone(),
        }
    }

    #[getter]
    fn performed(&self) -> bool {
        self.inner.performed
    }

    #[getter]
    fn time_state(&self) -> &'static str {
        self.inner.time_state.name()
    }

    #[getter]
    fn reset_applied(&self) -> bool {
        self.inner.reset_applied
    }

    /// Sampling temperature for the resulting mode; None when suppressed.
    #[getter]
    fn temperature(&self) -> Option<f64> {
        self.inner.sampling.map(|s| s.temperature)
    }

    #[getter]
    fn context_note(&self) -> &str {
        &self.inner.context_note
    }

    fn __repr__(&self) -> String {
        format!(
            "StepOutcome(mode={}, performed={}, time_state={}, reset_applied={})",
            self.inner.state.mode,
            self.inner.performed,
            self.inner.time_state,
            self.inner.reset_applied
        )
    }
}

// ─── Kernel functions ───────────────────────────────────────────────

/// Advance the controller by one call and return the next state.
#[pyfunction]
fn step(
    metrics: &PyRawMetrics,
    state: &PySystemState,
    now: f64,
    config: &PyPolicyConfig,
) -> PySystemState {
    PySystemState {
        inner: arctl_core::step(metrics.inner, &state.inner, now, &config.inner),
    }
}

/// Like `step()`, returning the per-call annotations as well.
#[pyfunction]
fn advance(
    metrics: &PyRawMetrics,
    state: &PySystemState,
    now: f64,
    config: &PyPolicyConfig,
) -> PyStepOutcome {
    PyStepOutcome {
        inner: arctl_core::advance(metrics.inner, &state.inner, now, &config.inner),
    }
}

/// Telemetry snapshot of a state as a dict.
#[pyfunction]
fn diagnostics<'py>(
    py: Python<'py>,
    state: &PySystemState,
    now: f64,
    config: &PyPolicyConfig,
) -> PyResult<Bound<'py, PyDict>> {
    let d = arctl_core::diagnostics(&state.inner, now, &config.inner);
    let dict = PyDict::new(py);
    dict.set_item("days_since_last_interaction", d.days_since_last_interaction)?;
    dict.set_item("energy_level", d.energy)?;
    dict.set_item("max_energy", d.max_energy)?;
    dict.set_item("current_mode", d.mode_code)?;
    dict.set_item("time_state", d.time_state.name())?;
    dict.set_item("logical_time", d.logical_time)?;
    dict.set_item("time_in_mode", d.time_in_mode)?;
    dict.set_item("reset_used", d.reset_used)?;
    dict.set_item("is_terminal", d.is_terminal)?;
    Ok(dict)
}

/// Chronos: classify two timestamps and render the sync note.
///
/// Returns `(time_state, context_note)`.
#[pyfunction]
fn chronos_sync(prev_ts: f64, now: f64, config: &PyPolicyConfig) -> (&'static str, String) {
    let (state, note) = chronos::sync(prev_ts, now, &config.inner);
    (state.name(), note)
}

// ─── Module ─────────────────────────────────────────────────────────

#[pymodule]
fn arctl_kernel(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyPolicyConfig>()?;
    m.add_class::<PyRawMetrics>()?;
    m.add_class::<PySystemState>()?;
    m.add_class::<PyStepOutcome>()?;
    m.add_function(wrap_pyfunction!(step, m)?)?;
    m.add_function(wrap_pyfunction!(advance, m)?)?;
    m.add_function(wrap_pyfunction!(diagnostics, m)?)?;
    m.add_function(wrap_pyfunction!(chronos_sync, m)?)?;
    Ok(())
}
