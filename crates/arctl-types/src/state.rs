// ─────────────────────────────────────────────────────────────────────
// ARCTL — Controller State Types
// ─────────────────────────────────────────────────────────────────────

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::PolicyConfig;
use crate::metrics::SmoothedMetrics;

/// Operating regime of the controller. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationalMode {
    Standard,
    Emergency,
    Cooldown,
    /// Terminal and absorbing.
    Fallback,
}

impl OperationalMode {
    /// Short telemetry code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Standard => "STD",
            Self::Emergency => "EMG",
            Self::Cooldown => "CDN",
            Self::Fallback => "FBK",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Standard => "STANDARD",
            Self::Emergency => "EMERGENCY",
            Self::Cooldown => "COOLDOWN",
            Self::Fallback => "FALLBACK",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Fallback)
    }
}

impl fmt::Display for OperationalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Wall-clock regime of the delta since the last genuine interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeState {
    /// Continuous conversation.
    Sync,
    /// The user lived through time the model did not see.
    Lag,
    /// Long absence; eligible for the ontological reset.
    Gap,
}

impl TimeState {
    pub fn name(self) -> &'static str {
        match self {
            Self::Sync => "SYNC",
            Self::Lag => "LAG",
            Self::Gap => "GAP",
        }
    }
}

impl fmt::Display for TimeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decoder sampling parameters selected for the active mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    pub temperature: f64,
    pub top_p: Option<f64>,
}

impl SamplingConfig {
    pub fn new(temperature: f64) -> Self {
        Self {
            temperature,
            top_p: None,
        }
    }
}

/// Complete immutable snapshot of the controller.
///
/// Replaced wholesale by the kernel on every performed step; never
/// mutated in place. The caller owns the value and threads it from one
/// call to the next. The `with_*` helpers build modified copies for
/// callers that need to seed a specific snapshot.
///
/// # Invariants
///
/// - `energy <= max_energy` of the policy that produced it.
/// - `logical_time` never decreases across a lineage.
/// - Once `mode` is FALLBACK it stays FALLBACK.
/// - `reset_used` goes false→true at most once and never back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemState {
    pub mode: OperationalMode,
    pub energy: u32,
    pub logical_time: u64,
    /// Wall-clock seconds of the last genuine interaction. Resets do not
    /// touch it.
    pub last_interaction: f64,
    /// Wall-clock seconds of the last performed step, reset steps included.
    pub last_call: f64,
    /// Logical time at which `mode` began.
    pub mode_entered_at: u64,
    pub smoothed: SmoothedMetrics,
    pub reset_used: bool,
}

impl SystemState {
    /// Fresh lineage: STANDARD, full energy, logical time zero.
    pub fn initial(config: &PolicyConfig, now: f64) -> Self {
        let now = if now.is_finite() { now } else { 0.0 };
        Self {
            mode: OperationalMode::Standard,
            energy: config.max_energy,
            logical_time: 0,
            last_interaction: now,
            last_call: now,
            mode_entered_at: 0,
            smoothed: SmoothedMetrics::default(),
            reset_used: false,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.mode.is_terminal()
    }

    /// Copy in `mode`, entered at the current logical time.
    pub fn with_mode(&self, mode: OperationalMode) -> Self {
        Self {
            mode,
            mode_entered_at: self.logical_time,
            ..self.clone()
        }
    }

    pub fn with_energy(&self, energy: u32) -> Self {
        Self {
            energy,
            ..self.clone()
        }
    }

    pub fn with_logical_time(&self, logical_time: u64) -> Self {
        Self {
            logical_time,
            ..self.clone()
        }
    }

    pub fn with_mode_entered_at(&self, mode_entered_at: u64) -> Self {
        Self {
            mode_entered_at,
            ..self.clone()
        }
    }

    pub fn with_smoothed(&self, smoothed: SmoothedMetrics) -> Self {
        Self {
            smoothed,
            ..self.clone()
        }
    }

    pub fn with_reset_used(&self, reset_used: bool) -> Self {
        Self {
            reset_used,
            ..self.clone()
        }
    }
}
