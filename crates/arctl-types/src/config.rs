// ─────────────────────────────────────────────────────────────────────
// ARCTL — Controller Policy Configuration
// ─────────────────────────────────────────────────────────────────────

use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::error::{ArctlError, ArctlResult};
use crate::state::{OperationalMode, SamplingConfig};

/// Sampling temperature handed to the decoder for each mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeTemperatures {
    pub standard: f64,
    pub emergency: f64,
    pub cooldown: f64,
    pub fallback: f64,
}

impl Default for ModeTemperatures {
    fn default() -> Self {
        Self {
            standard: 0.7,
            emergency: 1.2,
            cooldown: 0.5,
            fallback: 0.1,
        }
    }
}

impl ModeTemperatures {
    pub fn for_mode(&self, mode: OperationalMode) -> SamplingConfig {
        let temperature = match mode {
            OperationalMode::Standard => self.standard,
            OperationalMode::Emergency => self.emergency,
            OperationalMode::Cooldown => self.cooldown,
            OperationalMode::Fallback => self.fallback,
        };
        SamplingConfig::new(temperature)
    }
}

/// Thresholds and constants for the controller kernel.
///
/// A plain record: build one, then turn it into a [`ValidatedPolicy`]
/// before handing it to the kernel. Missing JSON fields take their
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Energy ceiling; also the initial energy.
    /// Default: 10.
    pub max_energy: u32,

    /// Energy spent to enter EMERGENCY.
    /// Default: 3.
    pub emergency_cost: u32,

    /// Energy restored on every COOLDOWN step, exit step included.
    /// Default: 1.
    pub restore_amount: u32,

    /// One-time credit granted by the ontological reset.
    /// Default: 1.
    pub reset_credit: u32,

    /// Smoothed repetition at or above this triggers EMERGENCY.
    /// Default: 0.6.
    pub repetition_threshold: f64,

    /// EMA weight of the newest sample.
    /// Default: 0.3.
    pub smoothing_alpha: f64,

    /// Logical units spent in EMERGENCY before COOLDOWN.
    /// Default: 5.
    pub emergency_timeout: u64,

    /// Logical units spent in COOLDOWN before STANDARD.
    /// Default: 2.
    pub cooldown_duration: u64,

    /// Logical units advanced by each performed step.
    /// Default: 1.
    pub logical_step: u64,

    /// Wall-clock seconds below which a delta is SYNC.
    /// Default: 60.
    pub lag_threshold_s: f64,

    /// Wall-clock seconds at or above which a delta is GAP.
    /// Default: 86400 (24h).
    pub absence_threshold_s: f64,

    /// Calls closer together than this are suppressed.
    /// Default: 0.01.
    pub stutter_epsilon_s: f64,

    pub temperatures: ModeTemperatures,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            max_energy: 10,
            emergency_cost: 3,
            restore_amount: 1,
            reset_credit: 1,
            repetition_threshold: 0.6,
            smoothing_alpha: 0.3,
            emergency_timeout: 5,
            cooldown_duration: 2,
            logical_step: 1,
            lag_threshold_s: 60.0,
            absence_threshold_s: 86_400.0,
            stutter_epsilon_s: 0.01,
            temperatures: ModeTemperatures::default(),
        }
    }
}

impl PolicyConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> ArctlResult<()> {
        if self.max_energy == 0 {
            return Err(ArctlError::invalid("max_energy", "must be >= 1"));
        }
        if self.emergency_cost == 0 || self.emergency_cost > self.max_energy {
            return Err(ArctlError::invalid(
                "emergency_cost",
                format!(
                    "must be in [1, max_energy={}], got {}",
                    self.max_energy, self.emergency_cost
                ),
            ));
        }
        if self.restore_amount > self.max_energy {
            return Err(ArctlError::invalid(
                "restore_amount",
                format!(
                    "must be <= max_energy={}, got {}",
                    self.max_energy, self.restore_amount
                ),
            ));
        }
        if self.reset_credit == 0 || self.reset_credit > self.max_energy {
            return Err(ArctlError::invalid(
                "reset_credit",
                format!(
                    "must be in [1, max_energy={}], got {}",
                    self.max_energy, self.reset_credit
                ),
            ));
        }
        if !(0.0..=1.0).contains(&self.repetition_threshold) {
            return Err(ArctlError::invalid(
                "repetition_threshold",
                format!("must be in [0, 1], got {}", self.repetition_threshold),
            ));
        }
        if !(0.0..=1.0).contains(&self.smoothing_alpha) {
            return Err(ArctlError::invalid(
                "smoothing_alpha",
                format!("must be in [0, 1], got {}", self.smoothing_alpha),
            ));
        }
        if self.emergency_timeout == 0 {
            return Err(ArctlError::invalid("emergency_timeout", "must be >= 1"));
        }
        if self.cooldown_duration == 0 {
            return Err(ArctlError::invalid("cooldown_duration", "must be >= 1"));
        }
        if self.logical_step == 0 {
            return Err(ArctlError::invalid("logical_step", "must be >= 1"));
        }
        if !self.lag_threshold_s.is_finite() || self.lag_threshold_s <= 0.0 {
            return Err(ArctlError::invalid(
                "lag_threshold_s",
                format!("must be finite and > 0, got {}", self.lag_threshold_s),
            ));
        }
        if !self.absence_threshold_s.is_finite()
            || self.absence_threshold_s <= self.lag_threshold_s
        {
            return Err(ArctlError::invalid(
                "absence_threshold_s",
                format!(
                    "must be finite and > lag_threshold_s={}, got {}",
                    self.lag_threshold_s, self.absence_threshold_s
                ),
            ));
        }
        if !self.stutter_epsilon_s.is_finite() || self.stutter_epsilon_s < 0.0 {
            return Err(ArctlError::invalid(
                "stutter_epsilon_s",
                format!("must be finite and >= 0, got {}", self.stutter_epsilon_s),
            ));
        }
        let t = &self.temperatures;
        for (name, value) in [
            ("temperatures.standard", t.standard),
            ("temperatures.emergency", t.emergency),
            ("temperatures.cooldown", t.cooldown),
            ("temperatures.fallback", t.fallback),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ArctlError::invalid(
                    name,
                    format!("must be finite and >= 0, got {value}"),
                ));
            }
        }
        Ok(())
    }

    /// Validate and seal the configuration.
    pub fn into_validated(self) -> ArctlResult<ValidatedPolicy> {
        ValidatedPolicy::new(self)
    }

    /// Load from JSON string. Does not validate.
    pub fn from_json(json: &str) -> ArctlResult<Self> {
        serde_json::from_str(json).map_err(|e| ArctlError::Config(format!("JSON parse error: {e}")))
    }
}

/// A [`PolicyConfig`] that passed validation.
///
/// The only configuration type the kernel accepts, so a malformed policy
/// is rejected at construction and never reaches `step`. Read access goes
/// through `Deref`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolicyConfig", into = "PolicyConfig")]
pub struct ValidatedPolicy(PolicyConfig);

impl ValidatedPolicy {
    pub fn new(config: PolicyConfig) -> ArctlResult<Self> {
        config.validate()?;
        Ok(Self(config))
    }

    /// Parse and validate a JSON policy.
    pub fn from_json(json: &str) -> ArctlResult<Self> {
        PolicyConfig::from_json(json)?.into_validated()
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.0
    }
}

impl Default for ValidatedPolicy {
    fn default() -> Self {
        Self(PolicyConfig::default())
    }
}

impl Deref for ValidatedPolicy {
    type Target = PolicyConfig;

    fn deref(&self) -> &PolicyConfig {
        &self.0
    }
}

impl TryFrom<PolicyConfig> for ValidatedPolicy {
    type Error = ArctlError;

    fn try_from(config: PolicyConfig) -> ArctlResult<Self> {
        Self::new(config)
    }
}

impl From<ValidatedPolicy> for PolicyConfig {
    fn from(policy: ValidatedPolicy) -> Self {
        policy.0
    }
}
