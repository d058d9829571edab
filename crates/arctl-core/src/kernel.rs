// ─────────────────────────────────────────────────────────────────────
// ARCTL — Controller Kernel (Transition Function)
// ─────────────────────────────────────────────────────────────────────
//! The single pure transition function of the controller:
//!
//! ```text
//! step(metrics, previous_state, wall_clock_now, policy) -> new_state
//! ```
//!
//! Order of evaluation inside one performed step:
//!
//! 1. Anti-stutter guard: calls closer than `stutter_epsilon_s` to the
//!    previous performed step return the previous state untouched.
//! 2. Chronos classifies `now - last_interaction`.
//! 3. Logical time advances by `logical_step`, in every mode.
//! 4. The metric triple is smoothed, in every mode.
//! 5. Ontological reset: a GAP with `reset_used == false` outside
//!    FALLBACK grants `reset_credit` once per lineage.
//! 6. The transition rule of the previous mode runs.
//!
//! FALLBACK is absorbing: mode and energy freeze, the logical clock and
//! the smoothed telemetry keep moving.

use serde::Serialize;

use arctl_types::{
    OperationalMode, RawMetrics, SamplingConfig, SystemState, TimeState, ValidatedPolicy,
};

use crate::{chronos, smoothing};

/// Full result of one kernel call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    /// Next controller state.
    pub state: SystemState,
    /// False when the anti-stutter guard suppressed the call.
    pub performed: bool,
    /// Chronos regime of `now - last_interaction`.
    pub time_state: TimeState,
    /// True on the one step that consumed the ontological reset.
    pub reset_applied: bool,
    /// Sampling profile of the resulting mode; `None` when suppressed.
    pub sampling: Option<SamplingConfig>,
    /// Temporal sync note for prompt injection; empty for SYNC.
    pub context_note: String,
}

/// Advance the controller by one call. Never fails.
pub fn step(
    metrics: RawMetrics,
    state: &SystemState,
    now: f64,
    policy: &ValidatedPolicy,
) -> SystemState {
    advance(metrics, state, now, policy).state
}

/// Like [`step`], with the per-call annotations kept.
pub fn advance(
    metrics: RawMetrics,
    prev: &SystemState,
    now: f64,
    policy: &ValidatedPolicy,
) -> StepOutcome {
    // Wall clock is assumed monotonic but not trusted to be.
    let now = if now.is_finite() {
        now.max(prev.last_call)
    } else {
        prev.last_call
    };

    if now - prev.last_call < policy.stutter_epsilon_s {
        log::debug!(
            "anti-stutter: call {:.4}s after previous step suppressed",
            now - prev.last_call
        );
        return StepOutcome {
            state: prev.clone(),
            performed: false,
            time_state: chronos::classify(chronos::elapsed(prev.last_interaction, now), policy),
            reset_applied: false,
            sampling: None,
            context_note: String::new(),
        };
    }

    let (time_state, context_note) = chronos::sync(prev.last_interaction, now, policy);
    let logical_time = prev.logical_time.saturating_add(policy.logical_step);
    let smoothed = smoothing::update(&prev.smoothed, &metrics, policy.smoothing_alpha);

    let mut energy = prev.energy.min(policy.max_energy);
    let reset_applied = time_state == TimeState::Gap && !prev.reset_used && !prev.is_terminal();
    if reset_applied {
        let credited = energy.saturating_add(policy.reset_credit).min(policy.max_energy);
        log::info!(
            "ontological reset: absence of {:.0}s, energy {energy} -> {credited}",
            chronos::elapsed(prev.last_interaction, now)
        );
        energy = credited;
    }

    let next = transition(
        prev.mode,
        energy,
        prev.mode_entered_at,
        logical_time,
        smoothed.repetition,
        policy,
    );

    if next.mode != prev.mode {
        if next.mode.is_terminal() {
            log::error!(
                ">>> FALLBACK: energy {} < emergency cost {}, controller frozen at t={logical_time} <<<",
                next.energy,
                policy.emergency_cost
            );
        } else {
            log::debug!("mode {} -> {} at t={logical_time}", prev.mode, next.mode);
        }
    }

    let state = SystemState {
        mode: next.mode,
        energy: next.energy.min(policy.max_energy),
        logical_time,
        last_interaction: if reset_applied {
            prev.last_interaction
        } else {
            now
        },
        last_call: now,
        mode_entered_at: next.mode_entered_at,
        smoothed,
        reset_used: prev.reset_used || reset_applied,
    };

    StepOutcome {
        sampling: Some(policy.temperatures.for_mode(state.mode)),
        state,
        performed: true,
        time_state,
        reset_applied,
        context_note,
    }
}

/// Mode, energy, and entry stamp chosen by the transition rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Transition {
    mode: OperationalMode,
    energy: u32,
    mode_entered_at: u64,
}

/// Transition table, keyed solely on the previous mode.
fn transition(
    mode: OperationalMode,
    energy: u32,
    entered_at: u64,
    logical_time: u64,
    repetition: f64,
    policy: &ValidatedPolicy,
) -> Transition {
    let in_mode = logical_time.saturating_sub(entered_at);
    let stay = Transition {
        mode,
        energy,
        mode_entered_at: entered_at,
    };
    let enter = |mode, energy| Transition {
        mode,
        energy,
        mode_entered_at: logical_time,
    };

    match mode {
        OperationalMode::Standard if repetition >= policy.repetition_threshold => {
            if energy >= policy.emergency_cost {
                enter(OperationalMode::Emergency, energy - policy.emergency_cost)
            } else {
                enter(OperationalMode::Fallback, energy)
            }
        }
        OperationalMode::Standard => stay,
        OperationalMode::Emergency if in_mode >= policy.emergency_timeout => {
            enter(OperationalMode::Cooldown, energy)
        }
        OperationalMode::Emergency => stay,
        OperationalMode::Cooldown => {
            let restored = energy
                .saturating_add(policy.restore_amount)
                .min(policy.max_energy);
            if in_mode >= policy.cooldown_duration {
                enter(OperationalMode::Standard, restored)
            } else {
                Transition {
                    energy: restored,
                    ..stay
                }
            }
        }
        OperationalMode::Fallback => stay,
    }
}
