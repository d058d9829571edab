// ─────────────────────────────────────────────────────────────────────
// ARCTL — State Diagnostics
// ─────────────────────────────────────────────────────────────────────
//! Read-only telemetry snapshot of a controller state. Pure; the caller
//! decides where it goes.

use serde::Serialize;

use arctl_types::{OperationalMode, PolicyConfig, SmoothedMetrics, SystemState, TimeState};

use crate::chronos;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Telemetry view of one [`SystemState`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    /// Rounded to two decimals.
    pub days_since_last_interaction: f64,
    pub energy: u32,
    pub max_energy: u32,
    pub mode: OperationalMode,
    pub mode_code: &'static str,
    pub time_state: TimeState,
    pub logical_time: u64,
    pub time_in_mode: u64,
    pub reset_used: bool,
    pub smoothed: SmoothedMetrics,
    pub is_terminal: bool,
}

pub fn diagnostics(state: &SystemState, now: f64, config: &PolicyConfig) -> Diagnostics {
    let delta = chronos::elapsed(state.last_interaction, now);
    Diagnostics {
        days_since_last_interaction: (delta / SECONDS_PER_DAY * 100.0).round() / 100.0,
        energy: state.energy,
        max_energy: config.max_energy,
        mode: state.mode,
        mode_code: state.mode.code(),
        time_state: chronos::classify(delta, config),
        logical_time: state.logical_time,
        time_in_mode: state.logical_time.saturating_sub(state.mode_entered_at),
        reset_used: state.reset_used,
        smoothed: state.smoothed,
        is_terminal: state.is_terminal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state() {
        let config = PolicyConfig::default();
        let state = SystemState::initial(&config, 0.0);
        let d = diagnostics(&state, 30.0, &config);
        assert_eq!(d.days_since_last_interaction, 0.0);
        assert_eq!(d.energy, 10);
        assert_eq!(d.mode_code, "STD");
        assert_eq!(d.time_state, TimeState::Sync);
        assert!(!d.is_terminal);
    }

    #[test]
    fn test_days_rounded() {
        let config = PolicyConfig::default();
        let state = SystemState::initial(&config, 0.0);
        let d = diagnostics(&state, 1.5 * SECONDS_PER_DAY + 100.0, &config);
        assert_eq!(d.days_since_last_interaction, 1.5);
        assert_eq!(d.time_state, TimeState::Gap);
    }

    #[test]
    fn test_time_in_mode() {
        let config = PolicyConfig::default();
        let state = SystemState::initial(&config, 0.0)
            .with_logical_time(3)
            .with_mode(OperationalMode::Fallback)
            .with_logical_time(9);
        let d = diagnostics(&state, 0.0, &config);
        assert_eq!(d.time_in_mode, 6);
        assert!(d.is_terminal);
        assert_eq!(d.mode_code, "FBK");
    }

    #[test]
    fn test_serializes_enum_names() {
        let config = PolicyConfig::default();
        let state = SystemState::initial(&config, 0.0).with_mode(OperationalMode::Emergency);
        let json = serde_json::to_value(diagnostics(&state, 90.0, &config)).expect("serialize");
        assert_eq!(json["mode"], "EMERGENCY");
        assert_eq!(json["time_state"], "LAG");
        assert_eq!(json["energy"], 10);
    }
}
