// ─────────────────────────────────────────────────────────────────────
// ARCTL — Metric Types
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

/// Clamp a value to [lo, hi], mapping NaN to lo and Inf to nearest bound.
#[inline]
pub fn clamp_unit(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        log::warn!("clamp_unit: NaN metric, clamping to {lo:.4}");
        return lo;
    }
    if value.is_infinite() {
        let boundary = if value > 0.0 { hi } else { lo };
        log::warn!("clamp_unit: Inf metric, clamping to {boundary:.4}");
        return boundary;
    }
    value.clamp(lo, hi)
}

/// Externally computed quality measurements for one step.
///
/// Each value is conceptually in [0, 1]. Nothing is rejected here: the
/// kernel clamps on ingestion via [`RawMetrics::clamped`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawMetrics {
    pub entropy: f64,
    pub divergence: f64,
    /// Repetition score from the lexical analyzer.
    pub repetition: f64,
}

impl RawMetrics {
    pub fn new(entropy: f64, divergence: f64, repetition: f64) -> Self {
        Self {
            entropy,
            divergence,
            repetition,
        }
    }

    /// Copy with every field clamped to [0, 1].
    pub fn clamped(&self) -> Self {
        Self {
            entropy: clamp_unit(self.entropy, 0.0, 1.0),
            divergence: clamp_unit(self.divergence, 0.0, 1.0),
            repetition: clamp_unit(self.repetition, 0.0, 1.0),
        }
    }
}

/// EMA-filtered metric triple carried in the controller state.
///
/// Only `repetition` drives transitions. `entropy` and `divergence`
/// ride along for telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothedMetrics {
    pub entropy: f64,
    pub divergence: f64,
    pub repetition: f64,
}

impl Default for SmoothedMetrics {
    fn default() -> Self {
        Self {
            entropy: 0.5,
            divergence: 0.0,
            repetition: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_nan() {
        assert_eq!(clamp_unit(f64::NAN, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_clamp_pos_inf() {
        assert_eq!(clamp_unit(f64::INFINITY, 0.0, 1.0), 1.0);
    }

    #[test]
    fn test_clamp_neg_inf() {
        assert_eq!(clamp_unit(f64::NEG_INFINITY, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_clamp_in_range() {
        assert_eq!(clamp_unit(0.75, 0.0, 1.0), 0.75);
    }

    #[test]
    fn test_raw_metrics_clamped() {
        let m = RawMetrics::new(1.5, -0.2, f64::NAN).clamped();
        assert_eq!(m, RawMetrics::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_smoothed_defaults() {
        let s = SmoothedMetrics::default();
        assert_eq!(s.entropy, 0.5);
        assert_eq!(s.divergence, 0.0);
        assert_eq!(s.repetition, 0.0);
    }
}
