// ─────────────────────────────────────────────────────────────────────
// ARCTL — Metric Smoothing
// ─────────────────────────────────────────────────────────────────────
//! Exponential moving average over the clamped metric triple:
//! `smoothed' = alpha * raw + (1 - alpha) * smoothed`.

use arctl_types::{clamp_unit, RawMetrics, SmoothedMetrics};

/// Single EMA update. Result stays in [0, 1].
#[inline]
pub fn ema(prev: f64, raw: f64, alpha: f64) -> f64 {
    clamp_unit(alpha * raw + (1.0 - alpha) * prev, 0.0, 1.0)
}

/// Fold one raw sample into the smoothed triple.
///
/// `alpha = 0` freezes the triple; `alpha = 1` tracks the clamped
/// sample exactly.
pub fn update(prev: &SmoothedMetrics, raw: &RawMetrics, alpha: f64) -> SmoothedMetrics {
    let raw = raw.clamped();
    SmoothedMetrics {
        entropy: ema(prev.entropy, raw.entropy, alpha),
        divergence: ema(prev.divergence, raw.divergence, alpha),
        repetition: ema(prev.repetition, raw.repetition, alpha),
    }
}
