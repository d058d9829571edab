// ─────────────────────────────────────────────────────────────────────
// ARCTL — Chronos (Wall-Clock Gap Classifier)
// ─────────────────────────────────────────────────────────────────────
//! Classifies the wall-clock delta since the last genuine interaction
//! into one of three disjoint regimes:
//!
//! - `SYNC`: delta < `lag_threshold_s` (60 s by default)
//! - `LAG`: `lag_threshold_s` <= delta < `absence_threshold_s` (24 h)
//! - `GAP`: delta >= `absence_threshold_s`
//!
//! The kernel uses the classification to decide reset eligibility. The
//! sync note is for callers that inject a temporal anchor into the
//! decoder prompt; the kernel itself never reads it.

use chrono::DateTime;

use arctl_types::{PolicyConfig, TimeState};

/// Non-negative wall-clock delta. A clock that moved backward, or a
/// non-finite difference, counts as zero.
#[inline]
pub fn elapsed(prev_ts: f64, now: f64) -> f64 {
    let delta = now - prev_ts;
    if delta.is_nan() || delta < 0.0 {
        0.0
    } else {
        delta
    }
}

/// Map a wall-clock delta to its regime. Total over every `f64`.
pub fn classify(delta: f64, config: &PolicyConfig) -> TimeState {
    let delta = if delta.is_nan() { 0.0 } else { delta.max(0.0) };
    if delta < config.lag_threshold_s {
        TimeState::Sync
    } else if delta < config.absence_threshold_s {
        TimeState::Lag
    } else {
        TimeState::Gap
    }
}

/// Classify the gap between two timestamps and render the context note.
///
/// The note is empty for `SYNC`. For `LAG` and `GAP` it names the elapsed
/// minutes and the current UTC date so the caller can re-anchor the model.
pub fn sync(prev_ts: f64, now: f64, config: &PolicyConfig) -> (TimeState, String) {
    let delta = elapsed(prev_ts, now);
    let state = classify(delta, config);
    let note = match state {
        TimeState::Sync => String::new(),
        TimeState::Lag | TimeState::Gap => context_note(delta, now),
    };
    (state, note)
}

fn context_note(delta: f64, now: f64) -> String {
    let anchor = DateTime::from_timestamp(now.floor() as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let minutes = (delta / 60.0).floor() as u64;
    format!(
        "[SYSTEM]: TEMPORAL SYNC.\n\
         Previous interaction: {minutes} min ago.\n\
         Current reality anchor: {anchor} UTC.\n\
         Treat documents and events dated before {anchor} as past or present."
    )
}
