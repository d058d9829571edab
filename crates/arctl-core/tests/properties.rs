// ─────────────────────────────────────────────────────────────────────
// ARCTL — Controller Kernel Property Tests
// ─────────────────────────────────────────────────────────────────────
//! Lineage-level invariants checked over random metric and clock
//! sequences, plus the reference scenarios end to end.

use proptest::prelude::*;

use arctl_core::{advance, step};
use arctl_types::{
    OperationalMode, PolicyConfig, RawMetrics, SystemState, TimeState, ValidatedPolicy,
};

fn policy(config: PolicyConfig) -> ValidatedPolicy {
    config.into_validated().expect("valid test policy")
}

fn arb_metric() -> impl Strategy<Value = f64> {
    prop_oneof![
        8 => 0.0f64..=1.0,
        1 => -2.0f64..3.0,
        1 => Just(f64::NAN),
    ]
}

fn arb_metrics() -> impl Strategy<Value = RawMetrics> {
    (arb_metric(), arb_metric(), arb_metric()).prop_map(|(e, d, r)| RawMetrics::new(e, d, r))
}

/// Wall-clock increments: stutters, normal calls, lags, gaps, and
/// backward jumps.
fn arb_clock_delta() -> impl Strategy<Value = f64> {
    prop_oneof![
        2 => 0.0f64..0.02,
        6 => 0.02f64..30.0,
        1 => 60.0f64..86_400.0,
        1 => 86_400.0f64..400_000.0,
        1 => -500.0f64..0.0,
    ]
}

fn arb_policy() -> impl Strategy<Value = ValidatedPolicy> {
    (1u32..20, 0.0f64..=1.0, 0.0f64..=1.0, 1u64..6, 1u64..6, 1u64..3).prop_flat_map(
        |(max_energy, threshold, alpha, timeout, cooldown, logical_step)| {
            (1..=max_energy, 0..=max_energy, 1..=max_energy).prop_map(
                move |(cost, restore, credit)| {
                    policy(PolicyConfig {
                        max_energy,
                        emergency_cost: cost,
                        restore_amount: restore,
                        reset_credit: credit,
                        repetition_threshold: threshold,
                        smoothing_alpha: alpha,
                        emergency_timeout: timeout,
                        cooldown_duration: cooldown,
                        logical_step,
                        ..Default::default()
                    })
                },
            )
        },
    )
}

fn arb_walk() -> impl Strategy<Value = Vec<(RawMetrics, f64)>> {
    prop::collection::vec((arb_metrics(), arb_clock_delta()), 1..120)
}

proptest! {
    #[test]
    fn prop_lineage_invariants(p in arb_policy(), walk in arb_walk()) {
        let mut state = SystemState::initial(&p, 1_000.0);
        let mut clock = 1_000.0;
        let mut resets = 0u32;

        for (metrics, dt) in walk {
            clock += dt;
            let out = advance(metrics, &state, clock, &p);
            let next = out.state;

            prop_assert!(next.energy <= p.max_energy);
            prop_assert!(next.logical_time >= state.logical_time);
            if state.mode == OperationalMode::Fallback {
                prop_assert_eq!(next.mode, OperationalMode::Fallback);
                prop_assert_eq!(next.energy, state.energy);
            }
            if state.reset_used {
                prop_assert!(next.reset_used);
            }
            if !state.reset_used && next.reset_used {
                resets += 1;
            }
            if out.performed {
                prop_assert_eq!(next.logical_time, state.logical_time + p.logical_step);
            } else {
                prop_assert_eq!(&next, &state);
            }
            for v in [next.smoothed.entropy, next.smoothed.divergence, next.smoothed.repetition] {
                prop_assert!((0.0..=1.0).contains(&v));
            }

            state = next;
        }

        prop_assert!(resets <= 1);
    }

    #[test]
    fn prop_fallback_absorbs(p in arb_policy(), walk in arb_walk()) {
        let start = SystemState::initial(&p, 0.0).with_mode(OperationalMode::Fallback);
        let mut state = start.clone();
        let mut clock = 0.0;
        for (metrics, dt) in walk {
            clock += dt.abs() + 0.05;
            state = step(metrics, &state, clock, &p);
            prop_assert_eq!(state.mode, OperationalMode::Fallback);
            prop_assert_eq!(state.energy, start.energy);
            prop_assert!(!state.reset_used);
        }
    }

    #[test]
    fn prop_deterministic(
        p in arb_policy(),
        metrics in arb_metrics(),
        energy in 0u32..25,
        now in 0.0f64..500_000.0,
    ) {
        let state = SystemState::initial(&p, 0.0).with_energy(energy);
        let a = step(metrics, &state, now, &p);
        let b = step(metrics, &state, now, &p);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_alpha_zero_freezes(walk in arb_walk()) {
        let p = policy(PolicyConfig { smoothing_alpha: 0.0, ..Default::default() });
        let start = SystemState::initial(&p, 0.0);
        let mut state = start.clone();
        let mut clock = 0.0;
        for (metrics, dt) in walk {
            clock += dt;
            state = step(metrics, &state, clock, &p);
            prop_assert_eq!(state.smoothed, start.smoothed);
        }
    }

    #[test]
    fn prop_alpha_one_tracks_input(metrics in arb_metrics()) {
        let p = policy(PolicyConfig { smoothing_alpha: 1.0, ..Default::default() });
        let state = SystemState::initial(&p, 0.0);
        let next = step(metrics, &state, 1.0, &p);
        let clamped = metrics.clamped();
        prop_assert_eq!(next.smoothed.entropy, clamped.entropy);
        prop_assert_eq!(next.smoothed.divergence, clamped.divergence);
        prop_assert_eq!(next.smoothed.repetition, clamped.repetition);
    }
}

// ── Reference scenarios ─────────────────────────────────────────────

fn echo() -> RawMetrics {
    RawMetrics::new(0.5, 0.0, 0.9)
}

fn calm() -> RawMetrics {
    RawMetrics::new(0.5, 0.0, 0.0)
}

#[test]
fn scenario_first_echo_enters_emergency() {
    let p = policy(PolicyConfig {
        smoothing_alpha: 1.0,
        ..Default::default()
    });
    let s1 = step(echo(), &SystemState::initial(&p, 0.0), 1.0, &p);
    assert_eq!(s1.mode, OperationalMode::Emergency);
    assert_eq!(s1.energy, 7);
}

#[test]
fn scenario_emergency_times_out_at_eight() {
    let p = policy(PolicyConfig {
        emergency_timeout: 3,
        ..Default::default()
    });
    let mut state = SystemState::initial(&p, 0.0)
        .with_logical_time(5)
        .with_mode(OperationalMode::Emergency);
    let mut clock = 0.0;
    while state.logical_time < 8 {
        assert_eq!(state.mode, OperationalMode::Emergency);
        clock += 1.0;
        state = step(calm(), &state, clock, &p);
    }
    assert_eq!(state.logical_time, 8);
    assert_eq!(state.mode, OperationalMode::Cooldown);
}

#[test]
fn scenario_cooldown_restoration_clamps() {
    let p = policy(PolicyConfig {
        cooldown_duration: 10,
        ..Default::default()
    });
    let mut state = SystemState::initial(&p, 0.0)
        .with_mode(OperationalMode::Cooldown)
        .with_energy(7);
    for i in 1..=3 {
        state = step(calm(), &state, i as f64, &p);
    }
    assert_eq!(state.energy, 10);
}

#[test]
fn scenario_depleted_standard_falls_back() {
    let p = policy(PolicyConfig {
        smoothing_alpha: 1.0,
        ..Default::default()
    });
    let state = SystemState::initial(&p, 0.0).with_energy(2);
    let next = step(echo(), &state, 1.0, &p);
    assert_eq!(next.mode, OperationalMode::Fallback);
    assert_eq!(next.energy, 2);
}

#[test]
fn scenario_fallback_fifty_benign_steps() {
    let p = ValidatedPolicy::default();
    let start = SystemState::initial(&p, 0.0)
        .with_mode(OperationalMode::Fallback)
        .with_energy(2);
    let mut state = start.clone();
    for i in 1..=50 {
        state = step(RawMetrics::new(0.0, 0.0, 0.0), &state, i as f64, &p);
        assert_eq!(state.mode, OperationalMode::Fallback);
    }
    assert_eq!(state.logical_time, start.logical_time + 50);
}

#[test]
fn scenario_gap_reset_is_one_shot() {
    let p = ValidatedPolicy::default();
    let state = SystemState::initial(&p, 0.0).with_energy(6);

    let first = advance(calm(), &state, 100_000.0, &p);
    assert_eq!(first.time_state, TimeState::Gap);
    assert_eq!(first.state.energy, 7);
    assert!(first.state.reset_used);

    let second = advance(calm(), &first.state, 100_010.0, &p);
    assert_eq!(second.time_state, TimeState::Gap);
    assert_eq!(second.state.energy, 7);
    assert!(second.state.reset_used);
}
