// ─────────────────────────────────────────────────────────────────────
// ARCTL — Controller Kernel Core
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Deterministic mode controller for a sampling process.
//!
//! Each call to [`step`] folds one set of externally computed metrics
//! into the previous [`SystemState`](arctl_types::SystemState) and
//! returns the next one. No I/O, no globals, no interior mutability:
//! independent lineages can be advanced from any number of threads.
//!
//! # Safety Invariants
//!
//! 1. **FALLBACK is absorbing**: once entered, every later state is
//!    FALLBACK. Mode and energy freeze; the logical clock keeps counting.
//!
//! 2. **Energy is bounded**: every returned state has
//!    `energy <= max_energy`. Spending saturates, restoration clamps.
//!
//! 3. **Logical time never decreases**: performed steps add
//!    `logical_step`; suppressed steps add nothing.
//!
//! 4. **One reset per lineage**: `reset_used` flips false→true at most
//!    once and is never cleared.
//!
//! 5. **Only configuration fails**: `step` accepts a
//!    [`ValidatedPolicy`](arctl_types::ValidatedPolicy) and never errors.
//!    Metric anomalies are clamped, clock skew is treated as zero delta.

pub mod chronos;
pub mod diagnostics;
pub mod kernel;
pub mod smoothing;

pub use diagnostics::{diagnostics, Diagnostics};
pub use kernel::{advance, step, StepOutcome};
