// ─────────────────────────────────────────────────────────────────────
// ARCTL — Controller Kernel Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! State, configuration, metric, and error types for the ARCTL
//! controller kernel.

pub mod config;
pub mod error;
pub mod metrics;
pub mod state;

pub use config::{ModeTemperatures, PolicyConfig, ValidatedPolicy};
pub use error::{ArctlError, ArctlResult};
pub use metrics::{clamp_unit, RawMetrics, SmoothedMetrics};
pub use state::{OperationalMode, SamplingConfig, SystemState, TimeState};
