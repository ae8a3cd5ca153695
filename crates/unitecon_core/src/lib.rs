//! Unit economics engine
//!
//! This crate turns a handful of business assumptions into the metrics that
//! decide whether a customer is worth acquiring. It supports:
//! - Contribution margin, LTV (with optional expansion revenue), discounted LTV
//! - Blended and per-channel CAC, LTV:CAC ratios and payback period
//! - Rule-based health flags and a bounded 0–100 health score
//! - Month-by-month cohort simulation with CSV export
//! - Tornado and single-lever sweep sensitivity analysis
//! - Pre-built what-if scenarios, segment comparison and playbook text
//!
//! Every calculation is a pure function of an [`Assumptions`] value.
//! Degenerate inputs never fail; unbounded results are `f64::INFINITY`.
//!
//! # Example
//!
//! ```
//! use unitecon_core::{Assumptions, compute};
//!
//! let inputs = Assumptions::builder()
//!     .aov(34.0)
//!     .orders_per_month(2.8)
//!     .gross_margin(0.30)
//!     .variable_cost(4.20)
//!     .churn(0.08)
//!     .cac(17.80)
//!     .build();
//!
//! let outputs = compute(&inputs);
//! assert!((outputs.ltv - 210.0).abs() < 1e-9);
//! assert_eq!(outputs.health_score, 100);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod calculator;
pub mod cohort;
pub mod error;
pub mod health;
pub mod scenarios;
pub mod sensitivity;

// ============================================================================
// Reporting modules
// ============================================================================

pub mod comparison;
pub mod export;
pub mod format;
pub mod playbook;
pub mod presets;
pub mod waterfall;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use calculator::compute;
pub use error::{ExportError, InputError};
pub use model::{Assumptions, AssumptionsBuilder, Channel, HealthFlag, Outputs, Severity};
pub use presets::Preset;
pub use sensitivity::Lever;
