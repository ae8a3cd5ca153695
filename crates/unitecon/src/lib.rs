//! Command-line front end for the unit economics engine
//!
//! The binary is a thin shell over [`unitecon_core`]: it loads assumptions
//! from a file or preset, runs one analysis and prints a plain-text report
//! or writes an export file.

// ============================================================================
// Modules
// ============================================================================

pub mod config;
pub mod io;
pub mod logging;
pub mod report;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{ConfigFormat, load_assumptions, parse_assumptions};
pub use logging::init_logging;
