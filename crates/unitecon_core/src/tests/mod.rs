//! Cross-module tests for the unit economics engine
//!
//! Tests are organized by topic:
//! - `properties` - Invariants checked over grids of inputs
//! - `pipeline` - Preset to summary workflows spanning several modules
//! - `wire_format` - JSON round-trips, legacy input and infinity sentinels
