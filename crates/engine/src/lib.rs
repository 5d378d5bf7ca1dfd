//! Level-up wizard engine.
//!
//! Wires the level-up domain to a tabletop host through port traits.
//!
//! ## Structure
//!
//! - `use_cases/` - Level-up wizard orchestration
//! - `infrastructure/` - Host ports, settings and caches
//! - `telemetry` - Tracing setup for embedders

pub mod infrastructure;
pub mod telemetry;
pub mod use_cases;

/// Test fixtures module for integration testing.
#[cfg(test)]
pub mod test_fixtures;

/// End-to-end level-up flows against in-memory host fakes.
#[cfg(test)]
mod e2e_tests;

pub use use_cases::{LevelUpPorts, LevelUpSession, LevelUpWizard};
