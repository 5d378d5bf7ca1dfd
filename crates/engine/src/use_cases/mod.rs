//! Use cases - User story orchestration.
//!
//! Use cases orchestrate domain operations and host ports to fulfill user
//! stories.

pub mod level_up;

pub use level_up::{LevelUpPorts, LevelUpSession, LevelUpWizard};
