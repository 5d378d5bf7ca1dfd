//! Infrastructure implementations.
//!
//! Contains the host port traits and the adapters built on top of them.

pub mod cache;
pub mod ports;
pub mod settings;
