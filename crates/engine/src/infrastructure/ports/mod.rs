//! Port traits for the host boundary.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Compendium access (feat catalog, reference lookups)
//! - Character documents (read, patch, embed items)
//! - Chat and users (public summary, whispers, GM list)
//! - Settings and localization

mod error;
mod host;

pub use error::HostError;

pub use host::{
    CatalogProvider, CharacterStore, DocumentSummary, Localizer, MessageSink, ReferenceResolver,
    SettingsProvider, UserDirectory,
};

// =============================================================================
// Test-Only Mock Ports (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use host::{
    MockCatalogProvider, MockCharacterStore, MockLocalizer, MockMessageSink,
    MockReferenceResolver, MockSettingsProvider, MockUserDirectory,
};
