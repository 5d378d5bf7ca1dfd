//! Host collaborator ports.
//!
//! The virtual tabletop owns documents, chat, users and settings; the engine
//! only reaches them through these traits.

use async_trait::async_trait;
use levelwiz_domain::{
    ActorId, CharacterContext, CharacterPatch, FeatRecord, GrantedFeat, ItemRef, UserId,
};
use serde::{Deserialize, Serialize};

use super::error::HostError;
use crate::infrastructure::settings::SettingKey;

// =============================================================================
// Documents
// =============================================================================

/// Source of the full feat compendium.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn fetch_all_feats(&self) -> Result<Vec<FeatRecord>, HostError>;
}

/// Document summary used for class features and content links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub name: String,
    /// Document type, e.g. `"weapon"`, `"shield"`, `"feat"`
    pub kind: String,
    /// Description markup
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub img: Option<String>,
}

/// Looks documents up by reference.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferenceResolver: Send + Sync {
    /// Resolve a feat reference to its full record.
    async fn resolve(&self, reference: &ItemRef) -> Result<FeatRecord, HostError>;

    /// Summary of any document (class feature, equipment, spell).
    async fn describe(&self, reference: &ItemRef) -> Result<DocumentSummary, HostError>;
}

/// Reads and writes the character being leveled.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterStore: Send + Sync {
    async fn read(&self, actor: &ActorId) -> Result<CharacterContext, HostError>;

    async fn apply_mutation(&self, actor: &ActorId, patch: CharacterPatch)
        -> Result<(), HostError>;

    async fn add_items(&self, actor: &ActorId, items: Vec<GrantedFeat>) -> Result<(), HostError>;
}

// =============================================================================
// Chat and users
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn post_public(&self, content: String, speaker: String) -> Result<(), HostError>;

    async fn post_private(
        &self,
        content: String,
        recipients: Vec<UserId>,
        speaker: String,
    ) -> Result<(), HostError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn game_master_ids(&self) -> Result<Vec<UserId>, HostError>;
}

// =============================================================================
// Settings and localization
// =============================================================================

/// Raw view of the host's module settings.
#[cfg_attr(test, mockall::automock)]
pub trait SettingsProvider: Send + Sync {
    fn get(&self, key: SettingKey) -> Option<serde_json::Value>;
}

/// Host translation table.
#[cfg_attr(test, mockall::automock)]
pub trait Localizer: Send + Sync {
    /// Translation for `key`, if the host has one.
    fn localize(&self, key: &str) -> Option<String>;
}
