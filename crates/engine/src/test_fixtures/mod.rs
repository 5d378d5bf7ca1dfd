//! Test fixtures loader for JSON fixture files and common test helpers.
//!
//! This module provides utilities for loading test data from the `test_data/`
//! directory, an in-memory host implementing every port, and character
//! builders for level-up scenarios.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_fixtures::{characters, InMemoryHost};
//!
//! let host = InMemoryHost::new(catalog::core_feats())
//!     .with_character(characters::fighter_4());
//! let wizard = host.wizard(InMemorySettings::new());
//! ```

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use levelwiz_domain::{
    ActorId, CharacterContext, CharacterPatch, FeatRecord, GrantedFeat, ItemRef, UserId,
};
use tokio::sync::Mutex;

use crate::infrastructure::cache::{FeatCatalogCache, VocabularyCache};
use crate::infrastructure::ports::{
    CatalogProvider, CharacterStore, DocumentSummary, HostError, Localizer, MessageSink,
    ReferenceResolver, UserDirectory,
};
use crate::infrastructure::settings::InMemorySettings;
use crate::use_cases::level_up::{LevelUpPorts, LevelUpWizard};

// =============================================================================
// Fixture Loading
// =============================================================================

/// Load a JSON fixture from test_data/ directory.
///
/// # Panics
///
/// Panics if the fixture file cannot be read or parsed.
pub fn load_fixture<T: serde::de::DeserializeOwned>(path: &str) -> T {
    let fixture_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_data")
        .join(path);
    let content = std::fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read fixture '{}': {}",
            fixture_path.display(),
            e
        )
    });
    serde_json::from_str(&content).unwrap_or_else(|e| {
        panic!(
            "Failed to parse fixture '{}': {}",
            fixture_path.display(),
            e
        )
    })
}

// =============================================================================
// Catalog Fixtures
// =============================================================================

pub mod catalog {
    use super::*;

    /// Core rulebook sample: Fighter, Wizard, Human and Elf feats, skill and
    /// general feats, and the Medic archetype.
    pub fn core_feats() -> Vec<FeatRecord> {
        load_fixture("pf2e/feats.json")
    }

    pub fn reference(slug: &str) -> ItemRef {
        ItemRef::new(format!("Compendium.pf2e.feats-srd.Item.{slug}"))
    }
}

// =============================================================================
// Character Fixtures
// =============================================================================

/// Pre-built character fixtures for testing.
pub mod characters {
    use levelwiz_domain::{
        AbilityEntry, AbilityKey, ClassInfo, ProficiencyRank, SkillEntry,
    };

    use super::*;

    fn with_core_skills(character: CharacterContext) -> CharacterContext {
        character
            .with_skill(
                "athletics",
                SkillEntry::new("Athletics", ProficiencyRank::Trained, 7),
            )
            .with_skill(
                "intimidation",
                SkillEntry::new("Intimidation", ProficiencyRank::Expert, 6),
            )
            .with_skill(
                "stealth",
                SkillEntry::new("Stealth", ProficiencyRank::Untrained, 1),
            )
    }

    fn with_abilities(character: CharacterContext) -> CharacterContext {
        character
            .with_ability(AbilityKey::Str, AbilityEntry::new(4, 2))
            .with_ability(AbilityKey::Dex, AbilityEntry::new(2, 1))
            .with_ability(AbilityKey::Con, AbilityEntry::new(2, 1))
            .with_ability(AbilityKey::Int, AbilityEntry::new(0, 0))
            .with_ability(AbilityKey::Wis, AbilityEntry::new(1, 1))
            .with_ability(AbilityKey::Cha, AbilityEntry::new(0, 0))
    }

    /// Level 4 human Fighter (Valeros) about to reach an ability-boost level.
    ///
    /// - Class feats at every level including 5
    /// - Already has Intimidating Strike (single take)
    /// - Str is partial (+4 with an even number of prior boosts)
    pub fn fighter_4() -> CharacterContext {
        let mut class = ClassInfo::new("Fighter").with_standard_progression();
        class.class_feat_levels.insert(5);
        let character = CharacterContext::new("valeros", "Valeros", 4)
            .with_class(class)
            .with_ancestry("Human")
            .with_heritage("Versatile Human")
            .with_existing_feats(["Power Attack", "Intimidating Strike"]);
        with_abilities(with_core_skills(character))
    }

    /// Level 3 Fighter-Wizard dual-class elf (Seltyiel).
    pub fn dual_class_3() -> CharacterContext {
        let class = ClassInfo::new("Fighter-Wizard")
            .with_standard_progression()
            .with_spellcasting(true);
        let character = CharacterContext::new("seltyiel", "Seltyiel", 3)
            .with_class(class)
            .with_ancestry("Elf");
        with_abilities(with_core_skills(character))
    }

    /// Level 1 Fighter with nothing taken yet.
    pub fn fighter_1() -> CharacterContext {
        let character = CharacterContext::new("amiri", "Amiri", 1)
            .with_class(ClassInfo::new("Fighter").with_standard_progression())
            .with_ancestry("Human");
        with_abilities(with_core_skills(character))
    }
}

// =============================================================================
// In-memory Host
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostedMessage {
    Public {
        content: String,
        speaker: String,
    },
    Private {
        content: String,
        recipients: Vec<UserId>,
        speaker: String,
    },
}

/// Host fake backing every port with in-memory state.
///
/// Writes are recorded, not applied; reads always return the character as it
/// was registered.
#[derive(Default)]
pub struct InMemoryHost {
    feats: Vec<FeatRecord>,
    characters: HashMap<ActorId, CharacterContext>,
    documents: HashMap<ItemRef, DocumentSummary>,
    stale_references: HashSet<ItemRef>,
    game_masters: Vec<UserId>,
    fail_mutations: bool,
    pub mutations: Mutex<Vec<(ActorId, CharacterPatch)>>,
    pub added_items: Mutex<Vec<(ActorId, Vec<GrantedFeat>)>>,
    pub posts: Mutex<Vec<PostedMessage>>,
}

impl InMemoryHost {
    pub fn new(feats: Vec<FeatRecord>) -> Self {
        Self {
            feats,
            ..Self::default()
        }
    }

    pub fn with_character(mut self, character: CharacterContext) -> Self {
        self.characters
            .insert(character.actor_id.clone(), character);
        self
    }

    pub fn with_document(mut self, reference: ItemRef, summary: DocumentSummary) -> Self {
        self.documents.insert(reference, summary);
        self
    }

    /// Make a catalog entry fail to resolve, as if deleted after indexing.
    pub fn with_stale_reference(mut self, reference: ItemRef) -> Self {
        self.stale_references.insert(reference);
        self
    }

    pub fn with_game_masters<I>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = UserId>,
    {
        self.game_masters.extend(users);
        self
    }

    /// Reject every character mutation.
    pub fn with_failing_mutations(mut self) -> Self {
        self.fail_mutations = true;
        self
    }

    /// A wizard wired to this host.
    pub fn wizard(self: &Arc<Self>, settings: InMemorySettings) -> LevelUpWizard {
        let localizer: Arc<dyn Localizer> = Arc::new(EnglishOnly);
        LevelUpWizard::new(LevelUpPorts {
            catalog: Arc::new(FeatCatalogCache::new(Arc::clone(self) as _)),
            resolver: Arc::clone(self) as _,
            characters: Arc::clone(self) as _,
            messages: Arc::clone(self) as _,
            users: Arc::clone(self) as _,
            settings: Arc::new(settings),
            localizer: Arc::clone(&localizer),
            vocabulary: Arc::new(VocabularyCache::new(localizer)),
        })
    }

    pub async fn mutations(&self) -> Vec<CharacterPatch> {
        self.mutations
            .lock()
            .await
            .iter()
            .map(|(_, patch)| patch.clone())
            .collect()
    }

    pub async fn granted_names(&self) -> Vec<String> {
        self.added_items
            .lock()
            .await
            .iter()
            .flat_map(|(_, items)| items.iter().map(|item| item.feat.name.clone()))
            .collect()
    }

    pub async fn posts(&self) -> Vec<PostedMessage> {
        self.posts.lock().await.clone()
    }
}

#[async_trait]
impl CatalogProvider for InMemoryHost {
    async fn fetch_all_feats(&self) -> Result<Vec<FeatRecord>, HostError> {
        Ok(self.feats.clone())
    }
}

#[async_trait]
impl ReferenceResolver for InMemoryHost {
    async fn resolve(&self, reference: &ItemRef) -> Result<FeatRecord, HostError> {
        if self.stale_references.contains(reference) {
            return Err(HostError::not_found("Feat", reference));
        }
        self.feats
            .iter()
            .find(|feat| &feat.id == reference)
            .cloned()
            .ok_or_else(|| HostError::not_found("Feat", reference))
    }

    async fn describe(&self, reference: &ItemRef) -> Result<DocumentSummary, HostError> {
        self.documents
            .get(reference)
            .cloned()
            .ok_or_else(|| HostError::not_found("Document", reference))
    }
}

#[async_trait]
impl CharacterStore for InMemoryHost {
    async fn read(&self, actor: &ActorId) -> Result<CharacterContext, HostError> {
        self.characters
            .get(actor)
            .cloned()
            .ok_or_else(|| HostError::not_found("Actor", actor))
    }

    async fn apply_mutation(
        &self,
        actor: &ActorId,
        patch: CharacterPatch,
    ) -> Result<(), HostError> {
        if self.fail_mutations {
            return Err(HostError::rejected("update actor", "document is locked"));
        }
        self.mutations.lock().await.push((actor.clone(), patch));
        Ok(())
    }

    async fn add_items(&self, actor: &ActorId, items: Vec<GrantedFeat>) -> Result<(), HostError> {
        self.added_items.lock().await.push((actor.clone(), items));
        Ok(())
    }
}

#[async_trait]
impl MessageSink for InMemoryHost {
    async fn post_public(&self, content: String, speaker: String) -> Result<(), HostError> {
        self.posts
            .lock()
            .await
            .push(PostedMessage::Public { content, speaker });
        Ok(())
    }

    async fn post_private(
        &self,
        content: String,
        recipients: Vec<UserId>,
        speaker: String,
    ) -> Result<(), HostError> {
        self.posts.lock().await.push(PostedMessage::Private {
            content,
            recipients,
            speaker,
        });
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for InMemoryHost {
    async fn game_master_ids(&self) -> Result<Vec<UserId>, HostError> {
        Ok(self.game_masters.clone())
    }
}

/// Localizer with no translation table; every message uses its English text.
pub struct EnglishOnly;

impl Localizer for EnglishOnly {
    fn localize(&self, _key: &str) -> Option<String> {
        None
    }
}
