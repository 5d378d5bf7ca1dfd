//! Typed view of the character being leveled.
//!
//! The host's actor documents are loosely structured; adapters build a
//! [`CharacterContext`] once at the boundary so the rules never deal with
//! optional paths.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{ActorId, ItemRef};
use crate::value_objects::{AbilityKey, ProficiencyRank, SlotQueryKind};

/// A granted class feature listed on the class document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClassFeatureRef {
    pub name: String,
    pub level: u8,
    pub reference: ItemRef,
    #[serde(default)]
    pub img: Option<String>,
}

/// The character's class document, reduced to what the level-up needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClassInfo {
    /// Class name; dual-class builds use `Primary-Secondary`
    pub name: String,
    #[serde(default)]
    pub class_feat_levels: BTreeSet<u8>,
    #[serde(default)]
    pub ancestry_feat_levels: BTreeSet<u8>,
    #[serde(default)]
    pub general_feat_levels: BTreeSet<u8>,
    #[serde(default)]
    pub skill_feat_levels: BTreeSet<u8>,
    #[serde(default)]
    pub skill_increase_levels: BTreeSet<u8>,
    #[serde(default)]
    pub spellcasting: bool,
    #[serde(default)]
    pub features: Vec<ClassFeatureRef>,
    /// Set when the class document was machine-translated by the host
    #[serde(default)]
    pub translated: bool,
}

impl ClassInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The standard Pathfinder 2e feat cadence shared by most classes.
    pub fn with_standard_progression(mut self) -> Self {
        self.class_feat_levels = (1..=20).filter(|l| l % 2 == 0).chain([1]).collect();
        self.ancestry_feat_levels = [1, 5, 9, 13, 17].into_iter().collect();
        self.general_feat_levels = [3, 7, 11, 15, 19].into_iter().collect();
        self.skill_feat_levels = (2..=20).step_by(2).collect();
        self.skill_increase_levels = (3..=19).step_by(2).collect();
        self
    }

    pub fn with_spellcasting(mut self, spellcasting: bool) -> Self {
        self.spellcasting = spellcasting;
        self
    }

    pub fn with_feature(mut self, feature: ClassFeatureRef) -> Self {
        self.features.push(feature);
        self
    }

    pub fn with_translated(mut self, translated: bool) -> Self {
        self.translated = translated;
        self
    }

    /// Primary and (for dual-class builds) secondary class names.
    pub fn class_names(&self) -> ClassNames {
        ClassNames::parse(&self.name)
    }

    pub fn is_dual_class(&self) -> bool {
        self.class_names().secondary.is_some()
    }

    /// Class-configured level list for slots gated by the class document.
    ///
    /// Archetype and ancestry-paragon slots are gated by fixed tables instead
    /// and return `None`.
    pub fn feat_levels(&self, kind: SlotQueryKind) -> Option<&BTreeSet<u8>> {
        match kind {
            SlotQueryKind::Class => Some(&self.class_feat_levels),
            SlotQueryKind::Ancestry => Some(&self.ancestry_feat_levels),
            SlotQueryKind::General => Some(&self.general_feat_levels),
            SlotQueryKind::Skill => Some(&self.skill_feat_levels),
            SlotQueryKind::Archetype | SlotQueryKind::AncestryParagon => None,
        }
    }
}

/// A class name split on `-` for dual-class builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNames {
    pub primary: String,
    pub secondary: Option<String>,
}

impl ClassNames {
    pub fn parse(name: &str) -> Self {
        let mut parts = name.split('-').map(str::trim);
        let primary = parts.next().unwrap_or_default().to_string();
        let secondary = parts
            .next()
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Self { primary, secondary }
    }
}

/// One skill as it currently stands on the character.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SkillEntry {
    pub label: String,
    pub rank: ProficiencyRank,
    pub modifier: i32,
}

impl SkillEntry {
    pub fn new(label: impl Into<String>, rank: ProficiencyRank, modifier: i32) -> Self {
        Self {
            label: label.into(),
            rank,
            modifier,
        }
    }
}

/// One attribute as it currently stands on the character.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AbilityEntry {
    pub modifier: i32,
    /// Boosts received so far, net of flaws
    pub prior_boost_count: i32,
}

impl AbilityEntry {
    pub fn new(modifier: i32, prior_boost_count: i32) -> Self {
        Self {
            modifier,
            prior_boost_count,
        }
    }
}

/// Read view of the character being leveled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CharacterContext {
    pub actor_id: ActorId,
    pub name: String,
    pub current_level: u8,
    #[serde(default)]
    pub class: Option<ClassInfo>,
    #[serde(default)]
    pub ancestry: Option<String>,
    #[serde(default)]
    pub heritage: Option<String>,
    /// Lower-cased names of feats already on the character
    #[serde(default)]
    existing_feat_names: BTreeSet<String>,
    /// Skills keyed by slug (core skills and lores)
    #[serde(default)]
    pub skills: BTreeMap<String, SkillEntry>,
    #[serde(default)]
    pub abilities: BTreeMap<AbilityKey, AbilityEntry>,
}

impl CharacterContext {
    pub fn new(actor_id: impl Into<ActorId>, name: impl Into<String>, current_level: u8) -> Self {
        Self {
            actor_id: actor_id.into(),
            name: name.into(),
            current_level,
            class: None,
            ancestry: None,
            heritage: None,
            existing_feat_names: BTreeSet::new(),
            skills: BTreeMap::new(),
            abilities: BTreeMap::new(),
        }
    }

    pub fn with_class(mut self, class: ClassInfo) -> Self {
        self.class = Some(class);
        self
    }

    pub fn with_ancestry(mut self, ancestry: impl Into<String>) -> Self {
        self.ancestry = Some(ancestry.into());
        self
    }

    pub fn with_heritage(mut self, heritage: impl Into<String>) -> Self {
        self.heritage = Some(heritage.into());
        self
    }

    pub fn with_existing_feats<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.existing_feat_names
            .extend(names.into_iter().map(|n| n.as_ref().to_lowercase()));
        self
    }

    pub fn with_skill(mut self, slug: impl Into<String>, entry: SkillEntry) -> Self {
        self.skills.insert(slug.into(), entry);
        self
    }

    pub fn with_ability(mut self, key: AbilityKey, entry: AbilityEntry) -> Self {
        self.abilities.insert(key, entry);
        self
    }

    /// Whether a feat with this name (any case) is already on the character.
    pub fn has_feat(&self, name: &str) -> bool {
        self.existing_feat_names.contains(&name.to_lowercase())
    }

    pub fn existing_feat_names(&self) -> &BTreeSet<String> {
        &self.existing_feat_names
    }

    /// The class document, or `MissingClass`.
    pub fn require_class(&self) -> Result<&ClassInfo, DomainError> {
        self.class.as_ref().ok_or(DomainError::MissingClass)
    }

    /// Checks that a level-up wizard can be opened for this character.
    ///
    /// Translated dual-class names no longer match feat traits, so they are
    /// rejected up front.
    pub fn validate_for_level_up(&self) -> Result<&ClassInfo, DomainError> {
        let class = self.require_class()?;
        if class.translated && class.name.contains('-') {
            return Err(DomainError::TranslatedDualClass(class.name.clone()));
        }
        Ok(class)
    }

    /// Level being planned: the next level, or the current one when the level
    /// field was already changed by other means.
    pub fn target_level(&self, retroactive: bool) -> u8 {
        if retroactive {
            self.current_level
        } else {
            self.current_level.saturating_add(1)
        }
    }
}
