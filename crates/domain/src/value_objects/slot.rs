//! Feat slots and the trait queries behind them.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// One named opportunity to pick a feat at a given level.
///
/// Variant order is the order selections are committed and listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatSlot {
    Class,
    DualClass,
    Ancestry,
    Skill,
    General,
    FreeArchetype,
    AncestryParagon,
}

impl FeatSlot {
    pub const ALL: [FeatSlot; 7] = [
        FeatSlot::Class,
        FeatSlot::DualClass,
        FeatSlot::Ancestry,
        FeatSlot::Skill,
        FeatSlot::General,
        FeatSlot::FreeArchetype,
        FeatSlot::AncestryParagon,
    ];

    /// Form field key used by the host sheet.
    pub fn key(&self) -> &'static str {
        match self {
            FeatSlot::Class => "classFeats",
            FeatSlot::DualClass => "dualClassFeats",
            FeatSlot::Ancestry => "ancestryFeats",
            FeatSlot::Skill => "skillFeats",
            FeatSlot::General => "generalFeats",
            FeatSlot::FreeArchetype => "freeArchetypeFeats",
            FeatSlot::AncestryParagon => "ancestryParagonFeats",
        }
    }

    /// Feat group the granted item is filed under on the character sheet.
    pub fn group_label(&self) -> &'static str {
        match self {
            FeatSlot::Class => "class",
            FeatSlot::DualClass => "xdy_dualclass",
            FeatSlot::Ancestry => "ancestry",
            FeatSlot::Skill => "skill",
            FeatSlot::General => "general",
            FeatSlot::FreeArchetype => "archetype",
            FeatSlot::AncestryParagon => "xdy_ancestryparagon",
        }
    }

    /// Sheet location for a feat taken in this slot at `level`.
    pub fn location(&self, level: u8) -> String {
        format!("{}-{}", self.group_label(), level)
    }

    /// Human-readable title for picker windows.
    pub fn title(&self) -> &'static str {
        match self {
            FeatSlot::Class | FeatSlot::DualClass => "Class Feats",
            FeatSlot::Ancestry => "Ancestry Feats",
            FeatSlot::Skill => "Skill Feats",
            FeatSlot::General => "General Feats",
            FeatSlot::FreeArchetype => "Free Archetype Feats",
            FeatSlot::AncestryParagon => "Ancestry Paragon Feats",
        }
    }

    /// Which trait query feeds this slot.
    pub fn query_kind(&self) -> SlotQueryKind {
        match self {
            FeatSlot::Class | FeatSlot::DualClass => SlotQueryKind::Class,
            FeatSlot::Ancestry => SlotQueryKind::Ancestry,
            FeatSlot::Skill => SlotQueryKind::Skill,
            FeatSlot::General => SlotQueryKind::General,
            FeatSlot::FreeArchetype => SlotQueryKind::Archetype,
            FeatSlot::AncestryParagon => SlotQueryKind::AncestryParagon,
        }
    }
}

impl std::fmt::Display for FeatSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FeatSlot {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatSlot::ALL
            .into_iter()
            .find(|slot| slot.key() == s)
            .ok_or_else(|| DomainError::UnknownSlotType(s.to_string()))
    }
}

/// The kind of trait query a slot runs against the feat catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotQueryKind {
    Class,
    Ancestry,
    AncestryParagon,
    General,
    Skill,
    Archetype,
}

impl SlotQueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotQueryKind::Class => "class",
            SlotQueryKind::Ancestry => "ancestry",
            SlotQueryKind::AncestryParagon => "ancestryParagon",
            SlotQueryKind::General => "general",
            SlotQueryKind::Skill => "skill",
            SlotQueryKind::Archetype => "archetype",
        }
    }

    /// Literal trait for the fixed queries; `None` for character-derived ones.
    pub fn literal_trait(&self) -> Option<&'static str> {
        match self {
            SlotQueryKind::General => Some("general"),
            SlotQueryKind::Skill => Some("skill"),
            SlotQueryKind::Archetype => Some("archetype"),
            SlotQueryKind::Class | SlotQueryKind::Ancestry | SlotQueryKind::AncestryParagon => {
                None
            }
        }
    }
}

impl std::fmt::Display for SlotQueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlotQueryKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "class" => Ok(SlotQueryKind::Class),
            "ancestry" => Ok(SlotQueryKind::Ancestry),
            "ancestryParagon" => Ok(SlotQueryKind::AncestryParagon),
            "general" => Ok(SlotQueryKind::General),
            "skill" => Ok(SlotQueryKind::Skill),
            "archetype" => Ok(SlotQueryKind::Archetype),
            _ => Err(DomainError::UnknownSlotType(s.to_string())),
        }
    }
}
