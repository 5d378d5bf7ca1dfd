//! The sixteen core Pathfinder 2e skills.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::normalize_key;
use crate::error::DomainError;

/// Core skills that prerequisite text is scanned for.
///
/// Lore skills are open-ended and only appear as strings on the character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skill {
    Acrobatics,
    Arcana,
    Athletics,
    Crafting,
    Deception,
    Diplomacy,
    Intimidation,
    Medicine,
    Nature,
    Occultism,
    Performance,
    Religion,
    Society,
    Stealth,
    Survival,
    Thievery,
}

impl Skill {
    pub const ALL: [Skill; 16] = [
        Skill::Acrobatics,
        Skill::Arcana,
        Skill::Athletics,
        Skill::Crafting,
        Skill::Deception,
        Skill::Diplomacy,
        Skill::Intimidation,
        Skill::Medicine,
        Skill::Nature,
        Skill::Occultism,
        Skill::Performance,
        Skill::Religion,
        Skill::Society,
        Skill::Stealth,
        Skill::Survival,
        Skill::Thievery,
    ];

    /// Canonical slug, as used for skill keys on the character.
    pub fn slug(&self) -> &'static str {
        match self {
            Skill::Acrobatics => "acrobatics",
            Skill::Arcana => "arcana",
            Skill::Athletics => "athletics",
            Skill::Crafting => "crafting",
            Skill::Deception => "deception",
            Skill::Diplomacy => "diplomacy",
            Skill::Intimidation => "intimidation",
            Skill::Medicine => "medicine",
            Skill::Nature => "nature",
            Skill::Occultism => "occultism",
            Skill::Performance => "performance",
            Skill::Religion => "religion",
            Skill::Society => "society",
            Skill::Stealth => "stealth",
            Skill::Survival => "survival",
            Skill::Thievery => "thievery",
        }
    }

    /// English display label.
    pub fn label(&self) -> &'static str {
        match self {
            Skill::Acrobatics => "Acrobatics",
            Skill::Arcana => "Arcana",
            Skill::Athletics => "Athletics",
            Skill::Crafting => "Crafting",
            Skill::Deception => "Deception",
            Skill::Diplomacy => "Diplomacy",
            Skill::Intimidation => "Intimidation",
            Skill::Medicine => "Medicine",
            Skill::Nature => "Nature",
            Skill::Occultism => "Occultism",
            Skill::Performance => "Performance",
            Skill::Religion => "Religion",
            Skill::Society => "Society",
            Skill::Stealth => "Stealth",
            Skill::Survival => "Survival",
            Skill::Thievery => "Thievery",
        }
    }
}

impl std::fmt::Display for Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Skill {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_key(s.trim());
        Skill::ALL
            .into_iter()
            .find(|skill| skill.slug() == key)
            .ok_or_else(|| DomainError::parse(format!("Unknown skill: {}", s)))
    }
}
