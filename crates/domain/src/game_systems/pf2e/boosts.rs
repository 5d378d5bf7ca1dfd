//! Attribute boost rules.
//!
//! Boosting an attribute whose modifier is already +4 or higher only counts
//! as a partial boost: two partial boosts raise the modifier by one. Whether
//! the next boost completes a pair depends on how many boosts the attribute
//! has received before.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::level_gates::is_ability_boost_level;
use crate::entities::CharacterContext;
use crate::value_objects::AbilityKey;

/// Full boost sets grant this many distinct attributes.
pub const FULL_BOOST_COUNT: usize = 4;

/// Which boost cadence the table uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoostRule {
    /// Four boosts at levels 5, 10, 15 and 20.
    #[default]
    Standard,
    /// Gradual boosts variant: one boost at each of levels 2-5, 7-10, 12-15
    /// and 17-20.
    Gradual,
}

impl BoostRule {
    pub fn is_active(&self, level: u8) -> bool {
        match self {
            BoostRule::Standard => is_ability_boost_level(level),
            BoostRule::Gradual => (2..=20).contains(&level) && level % 5 != 1,
        }
    }

    /// Number of boosts to choose at `level`; zero when the gate is closed.
    pub fn required_count(&self, level: u8) -> usize {
        if !self.is_active(level) {
            return 0;
        }
        match self {
            BoostRule::Standard => FULL_BOOST_COUNT,
            BoostRule::Gradual => 1,
        }
    }
}

/// An attribute as offered in the boost picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AbilityBoostOption {
    pub key: AbilityKey,
    pub modifier: i32,
    pub is_partial: bool,
}

impl AbilityBoostOption {
    /// Modifier after this boost is applied.
    pub fn boosted_modifier(&self) -> i32 {
        if self.is_partial {
            self.modifier
        } else {
            self.modifier + 1
        }
    }
}

/// Boost options for every attribute on the character, in attribute order.
pub fn detect_partial_boosts(character: &CharacterContext) -> Vec<AbilityBoostOption> {
    character
        .abilities
        .iter()
        .map(|(key, ability)| AbilityBoostOption {
            key: *key,
            modifier: ability.modifier,
            is_partial: ability.modifier >= 4 && ability.prior_boost_count % 2 == 0,
        })
        .collect()
}

/// One entry of the character's boost table: a list per level or source, or
/// the single class key boost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoostEntry {
    Many(Vec<AbilityKey>),
    One(AbilityKey),
}

/// The host's build record of attribute boosts and flaws.
///
/// Adapters use this to derive `prior_boost_count` for each attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildAttributes {
    #[serde(default)]
    pub boosts: BTreeMap<String, Option<BoostEntry>>,
    #[serde(default)]
    pub flaws: BTreeMap<String, Vec<AbilityKey>>,
}

impl BuildAttributes {
    /// Net boost count per attribute: every boost adds one, every flaw
    /// subtracts one. A lone key is only honoured for the `class` source.
    pub fn prior_boost_counts(&self) -> BTreeMap<AbilityKey, i32> {
        let mut counts: BTreeMap<AbilityKey, i32> = BTreeMap::new();
        for (source, entry) in &self.boosts {
            match entry {
                Some(BoostEntry::Many(keys)) => {
                    for key in keys {
                        *counts.entry(*key).or_default() += 1;
                    }
                }
                Some(BoostEntry::One(key)) if source == "class" => {
                    *counts.entry(*key).or_default() += 1;
                }
                _ => {}
            }
        }
        for key in self.flaws.values().flatten() {
            *counts.entry(*key).or_default() -= 1;
        }
        counts
    }
}
