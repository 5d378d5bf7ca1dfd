//! Feat catalog entries.
//!
//! A [`FeatRecord`] is an immutable snapshot of one feat document from the
//! host's feat compendium. Traits are normalized on construction so that
//! every trait comparison in the crate can be a plain set lookup.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::common::normalize_key;
use crate::error::DomainError;
use crate::ids::ItemRef;

/// Rarity trait of a feat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Unique,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Unique => "unique",
        }
    }

    pub fn is_common(&self) -> bool {
        matches!(self, Rarity::Common)
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rarity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "common" => Ok(Rarity::Common),
            "uncommon" => Ok(Rarity::Uncommon),
            "rare" => Ok(Rarity::Rare),
            "unique" => Ok(Rarity::Unique),
            _ => Err(DomainError::parse(format!("Unknown rarity: {}", s))),
        }
    }
}

/// How many times a feat may be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxTakable {
    Limited(u32),
    Unbounded,
}

impl MaxTakable {
    /// Single-take feats drop out of queries once the character has them.
    pub fn is_single(&self) -> bool {
        matches!(self, MaxTakable::Limited(1))
    }
}

impl Default for MaxTakable {
    fn default() -> Self {
        MaxTakable::Limited(1)
    }
}

/// Action cost shown on the feat card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionCost {
    #[default]
    Passive,
    Action {
        count: u8,
    },
    Reaction,
    Free,
}

impl ActionCost {
    /// Glyph text for the action-cost badge, `None` for passive feats.
    pub fn glyph(&self) -> Option<String> {
        match self {
            ActionCost::Passive => None,
            ActionCost::Action { count } => Some(count.to_string()),
            ActionCost::Reaction => Some("R".to_string()),
            ActionCost::Free => Some("F".to_string()),
        }
    }
}

/// A feat catalog entry.
///
/// Fields are public except `traits`, which must stay normalized; build
/// records with [`FeatRecord::new`] and the `with_*` methods.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeatRecord {
    /// Host reference used to resolve the full document at commit time
    pub id: ItemRef,
    /// Display name
    pub name: String,
    /// Normalized trait set
    #[serde(deserialize_with = "deserialize_traits")]
    traits: BTreeSet<String>,
    /// Feat level
    pub level: u8,
    #[serde(default)]
    pub max_takable: MaxTakable,
    /// Free-text prerequisite clauses, in document order
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(default)]
    pub action: ActionCost,
    /// Description markup
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub img: Option<String>,
}

fn deserialize_traits<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    Ok(raw.iter().map(|t| normalize_key(t)).collect())
}

impl FeatRecord {
    /// Create a common, single-take, passive feat with no traits.
    pub fn new(id: impl Into<ItemRef>, name: impl Into<String>, level: u8) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            traits: BTreeSet::new(),
            level,
            max_takable: MaxTakable::default(),
            prerequisites: Vec::new(),
            rarity: Rarity::Common,
            action: ActionCost::Passive,
            description: String::new(),
            img: None,
        }
    }

    pub fn with_traits<I, S>(mut self, traits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.traits
            .extend(traits.into_iter().map(|t| normalize_key(t.as_ref())));
        self
    }

    pub fn with_max_takable(mut self, max_takable: MaxTakable) -> Self {
        self.max_takable = max_takable;
        self
    }

    pub fn with_prerequisite(mut self, clause: impl Into<String>) -> Self {
        self.prerequisites.push(clause.into());
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_action(mut self, action: ActionCost) -> Self {
        self.action = action;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_img(mut self, img: impl Into<String>) -> Self {
        self.img = Some(img.into());
        self
    }

    /// Normalized traits, sorted.
    pub fn traits(&self) -> &BTreeSet<String> {
        &self.traits
    }

    /// Whether the feat carries `trait_name` (compared after normalization).
    pub fn has_trait(&self, trait_name: &str) -> bool {
        self.traits.contains(&normalize_key(trait_name))
    }

    pub fn is_archetype(&self) -> bool {
        self.has_trait("archetype")
    }

    /// Name shown in pickers; flagged with `*` when prerequisites exist and
    /// the host wants them called out.
    pub fn display_name(&self, show_prerequisites: bool) -> String {
        if show_prerequisites && !self.prerequisites.is_empty() {
            format!("{}*", self.name)
        } else {
            self.name.clone()
        }
    }
}
