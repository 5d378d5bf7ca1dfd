//! Picker filter state and the four feat orderings.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::common::locale_cmp;
use crate::entities::{FeatRecord, Skill};
use crate::error::DomainError;

/// Primary sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortMethod {
    #[default]
    ByLevel,
    ByName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// The four orderings offered by the sort setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SortPreset {
    #[default]
    LevelDesc,
    LevelAsc,
    AlphaAsc,
    AlphaDesc,
}

impl SortPreset {
    pub fn from_parts(method: SortMethod, order: SortOrder) -> Self {
        match (method, order) {
            (SortMethod::ByLevel, SortOrder::Desc) => SortPreset::LevelDesc,
            (SortMethod::ByLevel, SortOrder::Asc) => SortPreset::LevelAsc,
            (SortMethod::ByName, SortOrder::Asc) => SortPreset::AlphaAsc,
            (SortMethod::ByName, SortOrder::Desc) => SortPreset::AlphaDesc,
        }
    }

    pub fn method(&self) -> SortMethod {
        match self {
            SortPreset::LevelDesc | SortPreset::LevelAsc => SortMethod::ByLevel,
            SortPreset::AlphaAsc | SortPreset::AlphaDesc => SortMethod::ByName,
        }
    }

    pub fn order(&self) -> SortOrder {
        match self {
            SortPreset::LevelAsc | SortPreset::AlphaAsc => SortOrder::Asc,
            SortPreset::LevelDesc | SortPreset::AlphaDesc => SortOrder::Desc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortPreset::LevelDesc => "LEVEL_DESC",
            SortPreset::LevelAsc => "LEVEL_ASC",
            SortPreset::AlphaAsc => "ALPHA_ASC",
            SortPreset::AlphaDesc => "ALPHA_DESC",
        }
    }

    /// Orders two feats.
    ///
    /// Ties on the primary key always fall back to ascending name order,
    /// whatever the direction, and finally to the reference so the result is
    /// total.
    pub fn compare(&self, a: &FeatRecord, b: &FeatRecord) -> Ordering {
        let primary = match self.method() {
            SortMethod::ByLevel => a.level.cmp(&b.level),
            SortMethod::ByName => locale_cmp(&a.name, &b.name),
        };
        let primary = match self.order() {
            SortOrder::Asc => primary,
            SortOrder::Desc => primary.reverse(),
        };
        primary
            .then_with(|| locale_cmp(&a.name, &b.name))
            .then_with(|| a.id.cmp(&b.id))
    }
}

impl std::fmt::Display for SortPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortPreset {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LEVEL_DESC" => Ok(SortPreset::LevelDesc),
            "LEVEL_ASC" => Ok(SortPreset::LevelAsc),
            // Older settings stored a single alphabetical option
            "ALPHA_ASC" | "ALPHABETICAL" => Ok(SortPreset::AlphaAsc),
            "ALPHA_DESC" => Ok(SortPreset::AlphaDesc),
            _ => Err(DomainError::parse(format!("Unknown feat sort method: {s}"))),
        }
    }
}

impl TryFrom<String> for SortPreset {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SortPreset> for String {
    fn from(value: SortPreset) -> Self {
        value.as_str().to_string()
    }
}

/// Sorts feats in place.
pub fn sort_feats(feats: &mut [Arc<FeatRecord>], preset: SortPreset) {
    feats.sort_by(|a, b| preset.compare(a, b));
}

/// Filters of one open feat picker.
///
/// Created fresh when a picker opens and dropped when it closes.
///
/// # Invariants
///
/// - `search` and `dedication_search` are stored lower-cased
/// - turning archetype feats off clears `dedication_search`; the free-archetype
///   picker searches dedications without turning them on
/// - `skills` is empty while skill feats are hidden
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionFilterState {
    min_level: Option<u8>,
    max_level: Option<u8>,
    search: String,
    sort_method: SortMethod,
    sort_order: SortOrder,
    skills: BTreeSet<Skill>,
    include_archetype: bool,
    hide_skill_feats: bool,
    dedication_search: String,
}

impl SelectionFilterState {
    pub fn new(sort: SortPreset) -> Self {
        Self {
            sort_method: sort.method(),
            sort_order: sort.order(),
            ..Self::default()
        }
    }

    pub fn with_include_archetype(mut self, include: bool) -> Self {
        self.set_include_archetype(include);
        self
    }

    // Accessors

    pub fn min_level(&self) -> Option<u8> {
        self.min_level
    }

    pub fn max_level(&self) -> Option<u8> {
        self.max_level
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort_method(&self) -> SortMethod {
        self.sort_method
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn sort_preset(&self) -> SortPreset {
        SortPreset::from_parts(self.sort_method, self.sort_order)
    }

    pub fn skills(&self) -> &BTreeSet<Skill> {
        &self.skills
    }

    pub fn include_archetype(&self) -> bool {
        self.include_archetype
    }

    pub fn hide_skill_feats(&self) -> bool {
        self.hide_skill_feats
    }

    pub fn dedication_search(&self) -> &str {
        &self.dedication_search
    }

    // Mutations

    pub fn set_min_level(&mut self, level: Option<u8>) {
        self.min_level = level;
    }

    pub fn set_max_level(&mut self, level: Option<u8>) {
        self.max_level = level;
    }

    pub fn set_search(&mut self, search: &str) {
        self.search = search.trim().to_lowercase();
    }

    pub fn set_sort_method(&mut self, method: SortMethod) {
        self.sort_method = method;
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.sort_order = order;
    }

    pub fn toggle_sort_order(&mut self) {
        self.sort_order = self.sort_order.toggled();
    }

    /// Adds or removes a skill from the skill filter.
    pub fn toggle_skill(&mut self, skill: Skill) {
        if !self.skills.remove(&skill) {
            self.skills.insert(skill);
        }
    }

    pub fn clear_skills(&mut self) {
        self.skills.clear();
    }

    pub fn set_include_archetype(&mut self, include: bool) {
        self.include_archetype = include;
        if !include {
            self.dedication_search.clear();
        }
    }

    pub fn set_hide_skill_feats(&mut self, hide: bool) {
        self.hide_skill_feats = hide;
        if hide {
            self.skills.clear();
        }
    }

    /// Stored whatever `include_archetype` is, since the free-archetype slot
    /// always offers archetype feats.
    pub fn set_dedication_search(&mut self, search: &str) {
        self.dedication_search = search.trim().to_lowercase();
    }
}
