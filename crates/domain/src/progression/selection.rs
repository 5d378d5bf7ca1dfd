//! Choices accumulated while the wizard is open.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::entities::FeatRecord;
use crate::selection::FeatSelected;
use crate::value_objects::{AbilityKey, FeatSlot};

/// The user's picks for one level-up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressionSelection {
    feats: BTreeMap<FeatSlot, Arc<FeatRecord>>,
    skill_increase: Option<String>,
    boosts: BTreeSet<AbilityKey>,
}

impl ProgressionSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill a slot from a picker event, replacing any earlier pick.
    pub fn apply(&mut self, selected: FeatSelected) {
        self.feats.insert(selected.slot, selected.feat);
    }

    pub fn clear_feat(&mut self, slot: FeatSlot) -> Option<Arc<FeatRecord>> {
        self.feats.remove(&slot)
    }

    pub fn feat(&self, slot: FeatSlot) -> Option<&Arc<FeatRecord>> {
        self.feats.get(&slot)
    }

    /// Picked feats in slot order.
    pub fn feats(&self) -> impl Iterator<Item = (FeatSlot, &Arc<FeatRecord>)> {
        self.feats.iter().map(|(slot, feat)| (*slot, feat))
    }

    pub fn set_skill_increase(&mut self, skill: Option<String>) {
        self.skill_increase = skill.filter(|s| !s.is_empty());
    }

    pub fn skill_increase(&self) -> Option<&str> {
        self.skill_increase.as_deref()
    }

    /// Toggle a boost. Adding is refused once `cap` boosts are chosen.
    ///
    /// Returns whether the attribute is selected afterwards.
    pub fn toggle_boost(&mut self, key: AbilityKey, cap: usize) -> bool {
        if self.boosts.remove(&key) {
            return false;
        }
        if self.boosts.len() >= cap {
            return false;
        }
        self.boosts.insert(key);
        true
    }

    pub fn boosts(&self) -> &BTreeSet<AbilityKey> {
        &self.boosts
    }
}
