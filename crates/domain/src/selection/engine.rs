//! Picker sessions: the visible candidate list for one feat slot.

use std::sync::Arc;

use super::filter::{sort_feats, SelectionFilterState};
use crate::entities::{FeatRecord, Rarity};
use crate::error::DomainError;
use crate::game_systems::pf2e::Vocabulary;
use crate::ids::ItemRef;
use crate::value_objects::FeatSlot;

/// A feat picked for a slot.
///
/// Produced only by [`SelectionSession::select`].
#[derive(Debug, Clone, PartialEq)]
pub struct FeatSelected {
    pub slot: FeatSlot,
    pub feat: Arc<FeatRecord>,
}

/// One open picker.
///
/// Holds the slot's base candidates and the picker filters; the visible list
/// is recomputed from both after every filter change.
#[derive(Debug, Clone)]
pub struct SelectionSession {
    slot: FeatSlot,
    base: Vec<Arc<FeatRecord>>,
    filters: SelectionFilterState,
    hide_uncommon: bool,
    vocabulary: Arc<Vocabulary>,
    visible: Vec<Arc<FeatRecord>>,
}

impl SelectionSession {
    pub fn new(
        slot: FeatSlot,
        base: Vec<Arc<FeatRecord>>,
        filters: SelectionFilterState,
        vocabulary: Arc<Vocabulary>,
    ) -> Self {
        let mut session = Self {
            slot,
            base,
            filters,
            hide_uncommon: false,
            vocabulary,
            visible: Vec::new(),
        };
        session.visible = session.recompute();
        session
    }

    /// Only show common feats.
    pub fn with_hide_uncommon(mut self, hide: bool) -> Self {
        self.hide_uncommon = hide;
        self.visible = self.recompute();
        self
    }

    pub fn slot(&self) -> FeatSlot {
        self.slot
    }

    pub fn base(&self) -> &[Arc<FeatRecord>] {
        &self.base
    }

    pub fn filters(&self) -> &SelectionFilterState {
        &self.filters
    }

    /// Candidates currently shown, in display order.
    pub fn visible(&self) -> &[Arc<FeatRecord>] {
        &self.visible
    }

    /// Change the filters and refresh the visible list.
    pub fn update<F>(&mut self, change: F) -> &[Arc<FeatRecord>]
    where
        F: FnOnce(&mut SelectionFilterState),
    {
        change(&mut self.filters);
        self.visible = self.recompute();
        &self.visible
    }

    /// The visible list for the current filters, freshly computed.
    pub fn recompute(&self) -> Vec<Arc<FeatRecord>> {
        let mut visible: Vec<Arc<FeatRecord>> = self
            .base
            .iter()
            .filter(|feat| self.matches(feat))
            .cloned()
            .collect();
        sort_feats(&mut visible, self.filters.sort_preset());
        visible
    }

    /// Whether a feat passes every picker filter.
    pub fn matches(&self, feat: &FeatRecord) -> bool {
        let filters = &self.filters;

        if filters.min_level().is_some_and(|min| feat.level < min)
            || filters.max_level().is_some_and(|max| feat.level > max)
        {
            return false;
        }

        if !filters.search().is_empty() && !feat.name.to_lowercase().contains(filters.search()) {
            return false;
        }

        if self.slot == FeatSlot::General && filters.hide_skill_feats() && feat.has_trait("skill")
        {
            return false;
        }

        if !filters.skills().is_empty() {
            let associated = self.vocabulary.associated_skills(&feat.prerequisites);
            if filters.skills().is_disjoint(&associated) {
                return false;
            }
        }

        if self.slot != FeatSlot::FreeArchetype
            && feat.is_archetype()
            && !filters.include_archetype()
        {
            return false;
        }

        if !filters.dedication_search().is_empty() && !self.requires_dedication(feat) {
            return false;
        }

        !self.hide_uncommon || feat.rarity == Rarity::Common
    }

    fn requires_dedication(&self, feat: &FeatRecord) -> bool {
        let search = self.filters.dedication_search();
        feat.prerequisites.iter().any(|clause| {
            let lowered = clause.to_lowercase();
            lowered.contains(search) && self.vocabulary.is_dedication_clause(&lowered)
        })
    }

    /// Pick a visible candidate for this slot.
    pub fn select(&self, id: &ItemRef) -> Result<FeatSelected, DomainError> {
        self.visible
            .iter()
            .find(|feat| &feat.id == id)
            .map(|feat| FeatSelected {
                slot: self.slot,
                feat: Arc::clone(feat),
            })
            .ok_or_else(|| DomainError::CandidateNotFound(id.to_string()))
    }
}
