//! Feat catalog and the trait queries run against it.

mod query;

pub use query::{
    build_query, candidates_for_slot, slot_is_active, SlotCandidates, SlotQueryOptions,
    TraitQuery,
};

use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::{CharacterContext, FeatRecord};
use crate::ids::ItemRef;

/// The full feat compendium, loaded once and then only read.
#[derive(Debug, Default)]
pub struct FeatCatalog {
    feats: Vec<Arc<FeatRecord>>,
    by_id: HashMap<ItemRef, usize>,
}

impl FeatCatalog {
    pub fn new(feats: Vec<FeatRecord>) -> Self {
        let feats: Vec<Arc<FeatRecord>> = feats.into_iter().map(Arc::new).collect();
        let by_id = feats
            .iter()
            .enumerate()
            .map(|(index, feat)| (feat.id.clone(), index))
            .collect();
        Self { feats, by_id }
    }

    pub fn len(&self) -> usize {
        self.feats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feats.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<FeatRecord>> {
        self.feats.iter()
    }

    pub fn get(&self, id: &ItemRef) -> Option<&Arc<FeatRecord>> {
        self.by_id.get(id).and_then(|index| self.feats.get(*index))
    }

    /// Feats matching `query` that the character may take at `target_level`.
    ///
    /// A feat matches when it shares a trait with the query, its level does
    /// not exceed the target, and it is not a single-take feat the character
    /// already has. Catalog order is preserved.
    pub fn filter(
        &self,
        query: &TraitQuery,
        target_level: u8,
        character: &CharacterContext,
    ) -> Vec<Arc<FeatRecord>> {
        self.feats
            .iter()
            .filter(|feat| {
                query.matches(feat)
                    && feat.level <= target_level
                    && !(character.has_feat(&feat.name) && feat.max_takable.is_single())
            })
            .cloned()
            .collect()
    }
}
