//! Candidate lists for every feat slot of a level-up.

use std::collections::BTreeMap;

use levelwiz_domain::{
    candidates_for_slot, CharacterContext, DomainError, FeatCatalog, FeatSlot, SlotCandidates,
    SlotQueryOptions,
};

/// Query every slot. A slot whose query cannot be built is logged and left
/// applicable but empty; a missing class is an error.
pub fn assemble_candidates(
    catalog: &FeatCatalog,
    character: &CharacterContext,
    target_level: u8,
    options: &SlotQueryOptions,
) -> Result<BTreeMap<FeatSlot, SlotCandidates>, DomainError> {
    FeatSlot::ALL
        .into_iter()
        .map(|slot| {
            slot_candidates(catalog, character, slot, target_level, options)
                .map(|candidates| (slot, candidates))
        })
        .collect()
}

pub fn slot_candidates(
    catalog: &FeatCatalog,
    character: &CharacterContext,
    slot: FeatSlot,
    target_level: u8,
    options: &SlotQueryOptions,
) -> Result<SlotCandidates, DomainError> {
    match candidates_for_slot(catalog, character, slot, target_level, options) {
        Ok(candidates) => {
            tracing::debug!(
                actor = %character.actor_id,
                slot = %slot,
                level = target_level,
                candidates = candidates.len(),
                "Slot candidates computed"
            );
            Ok(candidates)
        }
        Err(DomainError::UnresolvedQuery(slot)) => {
            tracing::warn!(actor = %character.actor_id, slot = %slot, "No trait query for slot");
            Ok(SlotCandidates::Available(Vec::new()))
        }
        Err(e) => Err(e),
    }
}

/// Candidates for a slot named by its host form key.
///
/// Unknown keys are logged and yield an empty list.
pub fn candidates_for_key(
    catalog: &FeatCatalog,
    character: &CharacterContext,
    key: &str,
    target_level: u8,
    options: &SlotQueryOptions,
) -> Result<SlotCandidates, DomainError> {
    match key.parse::<FeatSlot>() {
        Ok(slot) => slot_candidates(catalog, character, slot, target_level, options),
        Err(e) => {
            tracing::warn!(actor = %character.actor_id, error = %e, "Ignoring feat slot");
            Ok(SlotCandidates::Available(Vec::new()))
        }
    }
}
