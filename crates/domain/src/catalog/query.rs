//! Trait queries for feat slots.
//!
//! Each slot kind translates the character context into a set of traits; a
//! feat is a candidate when it shares at least one of them.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::FeatCatalog;
use crate::common::normalize_key;
use crate::entities::{CharacterContext, ClassInfo, FeatRecord};
use crate::error::DomainError;
use crate::game_systems::pf2e::{is_ancestry_paragon_level, is_archetype_feat_level};
use crate::selection::{sort_feats, SortPreset};
use crate::value_objects::{FeatSlot, SlotQueryKind};

/// A normalized set of traits to match against feat traits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TraitQuery {
    traits: BTreeSet<String>,
}

impl TraitQuery {
    pub fn new<I, S>(traits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            traits: traits
                .into_iter()
                .map(|t| normalize_key(t.as_ref()))
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    pub fn single(trait_name: &str) -> Self {
        Self::new([trait_name])
    }

    pub fn with_trait(mut self, trait_name: &str) -> Self {
        let normalized = normalize_key(trait_name);
        if !normalized.is_empty() {
            self.traits.insert(normalized);
        }
        self
    }

    pub fn traits(&self) -> &BTreeSet<String> {
        &self.traits
    }

    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }

    pub fn matches(&self, feat: &FeatRecord) -> bool {
        !self.traits.is_disjoint(feat.traits())
    }
}

/// Whether a slot kind grants a feat at `level` for this class.
///
/// Class, ancestry, general and skill slots follow the class document's
/// level lists; archetype and ancestry-paragon slots follow the fixed gates.
pub fn slot_is_active(kind: SlotQueryKind, class: &ClassInfo, level: u8) -> bool {
    match kind {
        SlotQueryKind::Archetype => is_archetype_feat_level(level),
        SlotQueryKind::AncestryParagon => is_ancestry_paragon_level(level),
        SlotQueryKind::Class
        | SlotQueryKind::Ancestry
        | SlotQueryKind::General
        | SlotQueryKind::Skill => class
            .feat_levels(kind)
            .is_some_and(|levels| levels.contains(&level)),
    }
}

/// Build the trait query for a slot kind.
///
/// `class_name` selects which half of a dual class a class query searches;
/// when absent the primary class is used. Returns `None` when the character
/// lacks the name the query needs.
pub fn build_query(
    kind: SlotQueryKind,
    character: &CharacterContext,
    class_name: Option<&str>,
) -> Option<TraitQuery> {
    if let Some(literal) = kind.literal_trait() {
        return Some(TraitQuery::single(literal));
    }
    match kind {
        SlotQueryKind::Class => {
            let name = match class_name {
                Some(name) => name.to_string(),
                None => character.class.as_ref()?.class_names().primary,
            };
            let query = TraitQuery::single(&name);
            (!query.is_empty()).then_some(query)
        }
        _ => ancestry_query(character),
    }
}

/// Ancestry plus heritage traits.
///
/// Versatile heritages that descend from another ancestry also open that
/// ancestry's feats.
fn ancestry_query(character: &CharacterContext) -> Option<TraitQuery> {
    let ancestry = character.ancestry.as_deref().filter(|a| !a.trim().is_empty())?;
    let mut query = TraitQuery::single(ancestry);
    if let Some(heritage) = character.heritage.as_deref().filter(|h| !h.trim().is_empty()) {
        query = query.with_trait(heritage);
        match heritage {
            "Aiuvarin" => query = query.with_trait("Elf"),
            "Dromaar" => query = query.with_trait("Orc"),
            _ => {}
        }
    }
    Some(query)
}

/// Switches that shape slot candidate lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlotQueryOptions {
    /// Free-archetype variant rule is in play
    pub free_archetype: bool,
    /// Ancestry-paragon variant rule is in play
    pub ancestry_paragon: bool,
    /// Class slots also offer archetype feats
    pub include_archetype_feats: bool,
    /// Initial ordering of each list
    pub sort: SortPreset,
}

/// Result of querying one slot.
///
/// "Not applicable" means the slot grants nothing at this level; it is
/// distinct from an applicable slot with zero matches.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotCandidates {
    NotApplicable,
    Available(Vec<Arc<FeatRecord>>),
}

impl SlotCandidates {
    pub fn is_applicable(&self) -> bool {
        matches!(self, SlotCandidates::Available(_))
    }

    /// Candidate feats; empty when not applicable.
    pub fn feats(&self) -> &[Arc<FeatRecord>] {
        match self {
            SlotCandidates::NotApplicable => &[],
            SlotCandidates::Available(feats) => feats,
        }
    }

    pub fn len(&self) -> usize {
        self.feats().len()
    }

    pub fn is_empty(&self) -> bool {
        self.feats().is_empty()
    }
}

/// Candidates for one feat slot at `target_level`.
///
/// Dual-class characters query each class half separately, so the class and
/// dual-class slots never share a list.
pub fn candidates_for_slot(
    catalog: &FeatCatalog,
    character: &CharacterContext,
    slot: FeatSlot,
    target_level: u8,
    options: &SlotQueryOptions,
) -> Result<SlotCandidates, DomainError> {
    let class = character.require_class()?;
    let names = class.class_names();
    let class_name = match slot {
        FeatSlot::Class => Some(names.primary),
        FeatSlot::DualClass => match names.secondary {
            Some(secondary) => Some(secondary),
            None => return Ok(SlotCandidates::NotApplicable),
        },
        _ => None,
    };

    let variant_enabled = match slot {
        FeatSlot::FreeArchetype => options.free_archetype,
        FeatSlot::AncestryParagon => options.ancestry_paragon,
        _ => true,
    };
    let kind = slot.query_kind();
    if !variant_enabled || !slot_is_active(kind, class, target_level) {
        return Ok(SlotCandidates::NotApplicable);
    }

    let mut query = build_query(kind, character, class_name.as_deref())
        .ok_or(DomainError::UnresolvedQuery(slot))?;
    if options.include_archetype_feats && kind == SlotQueryKind::Class {
        query = query.with_trait("archetype");
    }

    let mut feats = catalog.filter(&query, target_level, character);
    sort_feats(&mut feats, options.sort);
    Ok(SlotCandidates::Available(feats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::MaxTakable;

    fn fighter(level: u8) -> CharacterContext {
        CharacterContext::new("actor-1", "Valeros", level)
            .with_class(ClassInfo::new("Fighter").with_standard_progression())
            .with_ancestry("Human")
    }

    fn names(candidates: &SlotCandidates) -> Vec<&str> {
        candidates.feats().iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn class_query_excludes_taken_single_take_feats() {
        let catalog = FeatCatalog::new(vec![
            FeatRecord::new("f5", "Lunging Stance", 5).with_traits(["Fighter"]),
            FeatRecord::new("f3", "Intimidating Strike", 3).with_traits(["Fighter"]),
        ]);
        // Leveling 4 -> 5: odd level, so the class slot stays closed on the
        // standard cadence; open it explicitly for this scenario.
        let mut class = ClassInfo::new("Fighter").with_standard_progression();
        class.class_feat_levels.insert(5);
        let character = CharacterContext::new("actor-1", "Valeros", 4)
            .with_class(class)
            .with_existing_feats(["Intimidating Strike"]);

        let candidates = candidates_for_slot(
            &catalog,
            &character,
            FeatSlot::Class,
            character.target_level(false),
            &SlotQueryOptions::default(),
        )
        .expect("query");
        assert_eq!(names(&candidates), vec!["Lunging Stance"]);
    }

    #[test]
    fn repeatable_feats_stay_eligible_after_being_taken() {
        let catalog = FeatCatalog::new(vec![FeatRecord::new("g1", "Additional Lore", 1)
            .with_traits(["General", "Skill"])
            .with_max_takable(MaxTakable::Unbounded)]);
        let character = fighter(2).with_existing_feats(["additional lore"]);
        let candidates = candidates_for_slot(
            &catalog,
            &character,
            FeatSlot::General,
            3,
            &SlotQueryOptions::default(),
        )
        .expect("query");
        assert_eq!(names(&candidates), vec!["Additional Lore"]);
    }

    #[test]
    fn results_never_exceed_target_level() {
        let catalog = FeatCatalog::new(
            (1..=20)
                .map(|level| {
                    FeatRecord::new(format!("s{level}"), format!("Skill Feat {level}"), level)
                        .with_traits(["skill"])
                })
                .collect(),
        );
        let candidates = candidates_for_slot(
            &catalog,
            &fighter(5),
            FeatSlot::Skill,
            6,
            &SlotQueryOptions::default(),
        )
        .expect("query");
        assert_eq!(candidates.len(), 6);
        assert!(candidates.feats().iter().all(|f| f.level <= 6));
    }

    #[test]
    fn closed_gate_is_not_applicable_rather_than_empty() {
        let catalog = FeatCatalog::new(vec![]);
        let character = fighter(2);

        let closed = candidates_for_slot(
            &catalog,
            &character,
            FeatSlot::General,
            4,
            &SlotQueryOptions::default(),
        )
        .expect("query");
        assert_eq!(closed, SlotCandidates::NotApplicable);

        let open_but_empty = candidates_for_slot(
            &catalog,
            &character,
            FeatSlot::General,
            3,
            &SlotQueryOptions::default(),
        )
        .expect("query");
        assert_eq!(open_but_empty, SlotCandidates::Available(vec![]));
    }

    #[test]
    fn dual_class_halves_produce_separate_lists() {
        let catalog = FeatCatalog::new(vec![
            FeatRecord::new("f2", "Double Slice", 2).with_traits(["Fighter"]),
            FeatRecord::new("w2", "Familiar", 2).with_traits(["Wizard"]),
            FeatRecord::new("b2", "Combat Reading", 2).with_traits(["Fighter", "Wizard"]),
        ]);
        let character = CharacterContext::new("actor-2", "Seelah", 1)
            .with_class(ClassInfo::new("Fighter-Wizard").with_standard_progression());
        let options = SlotQueryOptions::default();

        let primary =
            candidates_for_slot(&catalog, &character, FeatSlot::Class, 2, &options).expect("query");
        let secondary = candidates_for_slot(&catalog, &character, FeatSlot::DualClass, 2, &options)
            .expect("query");

        assert_eq!(names(&primary), vec!["Combat Reading", "Double Slice"]);
        assert_eq!(names(&secondary), vec!["Combat Reading", "Familiar"]);
    }

    #[test]
    fn single_class_has_no_dual_class_slot() {
        let catalog = FeatCatalog::new(vec![]);
        let candidates = candidates_for_slot(
            &catalog,
            &fighter(1),
            FeatSlot::DualClass,
            2,
            &SlotQueryOptions::default(),
        )
        .expect("query");
        assert_eq!(candidates, SlotCandidates::NotApplicable);
    }

    #[test]
    fn versatile_heritages_add_parent_ancestry() {
        let character = fighter(1).with_heritage("Aiuvarin");
        let query = build_query(SlotQueryKind::Ancestry, &character, None).expect("query");
        let traits: Vec<_> = query.traits().iter().map(String::as_str).collect();
        assert_eq!(traits, vec!["aiuvarin", "elf", "human"]);

        let character = fighter(1).with_heritage("Dromaar");
        let query = build_query(SlotQueryKind::AncestryParagon, &character, None).expect("query");
        assert!(query.traits().contains("orc"));
    }

    #[test]
    fn missing_ancestry_leaves_query_unresolved() {
        let catalog = FeatCatalog::new(vec![]);
        let character = CharacterContext::new("actor-3", "Ghost", 0)
            .with_class(ClassInfo::new("Fighter").with_standard_progression());
        assert_eq!(
            candidates_for_slot(
                &catalog,
                &character,
                FeatSlot::Ancestry,
                1,
                &SlotQueryOptions::default()
            ),
            Err(DomainError::UnresolvedQuery(FeatSlot::Ancestry))
        );
    }

    #[test]
    fn variant_slots_require_their_rule() {
        let catalog = FeatCatalog::new(vec![
            FeatRecord::new("a2", "Wizard Dedication", 2).with_traits(["Archetype", "Dedication"]),
        ]);
        let character = fighter(1);
        let off = candidates_for_slot(
            &catalog,
            &character,
            FeatSlot::FreeArchetype,
            2,
            &SlotQueryOptions::default(),
        )
        .expect("query");
        assert_eq!(off, SlotCandidates::NotApplicable);

        let options = SlotQueryOptions {
            free_archetype: true,
            ..SlotQueryOptions::default()
        };
        let on = candidates_for_slot(&catalog, &character, FeatSlot::FreeArchetype, 2, &options)
            .expect("query");
        assert_eq!(names(&on), vec!["Wizard Dedication"]);

        let odd = candidates_for_slot(&catalog, &character, FeatSlot::FreeArchetype, 3, &options)
            .expect("query");
        assert_eq!(odd, SlotCandidates::NotApplicable);
    }

    #[test]
    fn ancestry_paragon_slot_follows_variant_and_gate() {
        let catalog = FeatCatalog::new(vec![
            FeatRecord::new("h1", "Natural Ambition", 1).with_traits(["Human"]),
            FeatRecord::new("e3", "Elven Instincts", 3).with_traits(["Elf"]),
            FeatRecord::new("d1", "Dwarven Lore", 1).with_traits(["Dwarf"]),
            FeatRecord::new("g1", "Toughness", 1).with_traits(["General"]),
            FeatRecord::new("h5", "Clever Improviser", 5).with_traits(["Human"]),
        ]);
        let character = fighter(2).with_heritage("Aiuvarin");
        let class = ClassInfo::new("Fighter").with_standard_progression();

        assert!(slot_is_active(SlotQueryKind::AncestryParagon, &class, 3));
        assert!(!slot_is_active(SlotQueryKind::AncestryParagon, &class, 4));

        let off = candidates_for_slot(
            &catalog,
            &character,
            FeatSlot::AncestryParagon,
            3,
            &SlotQueryOptions::default(),
        )
        .expect("query");
        assert_eq!(off, SlotCandidates::NotApplicable);

        let options = SlotQueryOptions {
            ancestry_paragon: true,
            ..SlotQueryOptions::default()
        };
        let on = candidates_for_slot(&catalog, &character, FeatSlot::AncestryParagon, 3, &options)
            .expect("query");
        assert_eq!(names(&on), vec!["Elven Instincts", "Natural Ambition"]);

        let closed =
            candidates_for_slot(&catalog, &character, FeatSlot::AncestryParagon, 4, &options)
                .expect("query");
        assert_eq!(closed, SlotCandidates::NotApplicable);
    }

    #[test]
    fn archetype_toggle_merges_into_class_list() {
        let catalog = FeatCatalog::new(vec![
            FeatRecord::new("f2", "Double Slice", 2).with_traits(["Fighter"]),
            FeatRecord::new("a2", "Wizard Dedication", 2).with_traits(["Archetype"]),
        ]);
        let options = SlotQueryOptions {
            include_archetype_feats: true,
            ..SlotQueryOptions::default()
        };
        let candidates =
            candidates_for_slot(&catalog, &fighter(1), FeatSlot::Class, 2, &options).expect("query");
        assert_eq!(names(&candidates), vec!["Double Slice", "Wizard Dedication"]);
    }

    #[test]
    fn missing_class_is_reported() {
        let catalog = FeatCatalog::new(vec![]);
        let character = CharacterContext::new("actor-4", "Classless", 1);
        assert_eq!(
            candidates_for_slot(
                &catalog,
                &character,
                FeatSlot::General,
                3,
                &SlotQueryOptions::default()
            ),
            Err(DomainError::MissingClass)
        );
    }
}
