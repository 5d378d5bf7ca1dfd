extern crate self as levelwiz_domain;

pub mod catalog;
pub mod common;
pub mod entities;
pub mod error;
pub mod game_systems;
pub mod ids;
pub mod progression;
pub mod selection;
pub mod value_objects;

// Re-export all entities (explicit list in entities/mod.rs)
pub use entities::{
    AbilityEntry, ActionCost, CharacterContext, ClassFeatureRef, ClassInfo, ClassNames,
    FeatRecord, MaxTakable, Rarity, Skill, SkillEntry,
};

pub use error::DomainError;

// Re-export ID types
pub use ids::{ActorId, ItemRef, UserId};

// Re-export value objects
pub use value_objects::{AbilityKey, FeatSlot, ProficiencyRank, SlotQueryKind};

// Re-export Pathfinder 2e rule tables and helpers
pub use game_systems::pf2e::{
    detect_partial_boosts, is_ability_boost_level, is_ancestry_paragon_level,
    is_archetype_feat_level, is_new_spell_rank_level, max_skill_proficiency_for_level,
    skill_increase_options, AbilityBoostOption, BoostRule, BuildAttributes, LevelGate,
    SkillIncreaseOption, Vocabulary,
};

pub use catalog::{
    build_query, candidates_for_slot, slot_is_active, FeatCatalog, SlotCandidates,
    SlotQueryOptions, TraitQuery,
};

pub use selection::{
    sort_feats, FeatSelected, SelectionFilterState, SelectionSession, SortMethod, SortOrder,
    SortPreset,
};

pub use progression::{
    AbortReason, CharacterPatch, CommitOrder, GrantedFeat, LevelUpPlan, LevelUpState,
    LevelUpTransaction, PendingFeat, ProgressionSelection, Requirement,
};
