//! Pathfinder 2nd Edition level-up rules.
//!
//! Static level gates, skill proficiency caps, attribute boost rules and the
//! vocabulary used to read prerequisite text.

mod boosts;
mod level_gates;
mod skills;
mod vocabulary;

pub use boosts::{detect_partial_boosts, AbilityBoostOption, BoostEntry, BoostRule, BuildAttributes};
pub use level_gates::{
    is_ability_boost_level, is_ancestry_paragon_level, is_archetype_feat_level,
    is_new_spell_rank_level, LevelGate, ABILITY_BOOST_LEVELS, ANCESTRY_PARAGON_FEAT_LEVELS,
    FREE_ARCHETYPE_FEAT_LEVELS, NEW_SPELL_RANK_LEVELS,
};
pub use skills::{max_skill_proficiency_for_level, skill_increase_options, SkillIncreaseOption};
pub use vocabulary::Vocabulary;
