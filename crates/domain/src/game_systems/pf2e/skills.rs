//! Skill increase rules.

use crate::entities::{CharacterContext, ClassInfo};
use crate::value_objects::ProficiencyRank;

/// Highest rank a skill may be raised to at `level`.
pub fn max_skill_proficiency_for_level(level: u8) -> ProficiencyRank {
    if level >= 15 {
        ProficiencyRank::Legendary
    } else if level >= 7 {
        ProficiencyRank::Master
    } else {
        ProficiencyRank::Expert
    }
}

/// A skill eligible for the skill-increase slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillIncreaseOption {
    pub slug: String,
    pub label: String,
    pub rank: ProficiencyRank,
}

/// Skills that can take a skill increase at `target_level`.
///
/// Empty when the class grants no increase at that level; otherwise every
/// skill still below the level's cap, in slug order.
pub fn skill_increase_options(
    character: &CharacterContext,
    class: &ClassInfo,
    target_level: u8,
) -> Vec<SkillIncreaseOption> {
    if !class.skill_increase_levels.contains(&target_level) {
        return Vec::new();
    }
    let cap = max_skill_proficiency_for_level(target_level);
    character
        .skills
        .iter()
        .filter(|(_, skill)| skill.rank < cap)
        .map(|(slug, skill)| SkillIncreaseOption {
            slug: slug.clone(),
            label: skill.label.clone(),
            rank: skill.rank,
        })
        .collect()
}
