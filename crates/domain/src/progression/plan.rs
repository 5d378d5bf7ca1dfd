//! What a level-up must contain before it can be committed.

use std::collections::BTreeSet;

use crate::entities::CharacterContext;
use crate::ids::ActorId;
use crate::value_objects::FeatSlot;

/// Requirements fixed when the wizard opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUpPlan {
    pub actor_id: ActorId,
    pub actor_name: String,
    pub current_level: u8,
    pub target_level: u8,
    /// The level field was already changed; commit leaves it alone
    pub retroactive: bool,
    /// Slots that grant a feat at the target level and have candidates
    pub required_slots: BTreeSet<FeatSlot>,
    pub skill_increase_required: bool,
    /// Boosts to choose; zero when the boost gate is closed
    pub required_boosts: usize,
}

impl LevelUpPlan {
    pub fn new(character: &CharacterContext, retroactive: bool) -> Self {
        Self {
            actor_id: character.actor_id.clone(),
            actor_name: character.name.clone(),
            current_level: character.current_level,
            target_level: character.target_level(retroactive),
            retroactive,
            required_slots: BTreeSet::new(),
            skill_increase_required: false,
            required_boosts: 0,
        }
    }

    pub fn with_required_slot(mut self, slot: FeatSlot) -> Self {
        self.required_slots.insert(slot);
        self
    }

    pub fn with_skill_increase_required(mut self, required: bool) -> Self {
        self.skill_increase_required = required;
        self
    }

    pub fn with_required_boosts(mut self, count: usize) -> Self {
        self.required_boosts = count;
        self
    }
}

/// A requirement the current selection does not meet yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Feat(FeatSlot),
    SkillIncrease,
    AbilityBoosts { expected: usize, actual: usize },
}

impl std::fmt::Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Requirement::Feat(slot) => write!(f, "{slot}"),
            Requirement::SkillIncrease => f.write_str("skill increase"),
            Requirement::AbilityBoosts { expected, actual } => {
                write!(f, "ability boosts ({actual}/{expected})")
            }
        }
    }
}
