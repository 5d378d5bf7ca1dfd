//! Domain entities - records handed to the core by the host.

mod character;
mod feat;
mod skill;

pub use character::{
    AbilityEntry, CharacterContext, ClassFeatureRef, ClassInfo, ClassNames, SkillEntry,
};
pub use feat::{ActionCost, FeatRecord, MaxTakable, Rarity};
pub use skill::Skill;
