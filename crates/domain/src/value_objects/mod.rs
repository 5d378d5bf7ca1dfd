//! Value objects: small, immutable, self-validating types.

mod ability;
mod proficiency;
mod slot;

pub use ability::AbilityKey;
pub use proficiency::ProficiencyRank;
pub use slot::{FeatSlot, SlotQueryKind};
