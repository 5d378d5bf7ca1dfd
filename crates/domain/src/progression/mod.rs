//! Level-up transactions: accumulated choices, requirements and the commit.

mod plan;
mod selection;
mod transaction;

pub use plan::{LevelUpPlan, Requirement};
pub use selection::ProgressionSelection;
pub use transaction::{
    AbortReason, CharacterPatch, CommitOrder, GrantedFeat, LevelUpState, LevelUpTransaction,
    PendingFeat,
};
