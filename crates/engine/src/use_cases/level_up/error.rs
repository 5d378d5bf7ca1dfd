//! Level-up operation errors.

use levelwiz_domain::{DomainError, FeatSlot};

use crate::infrastructure::ports::HostError;

/// Errors that can occur while running the level-up wizard.
#[derive(Debug, thiserror::Error)]
pub enum LevelUpError {
    /// A commit invariant failed; shown to the user.
    #[error("Invalid level-up selection: {0}")]
    Validation(DomainError),

    #[error("Slot {0} grants no feat at this level")]
    SlotNotApplicable(FeatSlot),

    #[error("Skill increase not available: {0}")]
    SkillNotOffered(String),

    #[error("The level-up wizard was closed")]
    WizardClosed,

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Host error: {0}")]
    Host(#[from] HostError),
}

impl LevelUpError {
    /// Errors the user must see, as opposed to ones only logged.
    pub fn is_user_visible(&self) -> bool {
        match self {
            Self::Validation(_) => true,
            Self::Domain(e) => e.blocks_wizard(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_and_blocking_errors_are_user_visible() {
        let boost = LevelUpError::Validation(DomainError::BoostCount {
            expected: 4,
            actual: 3,
        });
        assert!(boost.is_user_visible());
        assert_eq!(
            boost.to_string(),
            "Invalid level-up selection: Expected 4 ability boosts, got 3"
        );

        assert!(LevelUpError::from(DomainError::MissingClass).is_user_visible());
        assert!(!LevelUpError::from(HostError::not_found("Actor", "a1")).is_user_visible());
    }
}
