//! Unified error types for the domain layer
//!
//! Provides a common error type for rule evaluation, slot resolution and the
//! level-up transaction, so adapters never need to fall back to strings.

use thiserror::Error;

use crate::value_objects::FeatSlot;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// A slot key coming from the host did not name a known slot type
    #[error("Unknown slot type: {0}")]
    UnknownSlotType(String),

    /// The character has no class document, so no level-up can be planned
    #[error("Character has no class")]
    MissingClass,

    /// Dual class names that were translated cannot be matched against feat traits
    #[error("Translated dual class cannot be matched against feat traits: {0}")]
    TranslatedDualClass(String),

    /// The slot query had nothing to search for (e.g., missing ancestry)
    #[error("No trait query could be built for slot {0}")]
    UnresolvedQuery(FeatSlot),

    /// A picker selection named a feat that is not among its candidates
    #[error("Feat not among candidates: {0}")]
    CandidateNotFound(String),

    /// The ability boost selection does not have the required size
    #[error("Expected {expected} ability boosts, got {actual}")]
    BoostCount { expected: usize, actual: usize },

    /// State transition not allowed
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// Use this when a level-up invariant is not satisfied:
    /// - Required feat slots are still empty
    /// - The skill increase names a skill the character does not have
    ///
    /// # Example
    /// ```ignore
    /// if !transaction.is_ready() {
    ///     return Err(DomainError::validation("Selections are incomplete"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid state transition error
    pub fn invalid_state_transition(msg: impl Into<String>) -> Self {
        Self::InvalidStateTransition(msg.into())
    }

    /// Errors that must stop the wizard from opening at all.
    pub fn blocks_wizard(&self) -> bool {
        matches!(self, Self::MissingClass | Self::TranslatedDualClass(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("selections are incomplete");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: selections are incomplete");
    }

    #[test]
    fn test_boost_count_error() {
        let err = DomainError::BoostCount {
            expected: 4,
            actual: 3,
        };
        assert_eq!(err.to_string(), "Expected 4 ability boosts, got 3");
        assert!(!err.blocks_wizard());
    }

    #[test]
    fn test_unresolved_query_names_slot() {
        let err = DomainError::UnresolvedQuery(FeatSlot::Ancestry);
        assert!(err.to_string().contains("ancestryFeats"));
    }

    #[test]
    fn test_missing_class_blocks_wizard() {
        assert!(DomainError::MissingClass.blocks_wizard());
        assert!(DomainError::TranslatedDualClass("Kämpfer-Magier".into()).blocks_wizard());
        assert!(!DomainError::UnknownSlotType("spellFeats".into()).blocks_wizard());
    }
}
