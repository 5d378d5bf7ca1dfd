//! Error types for host port operations.

/// Host collaborator failures with context for debugging.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum HostError {
    /// Document not found - includes the kind and reference for actionable messages.
    #[error("{kind} not found: {reference}")]
    NotFound {
        kind: &'static str,
        reference: String,
    },

    /// The host could not serve the request (e.g. compendium not loaded).
    #[error("Host unavailable in {operation}: {message}")]
    Unavailable {
        operation: &'static str,
        message: String,
    },

    /// The host refused a write.
    #[error("Host rejected {operation}: {message}")]
    Rejected {
        operation: &'static str,
        message: String,
    },

    /// Host data could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A setting name the wizard does not know.
    #[error("Unknown setting: {0}")]
    UnknownSetting(String),
}

impl HostError {
    pub fn not_found(kind: &'static str, reference: impl ToString) -> Self {
        Self::NotFound {
            kind,
            reference: reference.to_string(),
        }
    }

    pub fn unavailable(operation: &'static str, message: impl ToString) -> Self {
        Self::Unavailable {
            operation,
            message: message.to_string(),
        }
    }

    pub fn rejected(operation: &'static str, message: impl ToString) -> Self {
        Self::Rejected {
            operation,
            message: message.to_string(),
        }
    }

    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
