//! Domain error types.

use thiserror::Error;

/// Business rule violations raised by the domain layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("Task is completed and can no longer be changed")]
    TaskLocked,

    #[error("Cannot move status from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("A completion description is required to complete a task")]
    CompletionDescriptionRequired,

    #[error("Participation must total exactly 100%, got {0}%")]
    ParticipationTotal(i32),

    #[error("{0} is not a member of this team")]
    NotTeamMember(String),

    #[error("Requested time is not available")]
    SlotUnavailable,

    #[error("{0}")]
    Forbidden(String),
}

impl DomainError {
    /// True for violations caused by the current state of the resource
    /// rather than by malformed input.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            DomainError::TaskLocked
                | DomainError::InvalidTransition { .. }
                | DomainError::SlotUnavailable
        )
    }
}
