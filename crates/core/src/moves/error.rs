//! Move state transition errors.

use thiserror::Error;

use super::types::MoveState;

/// Errors raised by move lifecycle transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    /// The requested transition is not allowed from the current state.
    #[error("Invalid move transition from {from} to {to}")]
    InvalidTransition {
        /// The state the move is currently in.
        from: MoveState,
        /// The state the transition targeted.
        to: MoveState,
    },
}

impl MoveError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_MOVE_TRANSITION",
        }
    }
}

/// Validates the `Draft → Posted` transition.
pub fn validate_post(current: MoveState) -> Result<(), MoveError> {
    match current {
        MoveState::Draft => Ok(()),
        MoveState::Posted => Err(MoveError::InvalidTransition {
            from: current,
            to: MoveState::Posted,
        }),
    }
}

/// Validates the `Posted → Draft` transition.
pub fn validate_reset_to_draft(current: MoveState) -> Result<(), MoveError> {
    match current {
        MoveState::Posted => Ok(()),
        MoveState::Draft => Err(MoveError::InvalidTransition {
            from: current,
            to: MoveState::Draft,
        }),
    }
}
