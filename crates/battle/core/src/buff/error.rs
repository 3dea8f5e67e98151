//! Buff construction and lifecycle errors.

use crate::error::{CombatError, ErrorClass};

/// Errors raised while building a buff or mutating a [`BuffList`](super::BuffList).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuffError {
    /// Another buff already occupies the slot; use `renew` to replace it.
    #[error("buff slot '{slot}' is already occupied")]
    SlotOccupied { slot: String },

    /// A finite buff was asked to consume a round it does not have.
    #[error("buff '{slot}' has no rounds left to consume")]
    RoundsUnderflow { slot: String },

    /// A required builder field was never set.
    #[error("buff is missing required field '{field}'")]
    MissingField { field: &'static str },

    /// A finite buff must start with at least one round.
    #[error("buff '{slot}' was created with zero rounds")]
    ZeroRounds { slot: String },

    /// A numeric parameter is out of its domain.
    #[error("buff '{slot}' has an invalid {parameter}")]
    InvalidParameter {
        slot: String,
        parameter: &'static str,
    },
}

impl CombatError for BuffError {
    fn class(&self) -> ErrorClass {
        use BuffError::*;
        match self {
            SlotOccupied { .. } | RoundsUnderflow { .. } => ErrorClass::Misuse,
            MissingField { .. } | ZeroRounds { .. } | InvalidParameter { .. } => {
                ErrorClass::Construction
            }
        }
    }

    fn error_code(&self) -> &'static str {
        use BuffError::*;
        match self {
            SlotOccupied { .. } => "BUFF_SLOT_OCCUPIED",
            RoundsUnderflow { .. } => "BUFF_ROUNDS_UNDERFLOW",
            MissingField { .. } => "BUFF_MISSING_FIELD",
            ZeroRounds { .. } => "BUFF_ZERO_ROUNDS",
            InvalidParameter { .. } => "BUFF_INVALID_PARAMETER",
        }
    }
}
