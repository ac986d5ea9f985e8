use thiserror::Error;

use crate::entities::Side;

/// Crate-wide error kinds, following the teacher repo's per-subsystem
/// `thiserror` enums (`EventEngineError`, `TimeEngineError`) rather than one
/// monolithic error type. Only `InvalidLineup` and `FormationMissing` are
/// ever returned to a caller; the rest are handled internally by the engine.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("invalid lineup for {side:?}: {reason}")]
    InvalidLineup { side: Side, reason: String },

    #[error("no formation provided or derivable for {side:?}")]
    FormationMissing { side: Side },

    #[error("substitution refused for {side:?}: {reason}")]
    SubstitutionRefused { side: Side, reason: String },

    #[error("chain depth exceeded {max} for side {side:?}, truncating")]
    ChainOverflow { side: Side, max: usize },

    #[error("internal invariant violated at minute {minute}: {detail}")]
    InternalInvariantViolated { minute: u8, detail: String },
}

impl MatchError {
    pub fn invalid_lineup(side: Side, reason: impl Into<String>) -> Self {
        MatchError::InvalidLineup {
            side,
            reason: reason.into(),
        }
    }
}

/// `Result` alias used at the public engine boundary: only construction
/// can fail with a surfaced error.
pub type MatchResult<T> = Result<T, MatchError>;
