//! Error types for the designer core.
//!
//! Refused state transitions (play with no frames, moves during playback) are
//! not errors; the engine reports them as `false` returns. These types cover
//! invalid data and invalid user input.

/// Errors raised by configuration, play validation and the play library.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum DesignerError {
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    /// Save refused: the play name is empty or whitespace.
    #[error("play name must not be empty")]
    EmptyName,

    /// Save refused: nothing has been recorded.
    #[error("play has no frames")]
    NoFrames,

    #[error("frame {index} goes back in time ({timestamp} ms after {previous} ms)")]
    TimestampOrder {
        index: usize,
        previous: u64,
        timestamp: u64,
    },

    #[error("frame {index} has {balls} balls, expected exactly one")]
    BallCount { index: usize, balls: usize },

    /// Every id above the largest stored one is taken.
    #[error("no play ids left")]
    IdsExhausted,

    #[error("play not found: {id}")]
    PlayNotFound { id: String },

    #[error(transparent)]
    Store(#[from] crate::store::StoreError),
}
