//! Recorded data: frames and named plays.
//!
//! The JSON shape matches the web app's saved data:
//! `{ id, name, date, frames: [{ timestamp, tokens: [...] }] }`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DesignerError;
use crate::token::Token;

/// A timestamped snapshot of every token. Snapshots are owned copies; later
/// changes to the live tokens never reach a stored frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Milliseconds since recording started.
    #[serde(rename = "timestamp")]
    pub timestamp_ms: u64,
    pub tokens: Vec<Token>,
}

impl Frame {
    pub fn new(timestamp_ms: u64, tokens: &[Token]) -> Self {
        Self {
            timestamp_ms,
            tokens: tokens.to_vec(),
        }
    }
}

/// A saved, named recording. Never edited in place once created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Play {
    pub id: String,
    pub name: String,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
    pub frames: Vec<Frame>,
}

impl Play {
    /// Timestamp of the last frame (0 for an empty play).
    pub fn duration_ms(&self) -> u64 {
        self.frames.last().map(|f| f.timestamp_ms).unwrap_or(0)
    }

    /// Check a non-empty name and well-formed frames.
    pub fn validate_basic(&self) -> Result<(), DesignerError> {
        if self.name.trim().is_empty() {
            return Err(DesignerError::EmptyName);
        }
        validate_frames(&self.frames)
    }
}

/// Frames must be non-empty, chronological, and each hold exactly one ball.
pub fn validate_frames(frames: &[Frame]) -> Result<(), DesignerError> {
    if frames.is_empty() {
        return Err(DesignerError::NoFrames);
    }
    let mut previous = 0u64;
    for (index, frame) in frames.iter().enumerate() {
        if frame.timestamp_ms < previous {
            return Err(DesignerError::TimestampOrder {
                index,
                previous,
                timestamp: frame.timestamp_ms,
            });
        }
        previous = frame.timestamp_ms;

        let balls = frame.tokens.iter().filter(|t| t.is_ball()).count();
        if balls != 1 {
            return Err(DesignerError::BallCount { index, balls });
        }
    }
    Ok(())
}
