use serde::{Deserialize, Serialize};

/// Designer mode. Exactly one holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesignerState {
    /// Free editing, nothing captured
    #[default]
    Idle,
    /// Every accepted move is appended as a frame
    Recording,
    /// The engine replays frames and owns token positions
    Playing,
}

impl DesignerState {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Playing => "playing",
        }
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[inline]
    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording)
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Token positions may be edited by the user (Idle or Recording).
    #[inline]
    pub fn accepts_moves(&self) -> bool {
        !self.is_playing()
    }
}

/// Result of one rendering-loop tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickStatus {
    /// Not playing; the host should not be ticking.
    Idle,
    /// A frame was applied; schedule another tick.
    Continue,
    /// Playback ran past the last frame and stopped; deregister the callback.
    Finished,
}

impl TickStatus {
    #[inline]
    pub fn should_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }
}
