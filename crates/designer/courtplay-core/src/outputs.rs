//! Events emitted by the designer.
//!
//! The engine queues events as state changes; hosts drain them with
//! `Designer::take_outputs` after handling input or a tick and update their UI
//! (status bar, carrier badge, button states).

use serde::{Deserialize, Serialize};

/// Discrete signals emitted by the designer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DesignerEvent {
    RecordingStarted,
    RecordingStopped {
        frames: usize,
    },
    FrameRecorded {
        timestamp_ms: u64,
    },
    PlaybackStarted {
        frames: usize,
        duration_ms: u64,
    },
    /// Stopped by the user before the end.
    PlaybackStopped,
    /// Ran past the last frame.
    PlaybackEnded {
        elapsed_ms: u64,
    },
    CarrierChanged {
        from: Option<String>,
        to: Option<String>,
    },
    PositionsReset,
    PlayLoaded {
        frames: usize,
    },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub events: Vec<DesignerEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
    }

    #[inline]
    pub fn push_event(&mut self, event: DesignerEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
