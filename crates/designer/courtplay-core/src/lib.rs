//! Courtplay core (host-agnostic)
//!
//! Play designer for a handball half-court: draggable player and ball tokens,
//! recording of drag interaction as timestamped frames, step-function playback,
//! ball possession rules, a saved play library and share links.
//!
//! Hosts (the wasm adapter, tests) feed pointer samples and rendering-loop ticks
//! into a [`Designer`] and read back tokens, state and [`DesignerEvent`]s.

pub mod clock;
pub mod color;
pub mod config;
pub mod data;
pub mod drag;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod library;
pub mod link;
pub mod outputs;
pub mod possession;
pub mod sampling;
pub mod share;
pub mod state;
pub mod store;
pub mod token;

// Re-exports for hosts
pub use clock::{Clock, ManualClock, SystemClock};
pub use color::{ColorError, Rgb};
pub use config::{Config, CourtConfig, ShareConfig};
pub use data::{Frame, Play};
pub use drag::DragTracker;
pub use engine::Designer;
pub use error::DesignerError;
pub use geometry::{Bounds, Point};
pub use library::PlayLibrary;
pub use link::{clear_shared_play_param, is_shared_play_url, share_url, shared_play_id};
pub use outputs::{DesignerEvent, Outputs};
pub use possession::{PossessionRules, PossessionUpdate};
pub use sampling::frame_at;
pub use share::{BlobShareGateway, BlobStore, MemoryBlobStore, ShareError, ShareGateway, SharedPlay};
pub use state::{DesignerState, TickStatus};
pub use store::{
    FileBackend, KeyValueBackend, KeyValuePlayStore, MemoryBackend, PlayStore, StoreError,
};
pub use token::{default_layout, Token, TokenKind};
