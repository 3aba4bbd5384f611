//! Frame selection for playback.
//!
//! Playback is a step function: at any elapsed time the displayed pose is the
//! most recent frame not in the future. There is no interpolation between frames.

use crate::data::Frame;

/// Index of the last frame with `timestamp_ms <= elapsed_ms`.
///
/// Frames sharing a timestamp resolve to the later one. When every frame lies in
/// the future the first frame is returned, so a non-empty buffer always yields a pose.
/// Expects chronological frames (see `data::validate_frames`).
pub fn frame_index_at(frames: &[Frame], elapsed_ms: u64) -> Option<usize> {
    if frames.is_empty() {
        return None;
    }
    let past = frames.partition_point(|f| f.timestamp_ms <= elapsed_ms);
    Some(past.saturating_sub(1))
}

pub fn frame_at(frames: &[Frame], elapsed_ms: u64) -> Option<&Frame> {
    frame_index_at(frames, elapsed_ms).map(|i| &frames[i])
}

/// True once `elapsed_ms` is strictly past the last frame.
pub fn is_past_end(frames: &[Frame], elapsed_ms: u64) -> bool {
    frames.last().map_or(true, |f| elapsed_ms > f.timestamp_ms)
}
