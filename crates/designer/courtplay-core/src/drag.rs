//! Pointer/touch drag translation.
//!
//! Each active gesture keeps the last pointer sample for its token. A move
//! emits `token + (pointer - anchor)` and re-anchors on the new sample, so the
//! token tracks the pointer 1:1 wherever on the token the gesture started.
//! Gestures on different tokens have independent anchors.

use hashbrown::HashMap;

use crate::geometry::Point;

#[derive(Debug, Default)]
pub struct DragTracker {
    anchors: HashMap<String, Point>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) a gesture on `token_id`. Emits nothing.
    pub fn begin(&mut self, token_id: &str, pointer: Point) {
        self.anchors.insert(token_id.to_string(), pointer);
    }

    /// Feed a pointer sample. Returns the requested absolute token position,
    /// or `None` when no gesture is active for this token.
    pub fn drag_to(&mut self, token_id: &str, pointer: Point, token_pos: Point) -> Option<Point> {
        let anchor = self.anchors.get_mut(token_id)?;
        let delta = pointer - *anchor;
        *anchor = pointer;
        Some(token_pos + delta)
    }

    /// Finish the gesture. Returns whether one was active.
    pub fn end(&mut self, token_id: &str) -> bool {
        self.anchors.remove(token_id).is_some()
    }

    #[inline]
    pub fn is_dragging(&self, token_id: &str) -> bool {
        self.anchors.contains_key(token_id)
    }

    #[inline]
    pub fn active_count(&self) -> usize {
        self.anchors.len()
    }

    pub fn cancel_all(&mut self) {
        self.anchors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_emits_nothing_and_moves_follow_deltas() {
        let mut drag = DragTracker::new();
        drag.begin("A1", Point::new(500.0, 500.0));
        assert!(drag.is_dragging("A1"));

        let p = drag
            .drag_to("A1", Point::new(510.0, 495.0), Point::new(100.0, 100.0))
            .unwrap();
        assert_eq!(p, Point::new(110.0, 95.0));

        // Delta is relative to the previous sample, not the gesture start.
        let p = drag.drag_to("A1", Point::new(512.0, 495.0), p).unwrap();
        assert_eq!(p, Point::new(112.0, 95.0));
    }

    #[test]
    fn no_updates_after_end() {
        let mut drag = DragTracker::new();
        drag.begin("A1", Point::new(0.0, 0.0));
        assert!(drag.end("A1"));
        assert!(!drag.end("A1"));
        assert_eq!(
            drag.drag_to("A1", Point::new(5.0, 5.0), Point::new(1.0, 1.0)),
            None
        );
    }

    #[test]
    fn interleaved_gestures_keep_separate_anchors() {
        let mut drag = DragTracker::new();
        drag.begin("A1", Point::new(0.0, 0.0));
        drag.begin("B1", Point::new(1000.0, 1000.0));

        let a = drag
            .drag_to("A1", Point::new(5.0, 0.0), Point::new(50.0, 50.0))
            .unwrap();
        let b = drag
            .drag_to("B1", Point::new(990.0, 1000.0), Point::new(300.0, 300.0))
            .unwrap();
        let a2 = drag.drag_to("A1", Point::new(10.0, 0.0), a).unwrap();

        assert_eq!(a, Point::new(55.0, 50.0));
        assert_eq!(b, Point::new(290.0, 300.0));
        assert_eq!(a2, Point::new(60.0, 50.0));
        assert_eq!(drag.active_count(), 2);
    }
}
