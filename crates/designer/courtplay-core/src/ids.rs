//! Time-derived play identifiers.

/// Hands out play ids from clock readings, bumping past the previous id so two
/// saves within the same millisecond still get distinct, increasing ids.
#[derive(Default, Debug)]
pub struct PlayIdAllocator {
    last: Option<u64>,
}

impl PlayIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from existing ids so new ones sort after them. Non-numeric ids are ignored.
    pub fn observe(&mut self, id: &str) {
        if let Ok(n) = id.parse::<u64>() {
            self.last = Some(self.last.map_or(n, |last| last.max(n)));
        }
    }

    /// Next id, or `None` once the id space above the last id is used up.
    #[inline]
    pub fn alloc(&mut self, now_ms: u64) -> Option<String> {
        let next = match self.last {
            Some(last) if now_ms <= last => last.checked_add(1)?,
            _ => now_ms,
        };
        self.last = Some(next);
        Some(next.to_string())
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
