//! Saved play collection.
//!
//! An insertion-ordered map from play id to play, persisted as a whole through
//! a [`PlayStore`]. Mutations build the next collection, write it, and only then
//! swap it in, so a failed write leaves both memory and storage untouched.

use indexmap::IndexMap;
use log::{debug, warn};

use crate::clock::Clock;
use crate::data::{validate_frames, Frame, Play};
use crate::error::DesignerError;
use crate::ids::PlayIdAllocator;
use crate::store::PlayStore;

#[derive(Debug)]
pub struct PlayLibrary<S: PlayStore, C: Clock> {
    store: S,
    clock: C,
    ids: PlayIdAllocator,
    plays: IndexMap<String, Play>,
}

impl<S: PlayStore, C: Clock> PlayLibrary<S, C> {
    /// Load the stored collection. Duplicate ids keep their first position and last value.
    pub fn open(store: S, clock: C) -> Self {
        let mut ids = PlayIdAllocator::new();
        let mut plays = IndexMap::new();
        for play in store.load() {
            ids.observe(&play.id);
            plays.insert(play.id.clone(), play);
        }
        debug!("opened play library with {} plays", plays.len());
        Self {
            store,
            clock,
            ids,
            plays,
        }
    }

    /// Save the given frames under a new, time-derived id.
    ///
    /// Refuses empty names and empty or malformed frame lists without writing anything.
    pub fn save(&mut self, name: &str, frames: &[Frame]) -> Result<Play, DesignerError> {
        let name = name.trim();
        if name.is_empty() {
            warn!("refusing to save a play without a name");
            return Err(DesignerError::EmptyName);
        }
        validate_frames(frames)?;

        let play = Play {
            id: self.next_id()?,
            name: name.to_string(),
            created_at: self.clock.now_utc(),
            frames: frames.to_vec(),
        };
        self.insert(play.clone())?;
        debug!("saved play '{}' as {}", play.name, play.id);
        Ok(play)
    }

    /// Add a play obtained elsewhere (e.g. a downloaded share) under a fresh id.
    pub fn import(&mut self, mut play: Play) -> Result<Play, DesignerError> {
        play.validate_basic()?;
        play.id = self.next_id()?;
        self.insert(play.clone())?;
        Ok(play)
    }

    fn next_id(&mut self) -> Result<String, DesignerError> {
        self.ids.alloc(self.clock.now_ms()).ok_or_else(|| {
            warn!("play id space exhausted");
            DesignerError::IdsExhausted
        })
    }

    fn insert(&mut self, play: Play) -> Result<(), DesignerError> {
        let mut next = self.plays.clone();
        next.insert(play.id.clone(), play);
        self.commit(next)
    }

    /// Remove a play. Returns `false` when the id is unknown (nothing is written).
    pub fn delete(&mut self, id: &str) -> Result<bool, DesignerError> {
        if !self.plays.contains_key(id) {
            return Ok(false);
        }
        let mut next = self.plays.clone();
        next.shift_remove(id);
        self.commit(next)?;
        debug!("deleted play {id}");
        Ok(true)
    }

    fn commit(&mut self, next: IndexMap<String, Play>) -> Result<(), DesignerError> {
        let list: Vec<Play> = next.values().cloned().collect();
        self.store.save(&list)?;
        self.plays = next;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Play> {
        self.plays.get(id)
    }

    pub fn require(&self, id: &str) -> Result<&Play, DesignerError> {
        self.get(id).ok_or_else(|| DesignerError::PlayNotFound { id: id.to_string() })
    }

    /// Plays in display order (oldest save first).
    pub fn iter(&self) -> impl Iterator<Item = &Play> {
        self.plays.values()
    }

    pub fn to_vec(&self) -> Vec<Play> {
        self.plays.values().cloned().collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.plays.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
