//! Shared JSON fixtures for courtplay tests.
//!
//! `fixtures/manifest.json` maps a fixture name to a file under `fixtures/`.
//! Play fixtures use the web app's formats: the `handballPlays` collection and
//! shared `handball-play` records.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    plays: HashMap<String, String>,
}

impl Manifest {
    fn root() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
    }

    fn play_path(&self, name: &str) -> Result<PathBuf> {
        let rel = self
            .plays
            .get(name)
            .ok_or_else(|| anyhow!("no play fixture named '{name}' in manifest"))?;
        Ok(Self::root().join(rel))
    }
}

/// Saved collections and shared records.
pub mod plays {
    use super::*;

    /// Absolute path of a play fixture, for tests that seed on-disk storage.
    pub fn path(name: &str) -> Result<PathBuf> {
        MANIFEST.play_path(name)
    }

    /// Raw text, for tests that feed storage backends directly.
    pub fn json(name: &str) -> Result<String> {
        let path = path(name)?;
        std::fs::read_to_string(&path)
            .with_context(|| format!("reading play fixture {}", path.display()))
    }

    /// Decoded fixture.
    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let text = json(name)?;
        serde_json::from_str(&text).with_context(|| format!("decoding play fixture '{name}'"))
    }
}
