//! Share gateway: publish a play to a remote JSON blob store and fetch it back.
//!
//! The transport is abstracted as a [`BlobStore`]; this module owns the record
//! schema (tagged `"handball-play"`), credential checks and payload validation.

use chrono::{DateTime, Utc};
use hashbrown::HashMap;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::config::ShareConfig;
use crate::data::{validate_frames, Frame, Play};

/// Schema tag every shared record carries under `type`.
pub const SHARE_SCHEMA_TAG: &str = "handball-play";
pub const SHARE_SCHEMA_VERSION: &str = "1.0";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ShareError {
    /// No credential configured; uploads are impossible.
    #[error("sharing needs an API key for the blob store (set COURTPLAY_SHARE_API_KEY)")]
    MissingConfiguration,

    #[error("the blob store rejected the credential")]
    Unauthorized,

    #[error("shared play not found: {id}")]
    NotFound { id: String },

    #[error("shared record is not a valid play: {reason}")]
    InvalidPayload { reason: String },

    #[error("transport error: {reason}")]
    Transport { reason: String },

    #[error("invalid url: {reason}")]
    InvalidUrl { reason: String },
}

impl From<url::ParseError> for ShareError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl {
            reason: err.to_string(),
        }
    }
}

/// Remote record layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SharedPlay {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
    pub name: String,
    #[serde(rename = "date")]
    pub created_at: DateTime<Utc>,
    pub frames: Vec<Frame>,
    #[serde(rename = "sharedAt")]
    pub shared_at: DateTime<Utc>,
}

impl SharedPlay {
    pub fn from_play(play: &Play, shared_at: DateTime<Utc>) -> Self {
        Self {
            kind: SHARE_SCHEMA_TAG.to_string(),
            version: SHARE_SCHEMA_VERSION.to_string(),
            name: play.name.clone(),
            created_at: play.created_at,
            frames: play.frames.clone(),
            shared_at,
        }
    }

    /// Decode a fetched record: the schema tag is checked before anything else.
    pub fn from_record(record: serde_json::Value) -> Result<Self, ShareError> {
        let tag = record.get("type").and_then(|t| t.as_str());
        if tag != Some(SHARE_SCHEMA_TAG) {
            return Err(ShareError::InvalidPayload {
                reason: format!("expected type '{SHARE_SCHEMA_TAG}', got {tag:?}"),
            });
        }
        let shared: SharedPlay =
            serde_json::from_value(record).map_err(|e| ShareError::InvalidPayload {
                reason: e.to_string(),
            })?;
        validate_frames(&shared.frames).map_err(|e| ShareError::InvalidPayload {
            reason: e.to_string(),
        })?;
        Ok(shared)
    }

    /// Turn into a local play under `id`.
    pub fn into_play(self, id: impl Into<String>) -> Play {
        Play {
            id: id.into(),
            name: self.name,
            created_at: self.created_at,
            frames: self.frames,
        }
    }
}

/// Opaque remote key-value blob store.
pub trait BlobStore {
    /// Store a new record, returning its id.
    fn create(&mut self, credential: &str, record: serde_json::Value) -> Result<String, ShareError>;

    /// Latest version of a record.
    fn fetch(&self, id: &str) -> Result<serde_json::Value, ShareError>;
}

/// In-process blob store keyed by uuid.
#[derive(Debug, Default, Clone)]
pub struct MemoryBlobStore {
    records: HashMap<String, serde_json::Value>,
    required_credential: Option<String>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only accept writes carrying this credential.
    pub fn with_credential(credential: impl Into<String>) -> Self {
        Self {
            records: HashMap::new(),
            required_credential: Some(credential.into()),
        }
    }

    /// Store a raw record directly, bypassing the gateway.
    pub fn insert_raw(&mut self, id: impl Into<String>, record: serde_json::Value) {
        self.records.insert(id.into(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl BlobStore for MemoryBlobStore {
    fn create(&mut self, credential: &str, record: serde_json::Value) -> Result<String, ShareError> {
        if let Some(required) = &self.required_credential {
            if required != credential {
                return Err(ShareError::Unauthorized);
            }
        }
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.records.insert(id.clone(), record);
        Ok(id)
    }

    fn fetch(&self, id: &str) -> Result<serde_json::Value, ShareError> {
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| ShareError::NotFound { id: id.to_string() })
    }
}

/// Upload/download contract used by hosts.
pub trait ShareGateway {
    fn upload(&mut self, play: &Play) -> Result<String, ShareError>;
    fn download(&self, share_id: &str) -> Result<SharedPlay, ShareError>;
}

#[derive(Debug)]
pub struct BlobShareGateway<B: BlobStore, C: Clock> {
    store: B,
    config: ShareConfig,
    clock: C,
}

impl<B: BlobStore, C: Clock> BlobShareGateway<B, C> {
    pub fn new(store: B, config: ShareConfig, clock: C) -> Self {
        Self {
            store,
            config,
            clock,
        }
    }

    pub fn store(&self) -> &B {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut B {
        &mut self.store
    }

    fn credential(&self) -> Result<&str, ShareError> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ShareError::MissingConfiguration)
    }
}

impl<B: BlobStore, C: Clock> ShareGateway for BlobShareGateway<B, C> {
    fn upload(&mut self, play: &Play) -> Result<String, ShareError> {
        let credential = self.credential()?.to_string();
        let record = SharedPlay::from_play(play, self.clock.now_utc());
        let value = serde_json::to_value(&record).map_err(|e| ShareError::InvalidPayload {
            reason: e.to_string(),
        })?;
        self.store.create(&credential, value).map_err(|e| {
            warn!("uploading play '{}' failed: {e}", play.name);
            e
        })
    }

    fn download(&self, share_id: &str) -> Result<SharedPlay, ShareError> {
        let record = self.store.fetch(share_id).map_err(|e| {
            warn!("fetching shared play {share_id} failed: {e}");
            e
        })?;
        SharedPlay::from_record(record)
    }
}
