//! Configuration for courtplay-core.
//!
//! Every field has a serde default so hosts can pass a partial JSON object
//! (or nothing at all) and get the standard handball half-court.

use serde::{Deserialize, Serialize};

use crate::error::DesignerError;
use crate::geometry::{Bounds, Point};
use crate::token::TokenKind;

/// Environment variable holding the remote blob store credential.
pub const SHARE_API_KEY_ENV: &str = "COURTPLAY_SHARE_API_KEY";

/// Court dimensions in metres plus the pixels-per-metre scale.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourtConfig {
    /// 1 m = `scale` internal units.
    pub scale: f64,
    pub court_width: f64,
    /// Half court, so length equals width on the default layout.
    pub court_length: f64,
    /// Margin drawn around the playing area so the side lines stay visible.
    pub margin: f64,
}

impl Default for CourtConfig {
    fn default() -> Self {
        Self {
            scale: 30.0,
            court_width: 20.0,
            court_length: 20.0,
            margin: 0.5,
        }
    }
}

impl CourtConfig {
    /// Playable area in internal units (the court rectangle, margin excluded).
    pub fn bounds(&self) -> Bounds {
        Bounds {
            min_x: self.margin * self.scale,
            max_x: (self.margin + self.court_width) * self.scale,
            min_y: self.margin * self.scale,
            max_y: (self.margin + self.court_length) * self.scale,
        }
    }

    /// Offset applied to layout coordinates expressed relative to the court corner.
    pub fn offset(&self) -> Point {
        Point::new(self.margin * self.scale, self.margin * self.scale)
    }

    pub fn total_width(&self) -> f64 {
        (self.court_width + self.margin * 2.0) * self.scale
    }

    pub fn total_height(&self) -> f64 {
        (self.court_length + self.margin * 2.0) * self.scale
    }

    /// Convert a court position in metres into internal units.
    #[inline]
    pub fn to_internal(&self, metres_x: f64, metres_y: f64) -> Point {
        Point::new(metres_x * self.scale, metres_y * self.scale) + self.offset()
    }
}

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub court: CourtConfig,
    /// Clamp radius for player tokens.
    pub player_radius: f64,
    /// Clamp radius for the ball. The source layout uses one radius for both kinds.
    pub ball_radius: f64,
    /// A player closer than this to the ball takes possession.
    pub possession_radius: f64,
    /// Where a carried ball sits relative to its carrier.
    pub carry_offset: Point,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            court: CourtConfig::default(),
            player_radius: 15.0,
            ball_radius: 15.0,
            possession_radius: 30.0,
            carry_offset: Point::new(10.0, 10.0),
        }
    }
}

impl Config {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json_str(s: &str) -> Result<Self, DesignerError> {
        let cfg: Config = serde_json::from_str(s).map_err(|e| DesignerError::InvalidConfig {
            reason: format!("parse error: {e}"),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), DesignerError> {
        let court = &self.court;
        if !(court.scale.is_finite() && court.scale > 0.0) {
            return Err(DesignerError::InvalidConfig {
                reason: format!("court.scale must be > 0, got {}", court.scale),
            });
        }
        for (name, v) in [
            ("court.court_width", court.court_width),
            ("court.court_length", court.court_length),
            ("court.margin", court.margin),
            ("player_radius", self.player_radius),
            ("ball_radius", self.ball_radius),
            ("possession_radius", self.possession_radius),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(DesignerError::InvalidConfig {
                    reason: format!("{name} must be finite and >= 0, got {v}"),
                });
            }
        }
        if !(self.carry_offset.x.is_finite() && self.carry_offset.y.is_finite()) {
            return Err(DesignerError::InvalidConfig {
                reason: "carry_offset must be finite".into(),
            });
        }
        Ok(())
    }

    /// Clamp radius for a token kind.
    #[inline]
    pub fn radius_for(&self, kind: TokenKind) -> f64 {
        match kind {
            TokenKind::Player => self.player_radius,
            TokenKind::Ball => self.ball_radius,
        }
    }
}

/// Share gateway settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Credential for the remote blob store. Uploads are refused without it.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl ShareConfig {
    /// Read the credential from `COURTPLAY_SHARE_API_KEY`; an empty value counts as absent.
    pub fn from_env() -> Self {
        let api_key = std::env::var(SHARE_API_KEY_ENV)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        Self { api_key }
    }

    pub fn with_api_key(key: impl Into<String>) -> Self {
        Self {
            api_key: Some(key.into()),
        }
    }
}
