//! Ball possession rules.
//!
//! Evaluated once per accepted position update, looking only at the token that
//! moved:
//! - moving the ball clears the carrier;
//! - moving the carrier drags the ball along at `carry_offset`;
//! - moving any other player close enough to the ball makes it the carrier.
//!   The ball itself only follows from the next update onwards.
//!
//! A carrier keeps the ball until the ball is moved directly; there is no
//! "drop" on distance.

use crate::config::Config;
use crate::geometry::Point;
use crate::token::{find_ball, find_token, Token, TokenKind};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PossessionRules {
    /// Strict upper bound on player-to-ball distance for a pickup.
    pub radius: f64,
    pub carry_offset: Point,
}

impl From<&Config> for PossessionRules {
    fn from(cfg: &Config) -> Self {
        Self {
            radius: cfg.possession_radius,
            carry_offset: cfg.carry_offset,
        }
    }
}

impl Default for PossessionRules {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Outcome of one evaluation. `ball_position` is a forced ball move that must
/// land in the same update as the mover's.
#[derive(Clone, Debug, PartialEq)]
pub struct PossessionUpdate {
    pub carrier: Option<String>,
    pub ball_position: Option<Point>,
}

impl PossessionRules {
    /// `tokens` must already hold the mover at its new (clamped) position.
    pub fn evaluate(&self, tokens: &[Token], mover_id: &str, carrier: Option<&str>) -> PossessionUpdate {
        let unchanged = PossessionUpdate {
            carrier: carrier.map(str::to_string),
            ball_position: None,
        };
        let Some(mover) = find_token(tokens, mover_id) else {
            return unchanged;
        };

        match mover.kind {
            TokenKind::Ball => PossessionUpdate {
                carrier: None,
                ball_position: None,
            },
            TokenKind::Player if carrier == Some(mover_id) => PossessionUpdate {
                carrier: Some(mover.id.clone()),
                ball_position: Some(mover.position() + self.carry_offset),
            },
            TokenKind::Player => {
                let Some(ball) = find_ball(tokens) else {
                    return unchanged;
                };
                if mover.position().distance(ball.position()) < self.radius {
                    PossessionUpdate {
                        carrier: Some(mover.id.clone()),
                        ball_position: None,
                    }
                } else {
                    unchanged
                }
            }
        }
    }
}
