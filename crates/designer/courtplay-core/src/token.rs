//! Token model: players and the ball, plus the default court layout.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::config::CourtConfig;
use crate::geometry::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Player,
    Ball,
}

/// A draggable marker on the court. `id` never changes once created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub x: f64,
    pub y: f64,
    pub color: Rgb,
}

impl Token {
    pub fn new(id: impl Into<String>, kind: TokenKind, position: Point, color: Rgb) -> Self {
        Self {
            id: id.into(),
            kind,
            x: position.x,
            y: position.y,
            color,
        }
    }

    #[inline]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn set_position(&mut self, p: Point) {
        self.x = p.x;
        self.y = p.y;
    }

    #[inline]
    pub fn is_ball(&self) -> bool {
        self.kind == TokenKind::Ball
    }
}

/// Attack line-up on the 9 m line, in metres from the court corner.
const TEAM_A: [(&str, f64, f64); 6] = [
    ("A1", 2.0, 14.0),
    ("A2", 5.0, 12.0),
    ("A3", 9.0, 10.5),
    ("A4", 11.0, 10.5),
    ("A5", 15.0, 12.0),
    ("A6", 18.0, 14.0),
];

/// Defence line-up on the 6 m line.
const TEAM_B: [(&str, f64, f64); 6] = [
    ("B1", 3.5, 19.0),
    ("B2", 6.0, 16.5),
    ("B3", 9.0, 15.0),
    ("B4", 11.0, 15.0),
    ("B5", 14.0, 16.5),
    ("B6", 16.5, 19.0),
];

pub const BALL_ID: &str = "Ball";
const BALL_START: (f64, f64) = (9.0, 10.0);

/// Fresh default layout: 6 attackers, 6 defenders and one ball.
pub fn default_layout(court: &CourtConfig) -> Vec<Token> {
    let team = |slots: &[(&str, f64, f64)], color: Rgb| {
        slots
            .iter()
            .map(move |(id, mx, my)| {
                Token::new(*id, TokenKind::Player, court.to_internal(*mx, *my), color)
            })
            .collect::<Vec<_>>()
    };
    let mut tokens = team(&TEAM_A, Rgb::TEAM_A);
    tokens.extend(team(&TEAM_B, Rgb::TEAM_B));
    tokens.push(Token::new(
        BALL_ID,
        TokenKind::Ball,
        court.to_internal(BALL_START.0, BALL_START.1),
        Rgb::BALL,
    ));
    tokens
}

/// The ball token, if the set has one.
pub fn find_ball(tokens: &[Token]) -> Option<&Token> {
    tokens.iter().find(|t| t.is_ball())
}

pub fn find_token<'a>(tokens: &'a [Token], id: &str) -> Option<&'a Token> {
    tokens.iter().find(|t| t.id == id)
}
