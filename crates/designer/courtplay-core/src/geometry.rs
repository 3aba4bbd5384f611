//! Court coordinates and boundary clamping.

use serde::{Deserialize, Serialize};

/// A position (or a delta) in internal court units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl std::ops::Add for Point {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Axis-aligned playable rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Keep a token of the given radius fully inside the rectangle, per axis.
    ///
    /// Evaluated as `max(min + r, min(max - r, v))`, so a rectangle narrower than
    /// the token pins it to the low edge instead of panicking like `f64::clamp`.
    pub fn clamp(&self, p: Point, radius: f64) -> Point {
        Point::new(
            (self.min_x + radius).max((self.max_x - radius).min(p.x)),
            (self.min_y + radius).max((self.max_y - radius).min(p.y)),
        )
    }

    #[inline]
    pub fn contains(&self, p: Point, radius: f64) -> bool {
        self.clamp(p, radius) == p
    }
}
