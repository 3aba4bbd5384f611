//! Token colors, stored as `#rrggbb` strings so saved data matches the web format.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color '{input}': expected #rgb or #rrggbb")]
pub struct ColorError {
    pub input: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const TEAM_A: Rgb = Rgb::new(0x3b, 0x82, 0xf6);
    pub const TEAM_B: Rgb = Rgb::new(0xef, 0x44, 0x44);
    pub const BALL: Rgb = Rgb::new(0xff, 0xc1, 0x07);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorError {
            input: s.to_string(),
        };
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16);
        match hex.len() {
            6 => Ok(Rgb::new(
                channel(0..2).map_err(|_| err())?,
                channel(2..4).map_err(|_| err())?,
                channel(4..6).map_err(|_| err())?,
            )),
            // #abc expands each nibble: a -> aa
            3 => {
                let nib = |i: usize| channel(i..i + 1).map(|v| v * 17).map_err(|_| err());
                Ok(Rgb::new(nib(0)?, nib(1)?, nib(2)?))
            }
            _ => Err(err()),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
