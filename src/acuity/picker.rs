//! Stimulus Picker: random optotype orientation with no immediate repeats.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::core::Error;

/// The four optotype rotations. Labels are presentation concerns; the engine
/// only relies on the symbols being distinct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Up,
    Right,
    Down,
    Left,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Up,
        Orientation::Right,
        Orientation::Down,
        Orientation::Left,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Up => "up",
            Orientation::Right => "right",
            Orientation::Down => "down",
            Orientation::Left => "left",
        }
    }

    /// Rotation of the optotype in degrees, clockwise from "up".
    pub fn degrees(&self) -> u16 {
        match self {
            Orientation::Up => 0,
            Orientation::Right => 90,
            Orientation::Down => 180,
            Orientation::Left => 270,
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = Error;

    /// Accepts full names and single-letter shorthands, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" | "u" => Ok(Orientation::Up),
            "right" | "r" => Ok(Orientation::Right),
            "down" | "d" => Ok(Orientation::Down),
            "left" | "l" => Ok(Orientation::Left),
            _ => Err(Error::invalid_input("orientation", s, "up, right, down, left")),
        }
    }
}

/// Pick the next orientation uniformly among those different from `previous`.
///
/// With no previous stimulus all four orientations are candidates.
pub fn next_orientation<R: Rng + ?Sized>(
    rng: &mut R,
    previous: Option<Orientation>,
) -> Orientation {
    let candidates: Vec<Orientation> = Orientation::ALL
        .into_iter()
        .filter(|o| Some(*o) != previous)
        .collect();
    candidates[rng.gen_range(0..candidates.len())]
}
