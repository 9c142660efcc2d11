//! Intensity banding.

use serde::{Deserialize, Serialize};

/// One of five heat levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Intensity {
    Empty,
    Low,
    Moderate,
    High,
    Extreme,
}

impl Intensity {
    pub const ALL: [Intensity; 5] = [
        Intensity::Empty,
        Intensity::Low,
        Intensity::Moderate,
        Intensity::High,
        Intensity::Extreme,
    ];

    /// Numeric level, 0 through 4.
    pub fn level(self) -> u8 {
        self as u8
    }

    /// Character used by the text renderer.
    pub fn glyph(self) -> char {
        match self {
            Intensity::Empty => '·',
            Intensity::Low => '░',
            Intensity::Moderate => '▒',
            Intensity::High => '▓',
            Intensity::Extreme => '█',
        }
    }
}

/// Four configured boundaries. Bands are assigned by first match, so the
/// values are expected, but not required, to increase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdSet(pub [u64; 4]);

impl Default for ThresholdSet {
    fn default() -> Self {
        Self([100, 500, 1000, 2000])
    }
}

impl ThresholdSet {
    pub fn new(boundaries: [u64; 4]) -> Self {
        Self(boundaries)
    }

    pub fn boundaries(&self) -> [u64; 4] {
        self.0
    }

    /// Band for a daily total.
    pub fn band(&self, count: u64) -> Intensity {
        let [low, moderate, high, _] = self.0;
        if count == 0 {
            Intensity::Empty
        } else if count <= low {
            Intensity::Low
        } else if count <= moderate {
            Intensity::Moderate
        } else if count <= high {
            Intensity::High
        } else {
            Intensity::Extreme
        }
    }
}
