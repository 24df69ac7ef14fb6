use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::TimecodeError;

/// Production frame rates accepted by [`TimeCode`](super::timecode::TimeCode).
///
/// The NTSC-family rates (23.976, 29.97, 59.94) count frames at their integer timebase.
/// Drop-frame numbering is not applied, so their labels run slightly slower than the wall
/// clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FrameRate {
    Fps23_976,
    Fps24,
    Fps25,
    #[default]
    Fps29_97,
    Fps30,
    Fps59_94,
    Fps60,
}

impl FrameRate {
    /// Every supported rate, in the order a rate selector lists them.
    pub const ALL: [FrameRate; 7] = [
        FrameRate::Fps23_976,
        FrameRate::Fps24,
        FrameRate::Fps25,
        FrameRate::Fps29_97,
        FrameRate::Fps30,
        FrameRate::Fps59_94,
        FrameRate::Fps60,
    ];

    pub fn parse(text: &str) -> Result<Self, TimecodeError> {
        match text.trim() {
            "23.976" => Ok(Self::Fps23_976),
            "24" => Ok(Self::Fps24),
            "25" => Ok(Self::Fps25),
            "29.97" => Ok(Self::Fps29_97),
            "30" => Ok(Self::Fps30),
            "59.94" => Ok(Self::Fps59_94),
            "60" => Ok(Self::Fps60),
            other => Err(TimecodeError::UnsupportedRate(other.to_string())),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Fps23_976 => "23.976",
            Self::Fps24 => "24",
            Self::Fps25 => "25",
            Self::Fps29_97 => "29.97",
            Self::Fps30 => "30",
            Self::Fps59_94 => "59.94",
            Self::Fps60 => "60",
        }
    }

    /// Frames per labelled second. This is the modulus for the frames field.
    pub fn timebase(&self) -> u64 {
        match self {
            Self::Fps23_976 | Self::Fps24 => 24,
            Self::Fps25 => 25,
            Self::Fps29_97 | Self::Fps30 => 30,
            Self::Fps59_94 | Self::Fps60 => 60,
        }
    }

    /// Frames per wall-clock second.
    pub fn fps(&self) -> f64 {
        match self {
            Self::Fps23_976 => 24_000.0 / 1_001.0,
            Self::Fps29_97 => 30_000.0 / 1_001.0,
            Self::Fps59_94 => 60_000.0 / 1_001.0,
            other => other.timebase() as f64,
        }
    }

    pub fn is_fractional(&self) -> bool {
        matches!(self, Self::Fps23_976 | Self::Fps29_97 | Self::Fps59_94)
    }

    /// The rate after this one in [`FrameRate::ALL`], wrapping around.
    pub fn next(&self) -> Self {
        let index = Self::ALL.iter().position(|r| r == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for FrameRate {
    type Err = TimecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FrameRate {
    type Error = TimecodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FrameRate> for String {
    fn from(rate: FrameRate) -> Self {
        rate.label().to_string()
    }
}
