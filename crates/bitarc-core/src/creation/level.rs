//! Compression level scale understood by the engine.

use std::fmt;
use std::str::FromStr;

use crate::BitError;

/// Ordinal compression level.
///
/// The discriminant is the value installed as the engine's `x` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum CompressionLevel {
    /// Store only.
    None = 0,
    /// Fastest compression.
    Fastest = 1,
    /// Fast compression.
    Fast = 3,
    /// Balanced compression.
    #[default]
    Normal = 5,
    /// Maximum compression.
    Max = 7,
    /// Ultra compression.
    Ultra = 9,
}

impl CompressionLevel {
    /// Returns the engine value for this level.
    #[must_use]
    pub const fn value(self) -> u32 {
        self as u32
    }

    /// Maps a numeric level (0-9) to the nearest named level at or below it.
    ///
    /// # Examples
    ///
    /// ```
    /// use bitarc_core::creation::CompressionLevel;
    ///
    /// assert_eq!(CompressionLevel::from_number(9), Some(CompressionLevel::Ultra));
    /// assert_eq!(CompressionLevel::from_number(6), Some(CompressionLevel::Normal));
    /// assert_eq!(CompressionLevel::from_number(10), None);
    /// ```
    #[must_use]
    pub const fn from_number(level: u8) -> Option<Self> {
        match level {
            0 => Some(Self::None),
            1 | 2 => Some(Self::Fastest),
            3 | 4 => Some(Self::Fast),
            5 | 6 => Some(Self::Normal),
            7 | 8 => Some(Self::Max),
            9 => Some(Self::Ultra),
            _ => None,
        }
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Fastest => "fastest",
            Self::Fast => "fast",
            Self::Normal => "normal",
            Self::Max => "max",
            Self::Ultra => "ultra",
        };
        f.write_str(name)
    }
}

impl FromStr for CompressionLevel {
    type Err = BitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "store" => Ok(Self::None),
            "fastest" => Ok(Self::Fastest),
            "fast" => Ok(Self::Fast),
            "normal" => Ok(Self::Normal),
            "max" | "maximum" => Ok(Self::Max),
            "ultra" => Ok(Self::Ultra),
            other => other
                .parse::<u8>()
                .ok()
                .and_then(Self::from_number)
                .ok_or_else(|| BitError::invalid(format!("unknown compression level '{s}'"))),
        }
    }
}
