//! Tagged property values reported by the engine.

use std::fmt;
use std::time::Duration;
use std::time::SystemTime;

/// Number of 100ns intervals between 1601-01-01 and the Unix epoch.
const FILETIME_UNIX_OFFSET: u64 = 116_444_736_000_000_000;

/// A property value as reported (or accepted) by the engine.
///
/// `Empty` means the engine has no value for the requested property; it is
/// never an error.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PropVariant {
    /// No value.
    #[default]
    Empty,
    /// Boolean flag.
    Bool(bool),
    /// Unsigned 32-bit integer.
    UInt32(u32),
    /// Unsigned 64-bit integer.
    UInt64(u64),
    /// Signed 64-bit integer.
    Int64(i64),
    /// UTF-8 string.
    String(String),
    /// Timestamp in 100ns intervals since 1601-01-01 UTC.
    FileTime(u64),
}

/// Discriminant of a [`PropVariant`], used when a caller needs a specific type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantType {
    /// [`PropVariant::Empty`].
    Empty,
    /// [`PropVariant::Bool`].
    Bool,
    /// [`PropVariant::UInt32`].
    UInt32,
    /// [`PropVariant::UInt64`].
    UInt64,
    /// [`PropVariant::Int64`].
    Int64,
    /// [`PropVariant::String`].
    String,
    /// [`PropVariant::FileTime`].
    FileTime,
}

impl PropVariant {
    /// Returns the variant's type tag.
    #[must_use]
    pub const fn variant_type(&self) -> VariantType {
        match self {
            Self::Empty => VariantType::Empty,
            Self::Bool(_) => VariantType::Bool,
            Self::UInt32(_) => VariantType::UInt32,
            Self::UInt64(_) => VariantType::UInt64,
            Self::Int64(_) => VariantType::Int64,
            Self::String(_) => VariantType::String,
            Self::FileTime(_) => VariantType::FileTime,
        }
    }

    /// Returns `true` if the engine reported no value.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the boolean value, if this is a `Bool`.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value widened to `u64` for any unsigned integer variant.
    ///
    /// # Examples
    ///
    /// ```
    /// use bitarc_core::engine::PropVariant;
    ///
    /// assert_eq!(PropVariant::UInt32(7).as_u64(), Some(7));
    /// assert_eq!(PropVariant::UInt64(1 << 40).as_u64(), Some(1 << 40));
    /// assert_eq!(PropVariant::Bool(true).as_u64(), None);
    /// ```
    #[must_use]
    pub const fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt32(v) => Some(*v as u64),
            Self::UInt64(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value if this is a `UInt32`.
    #[must_use]
    pub const fn as_u32(&self) -> Option<u32> {
        match self {
            Self::UInt32(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string value, if this is a `String`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the raw FILETIME value, if this is a `FileTime`.
    #[must_use]
    pub const fn as_filetime(&self) -> Option<u64> {
        match self {
            Self::FileTime(t) => Some(*t),
            _ => None,
        }
    }

    /// Converts a `FileTime` to a `SystemTime`.
    ///
    /// Timestamps before the Unix epoch are clamped to it.
    #[must_use]
    pub fn as_system_time(&self) -> Option<SystemTime> {
        self.as_filetime().map(filetime_to_system_time)
    }
}

/// Converts a raw FILETIME (100ns ticks since 1601) to `SystemTime`.
#[must_use]
pub fn filetime_to_system_time(ticks: u64) -> SystemTime {
    let since_epoch = ticks.saturating_sub(FILETIME_UNIX_OFFSET);
    SystemTime::UNIX_EPOCH
        + Duration::from_secs(since_epoch / 10_000_000)
        + Duration::from_nanos((since_epoch % 10_000_000) * 100)
}

/// Converts a `SystemTime` to a raw FILETIME value.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn system_time_to_filetime(time: SystemTime) -> u64 {
    let since_epoch = time
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    FILETIME_UNIX_OFFSET + (since_epoch.as_nanos() / 100) as u64
}

impl fmt::Display for PropVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Bool(b) => write!(f, "{}", if *b { "+" } else { "-" }),
            Self::UInt32(v) => write!(f, "{v}"),
            Self::UInt64(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::String(s) => f.write_str(s),
            Self::FileTime(t) => write!(f, "{t}"),
        }
    }
}

impl From<bool> for PropVariant {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<u32> for PropVariant {
    fn from(value: u32) -> Self {
        Self::UInt32(value)
    }
}

impl From<u64> for PropVariant {
    fn from(value: u64) -> Self {
        Self::UInt64(value)
    }
}

impl From<&str> for PropVariant {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PropVariant {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}
