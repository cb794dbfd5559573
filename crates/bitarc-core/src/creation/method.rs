//! Compression methods and their legality rules.
//!
//! Two fixed tables decide what the validator accepts:
//!
//! - which container formats can carry each method, and
//! - which dictionary sizes each method can use.

use std::fmt;
use std::str::FromStr;

use crate::BitError;
use crate::formats::ArchiveFormat;

const KIB: u32 = 1 << 10;
const MIB: u32 = 1 << 20;

/// Largest dictionary accepted for LZMA and LZMA2 (1536 MiB).
pub const LZMA_MAX_DICTIONARY: u32 = 1536 * MIB;
/// Largest dictionary accepted for PPMd (1 GiB).
pub const PPMD_MAX_DICTIONARY: u32 = 1 << 30;
/// Largest dictionary accepted for BZip2 (900 KiB).
pub const BZIP2_MAX_DICTIONARY: u32 = 900 * KIB;
/// The only dictionary size Deflate64 accepts (64 KiB).
pub const DEFLATE64_DICTIONARY: u32 = 64 * KIB;
/// The only dictionary size Deflate accepts (32 KiB).
pub const DEFLATE_DICTIONARY: u32 = 32 * KIB;

/// Compression algorithm used inside a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CompressionMethod {
    /// Stored without compression.
    Copy,
    /// PPMd.
    Ppmd,
    /// LZMA.
    Lzma,
    /// LZMA2.
    Lzma2,
    /// BZip2.
    BZip2,
    /// Deflate.
    Deflate,
    /// Deflate64.
    Deflate64,
}

impl CompressionMethod {
    /// Every known method.
    pub const ALL: [Self; 7] = [
        Self::Copy,
        Self::Ppmd,
        Self::Lzma,
        Self::Lzma2,
        Self::BZip2,
        Self::Deflate,
        Self::Deflate64,
    ];

    /// Name the engine expects in a method property.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Copy => "Copy",
            Self::Ppmd => "PPMd",
            Self::Lzma => "LZMA",
            Self::Lzma2 => "LZMA2",
            Self::BZip2 => "BZip2",
            Self::Deflate => "Deflate",
            Self::Deflate64 => "Deflate64",
        }
    }

    /// Returns `true` if the method's dictionary size is implied and cannot
    /// be overridden.
    #[must_use]
    pub const fn has_fixed_dictionary(self) -> bool {
        matches!(self, Self::Copy | Self::Deflate | Self::Deflate64)
    }
}

/// Returns `true` if `format` can carry `method`.
///
/// # Examples
///
/// ```
/// use bitarc_core::creation::CompressionMethod;
/// use bitarc_core::creation::is_valid_method;
/// use bitarc_core::formats::ArchiveFormat;
///
/// assert!(is_valid_method(ArchiveFormat::Zip, CompressionMethod::Deflate64));
/// assert!(!is_valid_method(ArchiveFormat::SevenZip, CompressionMethod::Deflate64));
/// ```
#[must_use]
pub const fn is_valid_method(format: ArchiveFormat, method: CompressionMethod) -> bool {
    use ArchiveFormat as F;
    match method {
        CompressionMethod::Copy => {
            matches!(format, F::SevenZip | F::Zip | F::Tar | F::Wim)
        }
        CompressionMethod::Ppmd | CompressionMethod::Lzma => {
            matches!(format, F::SevenZip | F::Zip)
        }
        CompressionMethod::Lzma2 => matches!(format, F::SevenZip | F::Xz),
        CompressionMethod::BZip2 => matches!(format, F::SevenZip | F::BZip2 | F::Zip),
        CompressionMethod::Deflate => matches!(format, F::GZip | F::Zip),
        CompressionMethod::Deflate64 => matches!(format, F::Zip),
    }
}

/// Returns `true` if `size` bytes is a legal dictionary for `method`.
///
/// Copy has no constraint; the engine decides.
///
/// # Examples
///
/// ```
/// use bitarc_core::creation::CompressionMethod;
/// use bitarc_core::creation::is_valid_dictionary_size;
///
/// assert!(is_valid_dictionary_size(CompressionMethod::Deflate, 32 * 1024));
/// assert!(!is_valid_dictionary_size(CompressionMethod::Deflate, 64 * 1024));
/// assert!(is_valid_dictionary_size(CompressionMethod::BZip2, 900 * 1024));
/// ```
#[must_use]
pub const fn is_valid_dictionary_size(method: CompressionMethod, size: u32) -> bool {
    match method {
        CompressionMethod::Lzma | CompressionMethod::Lzma2 => size <= LZMA_MAX_DICTIONARY,
        CompressionMethod::Ppmd => size <= PPMD_MAX_DICTIONARY,
        CompressionMethod::BZip2 => size <= BZIP2_MAX_DICTIONARY,
        CompressionMethod::Deflate64 => size == DEFLATE64_DICTIONARY,
        CompressionMethod::Deflate => size == DEFLATE_DICTIONARY,
        CompressionMethod::Copy => true,
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompressionMethod {
    type Err = BitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| BitError::invalid(format!("unknown compression method '{s}'")))
    }
}
