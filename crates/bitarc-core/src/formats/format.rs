//! Archive container formats and their feature sets.

use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

use crate::BitError;
use crate::creation::CompressionMethod;

/// Set of capabilities a container format supports when writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatFeatures(u8);

impl FormatFeatures {
    /// No features.
    pub const NONE: Self = Self(0);
    /// Can hold more than one item.
    pub const MULTIPLE_FILES: Self = Self(1);
    /// Supports solid compression.
    pub const SOLID_ARCHIVE: Self = Self(1 << 1);
    /// Accepts a compression level.
    pub const COMPRESSION_LEVEL: Self = Self(1 << 2);
    /// Supports encrypting item data.
    pub const ENCRYPTION: Self = Self(1 << 3);
    /// Supports encrypting the archive headers.
    pub const HEADER_ENCRYPTION: Self = Self(1 << 4);
    /// Accepts more than one compression method.
    pub const MULTIPLE_METHODS: Self = Self(1 << 5);

    /// Returns `true` if every feature in `other` is present.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for FormatFeatures {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Archive container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArchiveFormat {
    /// 7z archive.
    SevenZip,
    /// ZIP archive.
    Zip,
    /// Tar archive (uncompressed).
    Tar,
    /// Gzip stream.
    GZip,
    /// Bzip2 stream.
    BZip2,
    /// XZ stream.
    Xz,
    /// Windows imaging format.
    Wim,
}

impl ArchiveFormat {
    /// Every supported format.
    pub const ALL: [Self; 7] = [
        Self::SevenZip,
        Self::Zip,
        Self::Tar,
        Self::GZip,
        Self::BZip2,
        Self::Xz,
        Self::Wim,
    ];

    /// Engine class identifier byte for the format.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Zip => 0x01,
            Self::BZip2 => 0x02,
            Self::SevenZip => 0x07,
            Self::Xz => 0x0C,
            Self::Wim => 0xE6,
            Self::Tar => 0xEE,
            Self::GZip => 0xEF,
        }
    }

    /// Capabilities of the format when creating archives.
    ///
    /// # Examples
    ///
    /// ```
    /// use bitarc_core::formats::ArchiveFormat;
    /// use bitarc_core::formats::FormatFeatures;
    ///
    /// assert!(ArchiveFormat::SevenZip.features().contains(FormatFeatures::HEADER_ENCRYPTION));
    /// assert!(!ArchiveFormat::Zip.features().contains(FormatFeatures::SOLID_ARCHIVE));
    /// ```
    #[must_use]
    pub fn features(self) -> FormatFeatures {
        use FormatFeatures as F;
        match self {
            Self::SevenZip => {
                F::MULTIPLE_FILES
                    | F::SOLID_ARCHIVE
                    | F::COMPRESSION_LEVEL
                    | F::ENCRYPTION
                    | F::HEADER_ENCRYPTION
                    | F::MULTIPLE_METHODS
            }
            Self::Zip => F::MULTIPLE_FILES | F::COMPRESSION_LEVEL | F::ENCRYPTION | F::MULTIPLE_METHODS,
            Self::Tar | Self::Wim => F::MULTIPLE_FILES,
            Self::GZip | Self::BZip2 | Self::Xz => F::COMPRESSION_LEVEL,
        }
    }

    /// Returns `true` if the format supports `feature`.
    #[must_use]
    pub fn has_feature(self, feature: FormatFeatures) -> bool {
        self.features().contains(feature)
    }

    /// Method used when the caller does not choose one.
    #[must_use]
    pub const fn default_method(self) -> CompressionMethod {
        match self {
            Self::SevenZip | Self::Xz => CompressionMethod::Lzma2,
            Self::Zip | Self::GZip => CompressionMethod::Deflate,
            Self::BZip2 => CompressionMethod::BZip2,
            Self::Tar | Self::Wim => CompressionMethod::Copy,
        }
    }

    /// Canonical file extension, without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::SevenZip => "7z",
            Self::Zip => "zip",
            Self::Tar => "tar",
            Self::GZip => "gz",
            Self::BZip2 => "bz2",
            Self::Xz => "xz",
            Self::Wim => "wim",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SevenZip => "7z",
            Self::Zip => "zip",
            Self::Tar => "tar",
            Self::GZip => "gzip",
            Self::BZip2 => "bzip2",
            Self::Xz => "xz",
            Self::Wim => "wim",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArchiveFormat {
    type Err = BitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "7z" | "7zip" | "sevenzip" => Ok(Self::SevenZip),
            "zip" => Ok(Self::Zip),
            "tar" => Ok(Self::Tar),
            "gz" | "gzip" => Ok(Self::GZip),
            "bz2" | "bzip2" => Ok(Self::BZip2),
            "xz" => Ok(Self::Xz),
            "wim" => Ok(Self::Wim),
            _ => Err(BitError::UnsupportedFormat),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_seven_zip_features() {
        let f = ArchiveFormat::SevenZip.features();
        assert!(f.contains(FormatFeatures::MULTIPLE_FILES));
        assert!(f.contains(FormatFeatures::SOLID_ARCHIVE));
        assert!(f.contains(FormatFeatures::COMPRESSION_LEVEL));
        assert!(f.contains(FormatFeatures::HEADER_ENCRYPTION));
        assert!(f.contains(FormatFeatures::MULTIPLE_METHODS));
    }

    #[test]
    fn test_stream_formats_only_support_level() {
        for format in [ArchiveFormat::GZip, ArchiveFormat::BZip2, ArchiveFormat::Xz] {
            assert!(format.has_feature(FormatFeatures::COMPRESSION_LEVEL));
            assert!(!format.has_feature(FormatFeatures::MULTIPLE_METHODS));
            assert!(!format.has_feature(FormatFeatures::SOLID_ARCHIVE));
            assert!(!format.has_feature(FormatFeatures::MULTIPLE_FILES));
        }
    }

    #[test]
    fn test_tar_and_wim_have_no_tunables() {
        for format in [ArchiveFormat::Tar, ArchiveFormat::Wim] {
            assert!(!format.has_feature(FormatFeatures::COMPRESSION_LEVEL));
            assert_eq!(format.default_method(), CompressionMethod::Copy);
        }
    }

    #[test]
    fn test_default_methods() {
        assert_eq!(
            ArchiveFormat::SevenZip.default_method(),
            CompressionMethod::Lzma2
        );
        assert_eq!(ArchiveFormat::Zip.default_method(), CompressionMethod::Deflate);
        assert_eq!(ArchiveFormat::GZip.default_method(), CompressionMethod::Deflate);
        assert_eq!(ArchiveFormat::BZip2.default_method(), CompressionMethod::BZip2);
        assert_eq!(ArchiveFormat::Xz.default_method(), CompressionMethod::Lzma2);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids: Vec<u8> = ArchiveFormat::ALL.iter().map(|f| f.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), ArchiveFormat::ALL.len());
    }

    #[test]
    fn test_from_str() {
        assert_eq!("7z".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::SevenZip);
        assert_eq!("GZIP".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::GZip);
        assert!(matches!(
            "rar".parse::<ArchiveFormat>(),
            Err(BitError::UnsupportedFormat)
        ));
    }

    #[test]
    fn test_features_none() {
        assert!(FormatFeatures::NONE.contains(FormatFeatures::NONE));
        assert!(!FormatFeatures::NONE.contains(FormatFeatures::ENCRYPTION));
    }
}
