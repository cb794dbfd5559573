//! Archive format detection.

use std::path::Path;

use crate::BitError;
use crate::Result;
use crate::formats::ArchiveFormat;

/// Detects the archive format from a file path's extension.
///
/// Compressed tarballs (`.tar.gz`, `.tgz`, ...) are reported as the outer
/// stream format; the engine opens the inner tar as a separate archive.
///
/// # Errors
///
/// Returns `UnsupportedFormat` if the extension is missing or unknown.
///
/// # Examples
///
/// ```
/// use bitarc_core::formats::ArchiveFormat;
/// use bitarc_core::formats::detect_format;
/// use std::path::Path;
///
/// assert_eq!(detect_format(Path::new("backup.7z")).unwrap(), ArchiveFormat::SevenZip);
/// assert_eq!(detect_format(Path::new("src.tar.xz")).unwrap(), ArchiveFormat::Xz);
/// ```
pub fn detect_format(path: &Path) -> Result<ArchiveFormat> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or(BitError::UnsupportedFormat)?;

    let ext_lower = extension.to_ascii_lowercase();
    match ext_lower.as_str() {
        "7z" => Ok(ArchiveFormat::SevenZip),
        "zip" | "jar" => Ok(ArchiveFormat::Zip),
        "tar" => Ok(ArchiveFormat::Tar),
        "gz" | "tgz" => Ok(ArchiveFormat::GZip),
        "bz2" | "tbz" | "tbz2" => Ok(ArchiveFormat::BZip2),
        "xz" | "txz" => Ok(ArchiveFormat::Xz),
        "wim" | "swm" => Ok(ArchiveFormat::Wim),
        _ => Err(BitError::UnsupportedFormat),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_detect_7z() {
        let path = PathBuf::from("archive.7z");
        assert_eq!(detect_format(&path).unwrap(), ArchiveFormat::SevenZip);
    }

    #[test]
    fn test_detect_7z_case_insensitive() {
        let path = PathBuf::from("ARCHIVE.7Z");
        assert_eq!(detect_format(&path).unwrap(), ArchiveFormat::SevenZip);
    }

    #[test]
    fn test_detect_zip() {
        assert_eq!(
            detect_format(&PathBuf::from("archive.zip")).unwrap(),
            ArchiveFormat::Zip
        );
    }

    #[test]
    fn test_detect_tar() {
        assert_eq!(
            detect_format(&PathBuf::from("archive.tar")).unwrap(),
            ArchiveFormat::Tar
        );
    }

    #[test]
    fn test_detect_compressed_streams() {
        assert_eq!(
            detect_format(&PathBuf::from("archive.tar.gz")).unwrap(),
            ArchiveFormat::GZip
        );
        assert_eq!(
            detect_format(&PathBuf::from("archive.tgz")).unwrap(),
            ArchiveFormat::GZip
        );
        assert_eq!(
            detect_format(&PathBuf::from("archive.tbz2")).unwrap(),
            ArchiveFormat::BZip2
        );
        assert_eq!(
            detect_format(&PathBuf::from("archive.txz")).unwrap(),
            ArchiveFormat::Xz
        );
    }

    #[test]
    fn test_detect_wim() {
        assert_eq!(
            detect_format(&PathBuf::from("install.wim")).unwrap(),
            ArchiveFormat::Wim
        );
    }

    #[test]
    fn test_detect_unsupported() {
        let path = PathBuf::from("archive.rar");
        assert!(matches!(
            detect_format(&path),
            Err(BitError::UnsupportedFormat)
        ));
    }

    #[test]
    fn test_detect_no_extension() {
        assert!(detect_format(&PathBuf::from("archive")).is_err());
    }
}
