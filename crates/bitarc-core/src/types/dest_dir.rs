//! Normalized destination directory for extraction.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::BitError;
use crate::Result;

/// The directory extracted items are written under.
///
/// The path is created if missing and canonicalized once at construction, so
/// every item destination is computed by prefixing the same absolute path.
///
/// # Examples
///
/// ```no_run
/// use bitarc_core::types::DestDir;
///
/// # fn main() -> Result<(), bitarc_core::BitError> {
/// let dest = DestDir::new("/tmp/extraction")?;
/// let target = dest.join_item("docs/readme.txt");
/// assert!(target.starts_with(dest.as_path()));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestDir(PathBuf);

impl DestDir {
    /// Creates the directory if needed and normalizes it.
    ///
    /// # Errors
    ///
    /// Returns `BitError::Io` if the path exists but is not a directory, or if
    /// it cannot be created or canonicalized.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if path.exists() && !path.is_dir() {
            return Err(BitError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("path is not a directory: {}", path.display()),
            )));
        }

        std::fs::create_dir_all(&path).map_err(|e| {
            BitError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to create directory {}: {e}", path.display()),
            ))
        })?;

        let canonical = path.canonicalize().map_err(|e| {
            BitError::Io(std::io::Error::new(
                e.kind(),
                format!("failed to canonicalize path {}: {e}", path.display()),
            ))
        })?;

        Ok(Self(canonical))
    }

    /// Returns the normalized path.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Joins an archive item path to this directory.
    ///
    /// The item path is made relative first (see [`relative_item_path`]), so
    /// the result never escapes the destination.
    #[must_use]
    pub fn join_item(&self, item_path: &str) -> PathBuf {
        self.0.join(relative_item_path(item_path))
    }

    /// Converts into the inner `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

/// Reduces an archive item path to its normal components.
///
/// Both `/` and `\` separate components. Root, drive prefix, `.` and `..`
/// components are dropped.
///
/// # Examples
///
/// ```
/// use bitarc_core::types::relative_item_path;
/// use std::path::PathBuf;
///
/// assert_eq!(relative_item_path("a/b.txt"), PathBuf::from("a/b.txt"));
/// assert_eq!(relative_item_path("/etc/../passwd"), PathBuf::from("etc/passwd"));
/// assert_eq!(relative_item_path("dir\\file"), PathBuf::from("dir/file"));
/// ```
#[must_use]
pub fn relative_item_path(item_path: &str) -> PathBuf {
    item_path
        .split(['/', '\\'])
        .flat_map(|part| Path::new(part).components())
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_dest_dir_valid() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = DestDir::new(temp.path()).expect("dest should be valid");
        assert!(dest.as_path().is_absolute());
    }

    #[test]
    fn test_dest_dir_created_when_missing() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let nested = temp.path().join("a").join("b");
        let dest = DestDir::new(&nested).expect("should create nested dirs");
        assert!(nested.is_dir());
        assert!(dest.as_path().is_absolute());
    }

    #[test]
    fn test_dest_dir_not_a_directory() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let file_path = temp.path().join("file.txt");
        fs::write(&file_path, "test").expect("failed to write file");

        let result = DestDir::new(file_path);
        assert!(matches!(result, Err(BitError::Io(_))));
    }

    #[test]
    fn test_dest_dir_canonicalization() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let subdir = temp.path().join("subdir");
        fs::create_dir(&subdir).expect("failed to create subdir");

        let dest = DestDir::new(subdir.join(".").join("..")).expect("should create dest dir");
        assert_eq!(dest.as_path(), temp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_join_item_stays_inside() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = DestDir::new(temp.path()).unwrap();

        for item in ["../../etc/passwd", "/abs/file", "a/./b/../c", "C:\\win\\x"] {
            let joined = dest.join_item(item);
            assert!(joined.starts_with(dest.as_path()), "{item} escaped");
        }
    }

    #[test]
    fn test_relative_item_path_empty_components() {
        assert_eq!(relative_item_path(""), PathBuf::new());
        assert_eq!(relative_item_path("/"), PathBuf::new());
        assert_eq!(relative_item_path("a//b"), PathBuf::from("a/b"));
    }
}
