//! Restoration of engine-reported file attributes.

use std::fs;
use std::io;
use std::path::Path;

/// Read-only bit of the attribute word.
pub const READONLY: u32 = 0x0001;

/// Set when the high 16 bits carry a unix mode.
pub const UNIX_EXTENSION: u32 = 0x8000;

/// Unix permission bits stored in the high half of the attribute word, if
/// present.
///
/// # Examples
///
/// ```
/// use bitarc_core::extraction::attributes::unix_mode;
///
/// assert_eq!(unix_mode((0o100_755 << 16) | 0x8000), Some(0o755));
/// assert_eq!(unix_mode(0x20), None);
/// ```
#[must_use]
pub const fn unix_mode(attrib: u32) -> Option<u32> {
    if attrib & UNIX_EXTENSION != 0 {
        Some((attrib >> 16) & 0o7777)
    } else {
        None
    }
}

/// Applies `attrib` to the closed file at `path`.
///
/// With the unix extension the mode bits are applied (on unix hosts);
/// otherwise only the read-only bit is honored.
///
/// # Errors
///
/// Returns the I/O error from reading or updating the permissions.
pub fn restore_attributes(path: &Path, attrib: u32) -> io::Result<()> {
    #[cfg(unix)]
    if let Some(mode) = unix_mode(attrib) {
        use std::os::unix::fs::PermissionsExt;
        return fs::set_permissions(path, fs::Permissions::from_mode(mode));
    }

    if attrib & READONLY != 0 {
        let mut permissions = fs::metadata(path)?.permissions();
        permissions.set_readonly(true);
        fs::set_permissions(path, permissions)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_readonly_bit() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ro.txt");
        fs::write(&path, b"x").unwrap();

        restore_attributes(&path, READONLY).unwrap();
        assert!(fs::metadata(&path).unwrap().permissions().readonly());
    }

    #[test]
    fn test_plain_attributes_leave_file_writable() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("rw.txt");
        fs::write(&path, b"x").unwrap();

        restore_attributes(&path, 0x20).unwrap();
        assert!(!fs::metadata(&path).unwrap().permissions().readonly());
    }

    #[test]
    #[cfg(unix)]
    fn test_unix_mode_applied() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("script.sh");
        fs::write(&path, b"#!/bin/sh").unwrap();

        restore_attributes(&path, (0o100_750 << 16) | UNIX_EXTENSION).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o7777, 0o750);
    }

    #[test]
    fn test_missing_file_errors() {
        let temp = TempDir::new().unwrap();
        assert!(restore_attributes(&temp.path().join("nope"), READONLY).is_err());
    }
}
