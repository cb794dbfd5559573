//! Error conversion utilities for CLI.
//!
//! Converts bitarc-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use bitarc_core::BitError;
use std::path::Path;

/// Converts `BitError` to a user-friendly anyhow error with context
pub fn convert_bit_error(err: BitError, archive: &Path) -> anyhow::Error {
    match err {
        BitError::UnsupportedFormat => {
            anyhow!(
                "Cannot determine the archive format of '{}'\n\
                 HINT: Use --format with one of: 7z, zip, tar, gzip, bzip2, xz, wim",
                archive.display()
            )
        }
        BitError::InvalidConfiguration { reason } => {
            anyhow!(
                "Invalid configuration for '{}': {}\n\
                 HINT: Run `bitarc formats` to see which methods each format accepts.",
                archive.display(),
                reason
            )
        }
        BitError::PasswordNotDefined => {
            anyhow!(
                "Archive '{}' is encrypted and no password was given\n\
                 HINT: Use --password to supply one.",
                archive.display()
            )
        }
        _ => anyhow::Error::from(err)
            .context(format!("Error processing archive '{}'", archive.display())),
    }
}

/// Adds archive context to a core result
pub fn add_archive_context<T>(
    result: Result<T, BitError>,
    archive: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_bit_error(e, archive))
}
