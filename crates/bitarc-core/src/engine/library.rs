//! Explicitly initialized engine handle.

use std::fmt;
use std::path::Path;

use tracing::debug;

use super::Engine;
use super::InArchive;
use super::OutArchive;
use super::PasswordCallback;
use crate::BitError;
use crate::Result;
use crate::formats::ArchiveFormat;

/// Process-wide engine handle.
///
/// Created once by the embedding application and passed by reference into
/// every component that needs the engine. Components borrow it; none of them
/// own it.
///
/// # Examples
///
/// ```
/// use bitarc_core::Library;
/// use bitarc_core::engine::Engine;
///
/// fn open_library(engine: impl Engine + 'static) -> Library {
///     let library = Library::new("7z", engine);
///     assert_eq!(library.name(), "7z");
///     library
/// }
/// ```
pub struct Library {
    name: String,
    engine: Box<dyn Engine>,
}

impl Library {
    /// Wraps an initialized engine.
    pub fn new(name: impl Into<String>, engine: impl Engine + 'static) -> Self {
        let name = name.into();
        debug!(library = %name, "engine library initialized");
        Self {
            name,
            engine: Box::new(engine),
        }
    }

    /// Returns the name the library was registered under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the underlying engine.
    #[must_use]
    pub fn engine(&self) -> &dyn Engine {
        self.engine.as_ref()
    }

    /// Creates an output archive object for `format`.
    pub(crate) fn create_out_archive(&self, format: ArchiveFormat) -> Result<Box<dyn OutArchive>> {
        self.engine
            .create_out_archive(format)
            .map_err(|status| BitError::Engine {
                operation: "create the output archive object",
                status,
            })
    }

    /// Opens an input archive.
    pub(crate) fn open_archive(
        &self,
        format: ArchiveFormat,
        path: &Path,
        callback: &mut dyn PasswordCallback,
    ) -> Result<Box<dyn InArchive>> {
        self.engine
            .open_archive(format, path, callback)
            .map_err(|status| BitError::Engine {
                operation: "open the archive",
                status,
            })
    }
}

impl fmt::Debug for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library").field("name", &self.name).finish()
    }
}

impl Drop for Library {
    fn drop(&mut self) {
        debug!(library = %self.name, "engine library released");
    }
}
