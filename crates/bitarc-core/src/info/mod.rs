//! Archive metadata without extraction.
//!
//! [`ArchiveInfo`] opens an archive through the engine and exposes its
//! archive-level and item-level properties. The reads themselves live in
//! [`PropertyAccessor`], which works on any [`PropertyReader`].
//!
//! # Examples
//!
//! ```
//! use bitarc_core::Library;
//! use bitarc_core::formats::ArchiveFormat;
//! use bitarc_core::info::ArchiveInfo;
//!
//! fn list(library: &Library) -> Result<(), bitarc_core::BitError> {
//!     let info = ArchiveInfo::open(library, "backup.7z", ArchiveFormat::SevenZip, "")?;
//!     for item in info.items()? {
//!         println!("{:?}: {} bytes", item.path(), item.size());
//!     }
//!     Ok(())
//! }
//! ```

pub mod accessor;
pub mod item;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use crate::Library;
use crate::Result;
use crate::engine::InArchive;
use crate::engine::PropVariant;
use crate::engine::PropertyId;
use crate::extraction::Callbacks;
use crate::extraction::extractor::open_archive;
use crate::formats::ArchiveFormat;

pub use accessor::PropertyAccessor;
pub use item::ArchiveItem;

/// An archive opened for metadata reads.
pub struct ArchiveInfo {
    path: PathBuf,
    format: ArchiveFormat,
    archive: Box<dyn InArchive>,
}

impl ArchiveInfo {
    /// Opens `path` as `format`. An empty `password` means none.
    ///
    /// # Errors
    ///
    /// Returns `PasswordNotDefined` if the headers are encrypted and no
    /// password was given, or an engine error if opening fails.
    pub fn open(
        library: &Library,
        path: impl AsRef<Path>,
        format: ArchiveFormat,
        password: &str,
    ) -> Result<Self> {
        let mut callbacks = Callbacks::new().with_password(password);
        Self::open_with(library, path, format, &mut callbacks)
    }

    /// Opens `path` as `format`, asking `callbacks` for a password if needed.
    ///
    /// # Errors
    ///
    /// Same as [`open`](Self::open).
    pub fn open_with(
        library: &Library,
        path: impl AsRef<Path>,
        format: ArchiveFormat,
        callbacks: &mut Callbacks,
    ) -> Result<Self> {
        let path = path.as_ref();
        let archive = open_archive(library, format, path, callbacks)?;
        debug!(path = %path.display(), %format, "archive opened for inspection");
        Ok(Self {
            path: path.to_path_buf(),
            format,
            archive,
        })
    }

    /// Path the archive was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Format the archive was opened as.
    #[must_use]
    pub fn format(&self) -> ArchiveFormat {
        self.format
    }

    /// Accessor over the opened archive.
    #[must_use]
    pub fn accessor(&self) -> PropertyAccessor<'_, dyn InArchive> {
        PropertyAccessor::new(self.archive.as_ref())
    }

    /// See [`PropertyAccessor::archive_property`].
    ///
    /// # Errors
    ///
    /// Returns `BitError::Property` if the engine refuses the read.
    pub fn archive_property(&self, id: PropertyId) -> Result<PropVariant> {
        self.accessor().archive_property(id)
    }

    /// See [`PropertyAccessor::item_property`].
    ///
    /// # Errors
    ///
    /// Returns `BitError::Property` if the engine refuses the read.
    pub fn item_property(&self, index: u32, id: PropertyId) -> Result<PropVariant> {
        self.accessor().item_property(index, id)
    }

    /// See [`PropertyAccessor::archive_properties`].
    ///
    /// # Errors
    ///
    /// Returns `BitError::Property` on the first refused read.
    pub fn archive_properties(&self) -> Result<BTreeMap<PropertyId, PropVariant>> {
        self.accessor().archive_properties()
    }

    /// See [`PropertyAccessor::item`].
    ///
    /// # Errors
    ///
    /// Returns `BitError::Property` on the first refused read.
    pub fn item(&self, index: u32) -> Result<ArchiveItem> {
        self.accessor().item(index)
    }

    /// See [`PropertyAccessor::items`].
    ///
    /// # Errors
    ///
    /// Returns `BitError::ItemCount` or `BitError::Property`.
    pub fn items(&self) -> Result<Vec<ArchiveItem>> {
        self.accessor().items()
    }

    /// See [`PropertyAccessor::items_count`].
    ///
    /// # Errors
    ///
    /// Returns `BitError::ItemCount` if the engine refuses the read.
    pub fn items_count(&self) -> Result<u32> {
        self.accessor().items_count()
    }

    /// See [`PropertyAccessor::folders_count`].
    ///
    /// # Errors
    ///
    /// Returns `BitError::ItemCount` or `BitError::Property`.
    pub fn folders_count(&self) -> Result<u32> {
        self.accessor().folders_count()
    }

    /// See [`PropertyAccessor::files_count`].
    ///
    /// # Errors
    ///
    /// Returns `BitError::ItemCount` or `BitError::Property`.
    pub fn files_count(&self) -> Result<u32> {
        self.accessor().files_count()
    }

    /// See [`PropertyAccessor::size`].
    ///
    /// # Errors
    ///
    /// Returns `BitError::ItemCount` or `BitError::Property`.
    pub fn size(&self) -> Result<u64> {
        self.accessor().size()
    }

    /// See [`PropertyAccessor::pack_size`].
    ///
    /// # Errors
    ///
    /// Returns `BitError::ItemCount` or `BitError::Property`.
    pub fn pack_size(&self) -> Result<u64> {
        self.accessor().pack_size()
    }
}

impl fmt::Debug for ArchiveInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveInfo")
            .field("path", &self.path)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}
