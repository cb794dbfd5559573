//! High-level extraction entry points.

use std::path::Path;

use tracing::info;
use tracing::warn;

use crate::BitError;
use crate::ExtractionReport;
use crate::Library;
use crate::Result;
use crate::engine::InArchive;
use crate::engine::PropVariant;
use crate::engine::PropertyId;
use crate::extraction::Callbacks;
use crate::extraction::Destination;
use crate::extraction::ExtractionSession;
use crate::extraction::OutputSink;
use crate::formats::ArchiveFormat;
use crate::types::DestDir;

/// Opens `path`, mapping a missing password to `PasswordNotDefined`.
pub(crate) fn open_archive(
    library: &Library,
    format: ArchiveFormat,
    path: &Path,
    callbacks: &mut Callbacks,
) -> Result<Box<dyn InArchive>> {
    callbacks.clear_failure();
    library
        .open_archive(format, path, &mut *callbacks)
        .map_err(|err| {
            if callbacks.password_missing() {
                BitError::PasswordNotDefined
            } else {
                err
            }
        })
}

/// Extracts or tests archives of one format through an engine library.
///
/// # Examples
///
/// ```
/// use bitarc_core::Library;
/// use bitarc_core::extraction::Callbacks;
/// use bitarc_core::extraction::Extractor;
/// use bitarc_core::formats::ArchiveFormat;
///
/// fn restore(library: &Library) -> Result<(), bitarc_core::BitError> {
///     let mut extractor = Extractor::new(library, ArchiveFormat::SevenZip)
///         .with_callbacks(Callbacks::new().with_password("secret"));
///
///     let report = extractor.extract("backup.7z", "/tmp/restore")?;
///     println!("{} files", report.files_extracted);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Extractor<'lib> {
    library: &'lib Library,
    format: ArchiveFormat,
    callbacks: Callbacks,
}

impl<'lib> Extractor<'lib> {
    /// Creates an extractor for `format` archives.
    #[must_use]
    pub fn new(library: &'lib Library, format: ArchiveFormat) -> Self {
        Self {
            library,
            format,
            callbacks: Callbacks::new(),
        }
    }

    /// Replaces the registered callbacks.
    #[must_use]
    pub fn with_callbacks(mut self, callbacks: Callbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Mutable access to the registered callbacks.
    pub fn callbacks_mut(&mut self) -> &mut Callbacks {
        &mut self.callbacks
    }

    /// Format this extractor opens archives as.
    #[must_use]
    pub fn format(&self) -> ArchiveFormat {
        self.format
    }

    /// Extracts every item of `archive` under `dest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be opened, if `dest` cannot
    /// be prepared, or if any item failed (`BitError::Extraction`).
    pub fn extract(
        &mut self,
        archive: impl AsRef<Path>,
        dest: impl AsRef<Path>,
    ) -> Result<ExtractionReport> {
        let dest = DestDir::new(dest.as_ref())?;
        self.run(archive.as_ref(), Destination::Directory(dest), None, false)
    }

    /// Extracts the items at `indices` under `dest`.
    ///
    /// # Errors
    ///
    /// Same as [`extract`](Self::extract).
    pub fn extract_items(
        &mut self,
        archive: impl AsRef<Path>,
        dest: impl AsRef<Path>,
        indices: &[u32],
    ) -> Result<ExtractionReport> {
        let dest = DestDir::new(dest.as_ref())?;
        self.run(
            archive.as_ref(),
            Destination::Directory(dest),
            Some(indices),
            false,
        )
    }

    /// Verifies every item without writing anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be opened or any item fails
    /// verification.
    pub fn test(&mut self, archive: impl AsRef<Path>) -> Result<ExtractionReport> {
        self.run(archive.as_ref(), Destination::None, None, true)
    }

    /// Extracts the item at `index` into memory.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `index` is out of range or names a
    /// directory, and the usual extraction errors otherwise.
    pub fn extract_to_buffer(&mut self, archive: impl AsRef<Path>, index: u32) -> Result<Vec<u8>> {
        let archive_path = archive.as_ref();
        let in_archive = open_archive(self.library, self.format, archive_path, &mut self.callbacks)?;

        let count = in_archive.item_count().map_err(|_| BitError::ItemCount)?;
        if index >= count {
            return Err(BitError::invalid(format!(
                "item index {index} is out of range ({count} items)"
            )));
        }
        if in_archive.item_property(index, PropertyId::IsDir) == Ok(PropVariant::Bool(true)) {
            return Err(BitError::invalid(format!("item {index} is a directory")));
        }

        let buffer = OutputSink::memory();
        let mut session = ExtractionSession::new(
            in_archive.as_ref(),
            archive_path,
            Destination::Buffer(buffer.clone()),
            &mut self.callbacks,
        );
        let status = in_archive.extract(Some(std::slice::from_ref(&index)), false, &mut session);
        session.finish(status)?;
        Ok(buffer.take_buffer())
    }

    fn run(
        &mut self,
        archive_path: &Path,
        destination: Destination,
        indices: Option<&[u32]>,
        test_mode: bool,
    ) -> Result<ExtractionReport> {
        info!(
            archive = %archive_path.display(),
            format = %self.format,
            test_mode,
            "starting extraction"
        );
        let in_archive = open_archive(self.library, self.format, archive_path, &mut self.callbacks)?;

        let mut session = ExtractionSession::new(
            in_archive.as_ref(),
            archive_path,
            destination,
            &mut self.callbacks,
        );
        let status = in_archive.extract(indices, test_mode, &mut session);
        if let Err(status) = status {
            warn!(%status, "engine reported failure");
        }
        session.finish(status)
    }
}
