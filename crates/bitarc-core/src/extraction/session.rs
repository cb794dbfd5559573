//! Engine-facing extraction callback.
//!
//! [`ExtractionSession`] implements [`ExtractCallback`]: the engine drives it
//! through a Start / Prepare / Close cycle per item. Every entry point
//! returns a [`StatusResult`]; failures are recorded on the session and
//! converted into a [`BitError`] by [`ExtractionSession::finish`] once the
//! engine has returned.

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;
use std::time::SystemTime;

use tracing::debug;
use tracing::info;
use tracing::trace;
use tracing::warn;

use crate::BitError;
use crate::ExtractionReport;
use crate::Result;
use crate::engine::AskMode;
use crate::engine::ExtractCallback;
use crate::engine::InArchive;
use crate::engine::OperationResult;
use crate::engine::PasswordCallback;
use crate::engine::PropVariant;
use crate::engine::PropertyId;
use crate::engine::Status;
use crate::engine::StatusResult;
use crate::engine::variant::filetime_to_system_time;
use crate::extraction::Callbacks;
use crate::extraction::OutputSink;
use crate::extraction::attributes::restore_attributes;
use crate::types::DestDir;
use crate::types::relative_item_path;

/// Name used for a nameless item when the archive path is unknown.
pub const EMPTY_FILE_ALIAS: &str = "[Content]";

/// Where extracted bytes go.
#[derive(Debug)]
pub enum Destination {
    /// Items are materialized under a directory.
    Directory(DestDir),
    /// File items are appended to one in-memory sink.
    Buffer(OutputSink),
    /// Nothing is materialized (test runs).
    None,
}

/// Metadata captured for the item currently being processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemInfo {
    /// Engine item index.
    pub index: u32,
    /// Item path as reported, or the fallback name.
    pub path: String,
    /// Whether the item is a directory.
    pub is_dir: bool,
    /// Raw attribute word, if reported.
    pub attributes: Option<u32>,
    /// Modification time in FILETIME ticks, if reported.
    pub modified: Option<u64>,
    /// Destination on disk, once computed.
    pub destination: Option<PathBuf>,
}

/// Per-run state of an extraction or test pass.
///
/// At most one sink is open at a time: it is opened at Start and closed at
/// Close of the same item.
pub struct ExtractionSession<'a> {
    archive: &'a dyn InArchive,
    archive_path: PathBuf,
    destination: Destination,
    callbacks: &'a mut Callbacks,
    mode: AskMode,
    current: Option<ItemInfo>,
    sink: Option<OutputSink>,
    errors: usize,
    error_message: Option<String>,
    password_missing: bool,
    report: ExtractionReport,
    started: Instant,
}

impl<'a> ExtractionSession<'a> {
    /// Creates a session reading item properties from `archive`.
    ///
    /// `archive_path` is only used to name nameless items; pass an empty path
    /// when the archive was not opened from a file.
    pub fn new(
        archive: &'a dyn InArchive,
        archive_path: impl Into<PathBuf>,
        destination: Destination,
        callbacks: &'a mut Callbacks,
    ) -> Self {
        Self {
            archive,
            archive_path: archive_path.into(),
            destination,
            callbacks,
            mode: AskMode::Extract,
            current: None,
            sink: None,
            errors: 0,
            error_message: None,
            password_missing: false,
            report: ExtractionReport::new(),
            started: Instant::now(),
        }
    }

    /// Number of failed items so far.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors
    }

    /// Message of the last failure, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// The item between its Start and Close steps.
    #[must_use]
    pub fn current_item(&self) -> Option<&ItemInfo> {
        self.current.as_ref()
    }

    /// Counters collected so far.
    #[must_use]
    pub fn report(&self) -> &ExtractionReport {
        &self.report
    }

    /// Converts the engine's overall status and the recorded failures into
    /// the run's outcome.
    ///
    /// # Errors
    ///
    /// - `PasswordNotDefined` if a password was requested and none was available
    /// - `Extraction` if any item failed, carrying the last message
    /// - `Engine` if the engine failed without a recorded item failure
    pub fn finish(mut self, engine_status: StatusResult) -> Result<ExtractionReport> {
        self.release_sink();
        self.report.duration = self.started.elapsed();

        if self.password_missing {
            return Err(BitError::PasswordNotDefined);
        }
        if self.errors > 0 {
            let message = self.error_message.unwrap_or_default();
            warn!(errors = self.errors, %message, "extraction finished with errors");
            return Err(BitError::Extraction {
                errors: self.errors,
                message,
            });
        }
        if let Err(status) = engine_status {
            return Err(BitError::Engine {
                operation: "extract the archive",
                status,
            });
        }

        info!(
            files = self.report.files_extracted,
            directories = self.report.directories_created,
            tested = self.report.items_tested,
            bytes = self.report.bytes_written,
            "extraction finished"
        );
        Ok(self.report)
    }

    fn record_failure(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(
            index = self.current.as_ref().map(|item| item.index),
            %message,
            "item failed"
        );
        self.errors += 1;
        self.report.items_failed += 1;
        self.error_message = Some(message);
    }

    fn release_sink(&mut self) {
        if let Some(sink) = self.sink.take() {
            let _ = sink.close(None);
        }
    }

    /// Name for a nameless item: the archive's file name without its last
    /// extension, so `notes.txt.gz` yields `notes.txt`.
    fn fallback_name(&self) -> String {
        self.archive_path
            .file_stem()
            .filter(|stem| !stem.is_empty())
            .map_or_else(
                || EMPTY_FILE_ALIAS.to_string(),
                |stem| stem.to_string_lossy().into_owned(),
            )
    }

    fn unexpected_type(&mut self, index: u32, id: PropertyId, value: &PropVariant) -> Status {
        self.record_failure(format!(
            "Unexpected {:?} value for property {id} of item {index}",
            value.variant_type()
        ));
        Status::Fail
    }

    fn item_path(&mut self, index: u32) -> StatusResult<String> {
        match self.archive.item_property(index, PropertyId::Path)? {
            PropVariant::Empty => Ok(self.fallback_name()),
            PropVariant::String(path) if path.is_empty() => Ok(self.fallback_name()),
            PropVariant::String(path) => Ok(path),
            other => Err(self.unexpected_type(index, PropertyId::Path, &other)),
        }
    }

    fn item_attributes(&mut self, index: u32) -> StatusResult<Option<u32>> {
        match self.archive.item_property(index, PropertyId::Attrib)? {
            PropVariant::Empty => Ok(None),
            PropVariant::UInt32(attrib) => Ok(Some(attrib)),
            other => Err(self.unexpected_type(index, PropertyId::Attrib, &other)),
        }
    }

    fn item_is_dir(&mut self, index: u32) -> StatusResult<bool> {
        match self.archive.item_property(index, PropertyId::IsDir)? {
            PropVariant::Empty => Ok(false),
            PropVariant::Bool(is_dir) => Ok(is_dir),
            other => Err(self.unexpected_type(index, PropertyId::IsDir, &other)),
        }
    }

    fn item_modified(&mut self, index: u32) -> StatusResult<Option<u64>> {
        match self.archive.item_property(index, PropertyId::MTime)? {
            PropVariant::Empty => Ok(None),
            PropVariant::FileTime(ticks) => Ok(Some(ticks)),
            other => Err(self.unexpected_type(index, PropertyId::MTime, &other)),
        }
    }

    fn open_directory_item(&mut self, item: &mut ItemInfo, dest: &Path) -> StatusResult<()> {
        std::fs::create_dir_all(dest).map_err(|e| {
            self.record_failure(format!("Cannot create directory {}: {e}", dest.display()));
            Status::Abort
        })?;
        item.destination = Some(dest.to_path_buf());
        Ok(())
    }

    fn open_file_item(&mut self, dest: &Path) -> StatusResult<OutputSink> {
        if let Some(parent) = dest.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            self.record_failure(format!(
                "Cannot create directory {}: {e}",
                parent.display()
            ));
            return Err(Status::Abort);
        }

        let file_name = dest
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if let Err(message) = self.callbacks.notify_file(&file_name) {
            self.record_failure(message);
            return Err(Status::Fail);
        }

        if std::fs::symlink_metadata(dest).is_ok() && std::fs::remove_file(dest).is_err() {
            self.record_failure(format!("Cannot delete output file {}", dest.display()));
            return Err(Status::Abort);
        }

        OutputSink::create(dest).map_err(|e| {
            debug!(path = %dest.display(), error = %e, "cannot open sink");
            self.record_failure(format!("Cannot open output file {}", dest.display()));
            Status::Abort
        })
    }

    fn close_item(&mut self, result: OperationResult) -> StatusResult {
        let item = self.current.take();
        let failure = result.message();
        if let Some(message) = failure {
            self.record_failure(message);
        }

        let mut close_failed = false;
        if let Some(sink) = self.sink.take() {
            let modified = item
                .as_ref()
                .and_then(|item| item.modified)
                .map(filetime_to_system_time);
            close_failed = self.close_sink(&sink, modified, failure.is_none());
        }

        if failure.is_some() || close_failed {
            return Err(Status::Fail);
        }

        if self.mode == AskMode::Extract
            && let Some(item) = &item
            && let (Some(attrib), Some(path)) = (item.attributes, &item.destination)
            && let Err(e) = restore_attributes(path, attrib)
        {
            warn!(path = %path.display(), error = %e, "cannot restore attributes");
            self.report
                .add_warning(format!("cannot restore attributes of {}: {e}", path.display()));
        }

        self.count_item(item.as_ref());
        Ok(())
    }

    /// Closes `sink`, returning `true` if closing failed. The failure is
    /// recorded only when the item has not already failed.
    fn close_sink(
        &mut self,
        sink: &OutputSink,
        modified: Option<SystemTime>,
        record: bool,
    ) -> bool {
        self.report.bytes_written += sink.bytes_written();
        match sink.close(modified) {
            Ok(()) => false,
            Err(e) => {
                let path = sink.path().unwrap_or_default();
                let message = format!("Cannot close output file {}: {e}", path.display());
                if record {
                    self.record_failure(message);
                } else {
                    debug!(%message, "close failed on an item that already failed");
                }
                true
            }
        }
    }

    fn count_item(&mut self, item: Option<&ItemInfo>) {
        match self.mode {
            AskMode::Extract => match item {
                Some(item) if item.is_dir => self.report.directories_created += 1,
                Some(_) => self.report.files_extracted += 1,
                None => {}
            },
            AskMode::Test => self.report.items_tested += 1,
            AskMode::Skip => self.report.items_skipped += 1,
        }
    }
}

impl PasswordCallback for ExtractionSession<'_> {
    fn crypto_get_text_password(&mut self) -> StatusResult<String> {
        match self.callbacks.resolve_password() {
            Ok(password) if !password.is_empty() => Ok(password),
            Ok(_) => {
                warn!("archive is encrypted and no password is defined");
                self.password_missing = true;
                self.error_message = Some("Password is not defined".to_string());
                Err(Status::Fail)
            }
            Err(message) => {
                self.record_failure(message);
                Err(Status::Fail)
            }
        }
    }
}

impl ExtractCallback for ExtractionSession<'_> {
    fn set_total(&mut self, total: u64) -> StatusResult {
        trace!(total, "total announced");
        self.callbacks.notify_total(total).map_err(|message| {
            self.record_failure(message);
            Status::Fail
        })
    }

    fn set_completed(&mut self, completed: Option<u64>) -> StatusResult {
        let Some(completed) = completed else {
            return Ok(());
        };
        trace!(completed, "progress");
        self.callbacks.notify_progress(completed).map_err(|message| {
            self.record_failure(message);
            Status::Fail
        })
    }

    fn set_ratio_info(&mut self, in_size: Option<u64>, out_size: Option<u64>) -> StatusResult {
        let (Some(in_size), Some(out_size)) = (in_size, out_size) else {
            return Ok(());
        };
        self.callbacks.notify_ratio(in_size, out_size).map_err(|message| {
            self.record_failure(message);
            Status::Fail
        })
    }

    fn get_stream(&mut self, index: u32, mode: AskMode) -> StatusResult<Option<Box<dyn Write>>> {
        self.release_sink();
        self.current = None;

        let path = self.item_path(index)?;
        debug!(index, %path, ?mode, "item start");
        let mut item = ItemInfo {
            index,
            path,
            is_dir: false,
            attributes: None,
            modified: None,
            destination: None,
        };

        if mode != AskMode::Extract {
            self.current = Some(item);
            return Ok(None);
        }

        item.attributes = self.item_attributes(index)?;
        item.is_dir = self.item_is_dir(index)?;
        item.modified = self.item_modified(index)?;

        let dest = match &self.destination {
            Destination::Directory(dir) => {
                let relative = relative_item_path(&item.path);
                if relative.as_os_str().is_empty() {
                    dir.as_path().join(self.fallback_name())
                } else {
                    dir.as_path().join(relative)
                }
            }
            Destination::Buffer(buffer) => {
                let writer = (!item.is_dir).then(|| buffer.writer());
                self.current = Some(item);
                return Ok(writer);
            }
            Destination::None => {
                self.current = Some(item);
                return Ok(None);
            }
        };

        if item.is_dir {
            let opened = self.open_directory_item(&mut item, &dest);
            self.current = Some(item);
            return opened.map(|()| None);
        }

        item.destination = Some(dest.clone());
        self.current = Some(item);
        let sink = self.open_file_item(&dest)?;
        let writer = sink.writer();
        self.sink = Some(sink);
        Ok(Some(writer))
    }

    fn prepare_operation(&mut self, mode: AskMode) -> StatusResult {
        debug!(?mode, "item prepare");
        self.mode = mode;
        Ok(())
    }

    fn set_operation_result(&mut self, result: OperationResult) -> StatusResult {
        debug!(?result, "item close");
        if let Destination::Buffer(buffer) = &self.destination
            && self.mode == AskMode::Extract
        {
            self.report.bytes_written = buffer.bytes_written();
        }
        self.close_item(result)
    }
}

impl std::fmt::Debug for ExtractionSession<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionSession")
            .field("archive_path", &self.archive_path)
            .field("destination", &self.destination)
            .field("mode", &self.mode)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}
