//! Narrow capability traits describing the external archive engine.
//!
//! The engine is opaque: it exposes objects through a fixed method-dispatch
//! interface and calls back into wrapper-owned objects while it works. These
//! traits model exactly the capabilities the wrapper relies on, so the
//! validator and the property accessor never depend on the engine's concrete
//! binary layout.

use std::io::Write;
use std::path::Path;

use super::PropVariant;
use super::PropertyId;
use super::StatusResult;
use crate::formats::ArchiveFormat;

/// Operation the engine intends to perform on an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AskMode {
    /// Decompress and write the item to a sink.
    Extract,
    /// Decompress and verify without writing.
    Test,
    /// Skip the item.
    Skip,
}

impl AskMode {
    /// Maps the engine's raw mode value; unknown values are treated as `Skip`.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Extract,
            1 => Self::Test,
            _ => Self::Skip,
        }
    }
}

/// Per-item outcome reported by the engine after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationResult {
    /// The item was processed successfully.
    Ok,
    /// The item uses a method the engine cannot decode.
    UnsupportedMethod,
    /// Checksum mismatch.
    CrcError,
    /// Corrupted data.
    DataError,
    /// Any other engine code.
    Other(i32),
}

impl OperationResult {
    /// Maps the engine's raw result code.
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Ok,
            1 => Self::UnsupportedMethod,
            2 => Self::DataError,
            3 => Self::CrcError,
            other => Self::Other(other),
        }
    }

    /// Returns `true` for [`OperationResult::Ok`].
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Fixed message recorded for a failing result, `None` for `Ok`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bitarc_core::engine::OperationResult;
    ///
    /// assert_eq!(OperationResult::CrcError.message(), Some("CRC Failed"));
    /// assert_eq!(OperationResult::Other(9).message(), Some("Unknown Error"));
    /// assert_eq!(OperationResult::Ok.message(), None);
    /// ```
    #[must_use]
    pub const fn message(self) -> Option<&'static str> {
        match self {
            Self::Ok => None,
            Self::UnsupportedMethod => Some("Unsupported Method"),
            Self::CrcError => Some("CRC Failed"),
            Self::DataError => Some("Data Error"),
            Self::Other(_) => Some("Unknown Error"),
        }
    }
}

/// Read access to archive-level and item-level properties.
pub trait PropertyReader {
    /// Number of items in the archive.
    fn item_count(&self) -> StatusResult<u32>;

    /// Reads an archive-level property; `Empty` when absent.
    fn archive_property(&self, id: PropertyId) -> StatusResult<PropVariant>;

    /// Reads an item-level property; `Empty` when absent.
    fn item_property(&self, index: u32, id: PropertyId) -> StatusResult<PropVariant>;
}

/// An opened input archive.
pub trait InArchive: PropertyReader {
    /// Runs an extraction or test pass over `indices` (all items when `None`).
    ///
    /// The engine calls back into `callback` once per item and returns the
    /// first fatal status it encountered, if any. The callback reads item
    /// properties from this same archive while the pass is running.
    fn extract(
        &self,
        indices: Option<&[u32]>,
        test_mode: bool,
        callback: &mut dyn ExtractCallback,
    ) -> StatusResult;
}

/// Property installation capability of an output archive object.
pub trait SetProperties {
    /// Installs `names[i] = values[i]` for every pair in one call.
    fn set_properties(&mut self, names: &[&str], values: &[PropVariant]) -> StatusResult;
}

/// An output archive object created by the engine.
pub trait OutArchive {
    /// Returns the property-setting interface, if the object exposes one.
    fn property_setter(&mut self) -> Option<&mut dyn SetProperties>;
}

/// Password requests issued by the engine while opening or reading.
pub trait PasswordCallback {
    /// Supplies the password for the archive being processed.
    fn crypto_get_text_password(&mut self) -> StatusResult<String>;
}

/// Callback object the engine drives during an extraction or test run.
///
/// Every method returns a status; implementations must never panic.
pub trait ExtractCallback: PasswordCallback {
    /// Announces the total amount of work.
    fn set_total(&mut self, total: u64) -> StatusResult;

    /// Announces completed work.
    fn set_completed(&mut self, completed: Option<u64>) -> StatusResult;

    /// Announces packed/unpacked sizes processed so far.
    fn set_ratio_info(&mut self, in_size: Option<u64>, out_size: Option<u64>) -> StatusResult;

    /// Requests an output sink for the item at `index`.
    ///
    /// `Ok(None)` tells the engine no bytes should be written for this item.
    fn get_stream(&mut self, index: u32, mode: AskMode) -> StatusResult<Option<Box<dyn Write>>>;

    /// Announces the operation about to be performed on the current item.
    fn prepare_operation(&mut self, mode: AskMode) -> StatusResult;

    /// Reports the outcome for the current item.
    fn set_operation_result(&mut self, result: OperationResult) -> StatusResult;
}

/// The engine's object factory.
pub trait Engine {
    /// Creates an output archive object for `format`.
    fn create_out_archive(&self, format: ArchiveFormat) -> StatusResult<Box<dyn OutArchive>>;

    /// Opens the archive at `path` as `format`.
    fn open_archive(
        &self,
        format: ArchiveFormat,
        path: &Path,
        callback: &mut dyn PasswordCallback,
    ) -> StatusResult<Box<dyn InArchive>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_mode_from_code() {
        assert_eq!(AskMode::from_code(0), AskMode::Extract);
        assert_eq!(AskMode::from_code(1), AskMode::Test);
        assert_eq!(AskMode::from_code(2), AskMode::Skip);
        assert_eq!(AskMode::from_code(77), AskMode::Skip);
    }

    #[test]
    fn test_operation_result_from_code() {
        assert_eq!(OperationResult::from_code(0), OperationResult::Ok);
        assert_eq!(
            OperationResult::from_code(1),
            OperationResult::UnsupportedMethod
        );
        assert_eq!(OperationResult::from_code(2), OperationResult::DataError);
        assert_eq!(OperationResult::from_code(3), OperationResult::CrcError);
        assert_eq!(OperationResult::from_code(5), OperationResult::Other(5));
    }

    #[test]
    fn test_operation_result_messages() {
        assert_eq!(
            OperationResult::UnsupportedMethod.message(),
            Some("Unsupported Method")
        );
        assert_eq!(OperationResult::DataError.message(), Some("Data Error"));
        assert!(OperationResult::Ok.is_ok());
        assert!(!OperationResult::DataError.is_ok());
    }
}
