//! In-memory engine for tests and benches, built with the `test-utils` feature.
//!
//! [`MemoryEngine`] follows the same callback contract as a real engine:
//! one `set_total`, then per item `get_stream`, `prepare_operation`, data
//! writes, progress, and `set_operation_result`. A failing `get_stream`
//! skips the rest of that item and moves on to the next one.
//!
//! # Panics
//!
//! Builders in this module may panic on misuse since they are designed for
//! test use only where panics are acceptable.

#![allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::cast_possible_truncation
)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::SystemTime;

use crate::engine::AskMode;
use crate::engine::Engine;
use crate::engine::ExtractCallback;
use crate::engine::InArchive;
use crate::engine::OperationResult;
use crate::engine::OutArchive;
use crate::engine::PasswordCallback;
use crate::engine::PropVariant;
use crate::engine::PropertyId;
use crate::engine::PropertyReader;
use crate::engine::SetProperties;
use crate::engine::Status;
use crate::engine::StatusResult;
use crate::engine::variant::system_time_to_filetime;
use crate::formats::ArchiveFormat;

/// Property lists installed on output archives, one entry per install call.
pub type InstalledProperties = Rc<RefCell<Vec<Vec<(String, PropVariant)>>>>;

/// One item of a [`MemoryArchive`].
///
/// # Examples
///
/// ```
/// use bitarc_core::engine::OperationResult;
/// use bitarc_core::test_utils::MemoryItem;
///
/// let item = MemoryItem::file("notes.txt", b"hello")
///     .with_attributes(0x20)
///     .with_result(OperationResult::CrcError);
/// assert_eq!(item.data(), b"hello");
/// ```
#[derive(Debug, Clone)]
pub struct MemoryItem {
    properties: BTreeMap<PropertyId, PropVariant>,
    failing: BTreeSet<PropertyId>,
    data: Vec<u8>,
    result: OperationResult,
}

impl MemoryItem {
    /// A regular file holding `data`.
    #[must_use]
    pub fn file(path: &str, data: &[u8]) -> Self {
        Self::nameless(data)
            .with_property(PropertyId::Path, path)
            .with_property(PropertyId::IsDir, false)
    }

    /// A directory.
    #[must_use]
    pub fn directory(path: &str) -> Self {
        Self {
            properties: BTreeMap::new(),
            failing: BTreeSet::new(),
            data: Vec::new(),
            result: OperationResult::Ok,
        }
        .with_property(PropertyId::Path, path)
        .with_property(PropertyId::IsDir, true)
    }

    /// A stream without a path, as found in single-stream formats.
    #[must_use]
    pub fn nameless(data: &[u8]) -> Self {
        Self {
            properties: BTreeMap::new(),
            failing: BTreeSet::new(),
            data: data.to_vec(),
            result: OperationResult::Ok,
        }
        .with_property(PropertyId::Size, data.len() as u64)
    }

    /// Sets (or overrides) a reported property.
    #[must_use]
    pub fn with_property(mut self, id: PropertyId, value: impl Into<PropVariant>) -> Self {
        self.properties.insert(id, value.into());
        self
    }

    /// Stops reporting a property.
    #[must_use]
    pub fn without_property(mut self, id: PropertyId) -> Self {
        self.properties.remove(&id);
        self
    }

    /// Makes reads of `id` fail.
    #[must_use]
    pub fn failing_property(mut self, id: PropertyId) -> Self {
        self.failing.insert(id);
        self
    }

    /// Sets the packed size.
    #[must_use]
    pub fn with_pack_size(self, size: u64) -> Self {
        self.with_property(PropertyId::PackSize, size)
    }

    /// Sets the attribute word.
    #[must_use]
    pub fn with_attributes(self, attrib: u32) -> Self {
        self.with_property(PropertyId::Attrib, attrib)
    }

    /// Sets the modification time.
    #[must_use]
    pub fn with_modified(self, time: SystemTime) -> Self {
        self.with_property(
            PropertyId::MTime,
            PropVariant::FileTime(system_time_to_filetime(time)),
        )
    }

    /// Marks the item's data as encrypted.
    #[must_use]
    pub fn encrypted(self) -> Self {
        self.with_property(PropertyId::Encrypted, true)
    }

    /// Sets the result the engine reports at the item's close.
    #[must_use]
    pub fn with_result(mut self, result: OperationResult) -> Self {
        self.result = result;
        self
    }

    /// The item's content.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn is_encrypted(&self) -> bool {
        self.properties.get(&PropertyId::Encrypted) == Some(&PropVariant::Bool(true))
    }

    fn pack_size(&self) -> u64 {
        self.properties
            .get(&PropertyId::PackSize)
            .and_then(PropVariant::as_u64)
            .unwrap_or(self.data.len() as u64)
    }
}

/// An archive held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    items: Vec<MemoryItem>,
    archive_properties: BTreeMap<PropertyId, PropVariant>,
    password: Option<String>,
    header_password: Option<String>,
    failing_item_count: bool,
    solid: bool,
}

impl MemoryArchive {
    /// Creates an archive from `items`.
    #[must_use]
    pub fn new(items: Vec<MemoryItem>) -> Self {
        Self {
            items,
            ..Self::default()
        }
    }

    /// Reports an archive-level property.
    #[must_use]
    pub fn with_archive_property(mut self, id: PropertyId, value: impl Into<PropVariant>) -> Self {
        self.archive_properties.insert(id, value.into());
        self
    }

    /// Password that decrypts encrypted items.
    #[must_use]
    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    /// Requires `password` to open the archive at all.
    #[must_use]
    pub fn with_encrypted_headers(mut self, password: &str) -> Self {
        self.header_password = Some(password.to_string());
        self
    }

    /// Makes the item count read fail.
    #[must_use]
    pub fn failing_item_count(mut self) -> Self {
        self.failing_item_count = true;
        self
    }

    /// Enumerates unselected items in skip mode, as solid archives do.
    #[must_use]
    pub fn solid(mut self) -> Self {
        self.solid = true;
        self
    }

    fn item(&self, index: u32) -> StatusResult<&MemoryItem> {
        self.items
            .get(index as usize)
            .ok_or(Status::InvalidArgument)
    }

    fn plan(&self, indices: Option<&[u32]>, test_mode: bool) -> Vec<(u32, AskMode)> {
        let active = if test_mode {
            AskMode::Test
        } else {
            AskMode::Extract
        };
        let Some(indices) = indices else {
            return (0..self.items.len() as u32).map(|i| (i, active)).collect();
        };
        if !self.solid {
            return indices.iter().map(|&i| (i, active)).collect();
        }
        (0..self.items.len() as u32)
            .map(|i| {
                let mode = if indices.contains(&i) {
                    active
                } else {
                    AskMode::Skip
                };
                (i, mode)
            })
            .collect()
    }
}

impl PropertyReader for MemoryArchive {
    fn item_count(&self) -> StatusResult<u32> {
        if self.failing_item_count {
            return Err(Status::Fail);
        }
        Ok(self.items.len() as u32)
    }

    fn archive_property(&self, id: PropertyId) -> StatusResult<PropVariant> {
        Ok(self.archive_properties.get(&id).cloned().unwrap_or_default())
    }

    fn item_property(&self, index: u32, id: PropertyId) -> StatusResult<PropVariant> {
        let item = self.item(index)?;
        if item.failing.contains(&id) {
            return Err(Status::Fail);
        }
        Ok(item.properties.get(&id).cloned().unwrap_or_default())
    }
}

impl InArchive for MemoryArchive {
    fn extract(
        &self,
        indices: Option<&[u32]>,
        test_mode: bool,
        callback: &mut dyn ExtractCallback,
    ) -> StatusResult {
        let plan = self.plan(indices, test_mode);
        let mut total = 0_u64;
        for &(index, _) in &plan {
            total += self.item(index)?.data.len() as u64;
        }
        callback.set_total(total)?;

        let mut first_error: StatusResult = Ok(());
        let mut password: Option<String> = None;
        let mut completed = 0_u64;
        let mut packed = 0_u64;

        for (index, mode) in plan {
            let item = self.item(index)?;

            if mode != AskMode::Skip && item.is_encrypted() && password.is_none() {
                password = Some(callback.crypto_get_text_password()?);
            }

            let stream = match callback.get_stream(index, mode) {
                Ok(stream) => stream,
                Err(status) => {
                    first_error = first_error.and(Err(status));
                    continue;
                }
            };
            callback.prepare_operation(mode)?;

            let mut result = item.result;
            if mode != AskMode::Skip
                && item.is_encrypted()
                && password.as_deref() != self.password.as_deref()
            {
                result = OperationResult::DataError;
            }

            if let Some(mut stream) = stream
                && stream.write_all(&item.data).and_then(|()| stream.flush()).is_err()
            {
                first_error = first_error.and(Err(Status::Fail));
            }

            if mode != AskMode::Skip {
                completed += item.data.len() as u64;
                packed += item.pack_size();
                callback.set_completed(Some(completed))?;
                callback.set_ratio_info(Some(packed), Some(completed))?;
            }

            if let Err(status) = callback.set_operation_result(result) {
                first_error = first_error.and(Err(status));
            }
        }
        first_error
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum SetterBehavior {
    #[default]
    Accept,
    Missing,
    Reject,
}

/// Output archive that records every property install.
#[derive(Debug)]
pub struct RecordingOutArchive {
    format: ArchiveFormat,
    behavior: SetterBehavior,
    installed: InstalledProperties,
}

impl RecordingOutArchive {
    /// Format the object was created for.
    #[must_use]
    pub fn format(&self) -> ArchiveFormat {
        self.format
    }
}

impl SetProperties for RecordingOutArchive {
    fn set_properties(&mut self, names: &[&str], values: &[PropVariant]) -> StatusResult {
        if self.behavior == SetterBehavior::Reject || names.len() != values.len() {
            return Err(Status::InvalidArgument);
        }
        let pairs = names
            .iter()
            .map(|name| (*name).to_string())
            .zip(values.iter().cloned())
            .collect();
        self.installed.borrow_mut().push(pairs);
        Ok(())
    }
}

impl OutArchive for RecordingOutArchive {
    fn property_setter(&mut self) -> Option<&mut dyn SetProperties> {
        match self.behavior {
            SetterBehavior::Missing => None,
            SetterBehavior::Accept | SetterBehavior::Reject => Some(self),
        }
    }
}

/// Engine serving [`MemoryArchive`]s registered by path.
///
/// # Examples
///
/// ```
/// use bitarc_core::Library;
/// use bitarc_core::test_utils::MemoryArchive;
/// use bitarc_core::test_utils::MemoryEngine;
/// use bitarc_core::test_utils::MemoryItem;
///
/// let engine = MemoryEngine::default()
///     .with_archive("data.7z", MemoryArchive::new(vec![MemoryItem::file("a.txt", b"a")]));
/// let library = Library::new("memory", engine);
/// assert_eq!(library.name(), "memory");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryEngine {
    archives: HashMap<PathBuf, MemoryArchive>,
    installed: InstalledProperties,
    setter: SetterBehavior,
}

impl MemoryEngine {
    /// Registers `archive` under `path`.
    #[must_use]
    pub fn with_archive(mut self, path: impl Into<PathBuf>, archive: MemoryArchive) -> Self {
        self.archives.insert(path.into(), archive);
        self
    }

    /// Output archives created from now on expose no property setter.
    #[must_use]
    pub fn without_property_setter(mut self) -> Self {
        self.setter = SetterBehavior::Missing;
        self
    }

    /// Output archives created from now on reject every property list.
    #[must_use]
    pub fn rejecting_properties(mut self) -> Self {
        self.setter = SetterBehavior::Reject;
        self
    }

    /// Shared log of installed property lists.
    #[must_use]
    pub fn installed_properties(&self) -> InstalledProperties {
        Rc::clone(&self.installed)
    }
}

impl Engine for MemoryEngine {
    fn create_out_archive(&self, format: ArchiveFormat) -> StatusResult<Box<dyn OutArchive>> {
        Ok(Box::new(RecordingOutArchive {
            format,
            behavior: self.setter,
            installed: Rc::clone(&self.installed),
        }))
    }

    fn open_archive(
        &self,
        _format: ArchiveFormat,
        path: &Path,
        callback: &mut dyn PasswordCallback,
    ) -> StatusResult<Box<dyn InArchive>> {
        let archive = self.archives.get(path).ok_or(Status::Fail)?;
        if let Some(expected) = &archive.header_password {
            let password = callback.crypto_get_text_password()?;
            if &password != expected {
                return Err(Status::Fail);
            }
        }
        Ok(Box::new(archive.clone()))
    }
}
