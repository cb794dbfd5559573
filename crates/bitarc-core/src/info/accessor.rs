//! Engine-agnostic metadata enumeration.

use std::collections::BTreeMap;

use tracing::debug;

use crate::BitError;
use crate::Result;
use crate::engine::PropVariant;
use crate::engine::PropertyId;
use crate::engine::PropertyReader;
use crate::info::ArchiveItem;

/// Reads archive and item metadata through a [`PropertyReader`].
///
/// The accessor borrows the reader and keeps no state of its own: every
/// aggregate rescans all items, so calls may be repeated in any order.
///
/// # Examples
///
/// ```
/// use bitarc_core::engine::PropertyReader;
/// use bitarc_core::info::PropertyAccessor;
///
/// fn summarize(archive: &dyn PropertyReader) -> Result<String, bitarc_core::BitError> {
///     let accessor = PropertyAccessor::new(archive);
///     Ok(format!(
///         "{} files, {} folders, {} bytes",
///         accessor.files_count()?,
///         accessor.folders_count()?,
///         accessor.size()?
///     ))
/// }
/// ```
#[derive(Debug)]
pub struct PropertyAccessor<'a, R: ?Sized> {
    reader: &'a R,
}

impl<'a, R: ?Sized + PropertyReader> PropertyAccessor<'a, R> {
    /// Wraps `reader`.
    pub fn new(reader: &'a R) -> Self {
        Self { reader }
    }

    /// Reads one archive-level property; `Empty` when absent.
    ///
    /// # Errors
    ///
    /// Returns `BitError::Property` if the engine refuses the read.
    pub fn archive_property(&self, id: PropertyId) -> Result<PropVariant> {
        self.reader.archive_property(id).map_err(|status| {
            debug!(%id, %status, "archive property read failed");
            BitError::Property(format!("could not retrieve archive property {id}"))
        })
    }

    /// Reads one item-level property; `Empty` when absent.
    ///
    /// # Errors
    ///
    /// Returns `BitError::Property` naming the index if the engine refuses
    /// the read.
    pub fn item_property(&self, index: u32, id: PropertyId) -> Result<PropVariant> {
        self.reader.item_property(index, id).map_err(|status| {
            debug!(index, %id, %status, "item property read failed");
            BitError::Property(format!(
                "could not retrieve property {id} of the item at index {index}"
            ))
        })
    }

    /// Every archive-level property the engine reports as present.
    ///
    /// # Errors
    ///
    /// Returns `BitError::Property` on the first refused read.
    pub fn archive_properties(&self) -> Result<BTreeMap<PropertyId, PropVariant>> {
        let mut properties = BTreeMap::new();
        for &id in PropertyId::ALL {
            let value = self.archive_property(id)?;
            if !value.is_empty() {
                properties.insert(id, value);
            }
        }
        Ok(properties)
    }

    /// Number of items in the archive.
    ///
    /// # Errors
    ///
    /// Returns `BitError::ItemCount` if the engine refuses the read.
    pub fn items_count(&self) -> Result<u32> {
        self.reader.item_count().map_err(|status| {
            debug!(%status, "item count read failed");
            BitError::ItemCount
        })
    }

    /// The record for the item at `index`, holding every present property.
    ///
    /// # Errors
    ///
    /// Returns `BitError::Property` on the first refused read.
    pub fn item(&self, index: u32) -> Result<ArchiveItem> {
        let mut properties = BTreeMap::new();
        for &id in PropertyId::ALL {
            let value = self.item_property(index, id)?;
            if !value.is_empty() {
                properties.insert(id, value);
            }
        }
        Ok(ArchiveItem::new(index, properties))
    }

    /// Records for all items, in index order.
    ///
    /// # Errors
    ///
    /// Returns `BitError::ItemCount` or `BitError::Property`.
    pub fn items(&self) -> Result<Vec<ArchiveItem>> {
        (0..self.items_count()?)
            .map(|index| self.item(index))
            .collect()
    }

    /// Number of items whose `IsDir` property is present and true.
    ///
    /// # Errors
    ///
    /// Returns `BitError::ItemCount` or `BitError::Property`.
    pub fn folders_count(&self) -> Result<u32> {
        let mut folders = 0;
        for index in 0..self.items_count()? {
            if self.item_property(index, PropertyId::IsDir)?.as_bool() == Some(true) {
                folders += 1;
            }
        }
        Ok(folders)
    }

    /// Number of items that are not folders.
    ///
    /// # Errors
    ///
    /// Returns `BitError::ItemCount` or `BitError::Property`.
    pub fn files_count(&self) -> Result<u32> {
        let items = self.items_count()?;
        Ok(items.saturating_sub(self.folders_count()?))
    }

    /// Sum of every item's uncompressed size, absent counting as zero.
    ///
    /// # Errors
    ///
    /// Returns `BitError::ItemCount` or `BitError::Property`.
    pub fn size(&self) -> Result<u64> {
        self.sum_of(PropertyId::Size)
    }

    /// Sum of every item's packed size, absent counting as zero.
    ///
    /// # Errors
    ///
    /// Returns `BitError::ItemCount` or `BitError::Property`.
    pub fn pack_size(&self) -> Result<u64> {
        self.sum_of(PropertyId::PackSize)
    }

    fn sum_of(&self, id: PropertyId) -> Result<u64> {
        let mut total = 0_u64;
        for index in 0..self.items_count()? {
            let value = self.item_property(index, id)?;
            total = total.saturating_add(value.as_u64().unwrap_or(0));
        }
        Ok(total)
    }
}
