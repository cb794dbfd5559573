//! Per-item metadata record.

use std::collections::BTreeMap;
use std::time::SystemTime;

use crate::engine::PropVariant;
use crate::engine::PropertyId;

/// All non-empty properties the engine reported for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveItem {
    index: u32,
    properties: BTreeMap<PropertyId, PropVariant>,
}

impl ArchiveItem {
    /// Creates a record for the item at `index`.
    #[must_use]
    pub fn new(index: u32, properties: BTreeMap<PropertyId, PropVariant>) -> Self {
        Self { index, properties }
    }

    /// Engine index of the item.
    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Returns a property value, if the engine reported one.
    #[must_use]
    pub fn property(&self, id: PropertyId) -> Option<&PropVariant> {
        self.properties.get(&id)
    }

    /// All reported properties, ordered by identifier.
    #[must_use]
    pub fn properties(&self) -> &BTreeMap<PropertyId, PropVariant> {
        &self.properties
    }

    /// Item path inside the archive.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.property(PropertyId::Path).and_then(PropVariant::as_str)
    }

    /// Last path component, from `Name` or derived from `Path`.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.property(PropertyId::Name)
            .and_then(PropVariant::as_str)
            .or_else(|| {
                self.path()
                    .map(|path| path.rsplit(['/', '\\']).next().unwrap_or(path))
            })
    }

    /// File extension, from `Extension` or derived from the name.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.property(PropertyId::Extension)
            .and_then(PropVariant::as_str)
            .or_else(|| {
                self.name()
                    .and_then(|name| name.rsplit_once('.'))
                    .map(|(_, ext)| ext)
            })
    }

    /// Returns `true` if `IsDir` is present and true.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.property(PropertyId::IsDir)
            .and_then(PropVariant::as_bool)
            .unwrap_or(false)
    }

    /// Uncompressed size; zero when absent.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.property(PropertyId::Size)
            .and_then(PropVariant::as_u64)
            .unwrap_or(0)
    }

    /// Packed size; zero when absent.
    #[must_use]
    pub fn pack_size(&self) -> u64 {
        self.property(PropertyId::PackSize)
            .and_then(PropVariant::as_u64)
            .unwrap_or(0)
    }

    /// CRC of the uncompressed data.
    #[must_use]
    pub fn crc(&self) -> Option<u32> {
        self.property(PropertyId::Crc).and_then(PropVariant::as_u32)
    }

    /// Returns `true` if the item's data is encrypted.
    #[must_use]
    pub fn is_encrypted(&self) -> bool {
        self.property(PropertyId::Encrypted)
            .and_then(PropVariant::as_bool)
            .unwrap_or(false)
    }

    /// Raw attribute word.
    #[must_use]
    pub fn attributes(&self) -> Option<u32> {
        self.property(PropertyId::Attrib).and_then(PropVariant::as_u32)
    }

    /// Modification time.
    #[must_use]
    pub fn modified(&self) -> Option<SystemTime> {
        self.property(PropertyId::MTime)
            .and_then(PropVariant::as_system_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(props: &[(PropertyId, PropVariant)]) -> ArchiveItem {
        ArchiveItem::new(0, props.iter().cloned().collect())
    }

    #[test]
    fn test_derived_name_and_extension() {
        let item = item(&[(PropertyId::Path, "docs/guide.tar.gz".into())]);
        assert_eq!(item.name(), Some("guide.tar.gz"));
        assert_eq!(item.extension(), Some("gz"));
    }

    #[test]
    fn test_explicit_name_wins() {
        let item = item(&[
            (PropertyId::Path, "a/b.txt".into()),
            (PropertyId::Name, "renamed.md".into()),
        ]);
        assert_eq!(item.name(), Some("renamed.md"));
        assert_eq!(item.extension(), Some("md"));
    }

    #[test]
    fn test_absent_values_default() {
        let item = item(&[]);
        assert!(!item.is_dir());
        assert_eq!(item.size(), 0);
        assert_eq!(item.pack_size(), 0);
        assert_eq!(item.path(), None);
        assert_eq!(item.crc(), None);
        assert!(!item.is_encrypted());
    }

    #[test]
    fn test_sizes_accept_both_widths() {
        let item = item(&[
            (PropertyId::Size, PropVariant::UInt64(1 << 33)),
            (PropertyId::PackSize, PropVariant::UInt32(512)),
        ]);
        assert_eq!(item.size(), 1 << 33);
        assert_eq!(item.pack_size(), 512);
    }
}
