//! Finalized property list handed to the engine's output archive object.

use tracing::debug;
use tracing::warn;

use crate::BitError;
use crate::Result;
use crate::engine::OutArchive;
use crate::engine::PropVariant;

/// One `(name, value)` pair in a finalized property list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveProperty {
    /// Engine property name (`he`, `x`, `0`, `m`, `s`, `0d`, ...).
    pub name: &'static str,
    /// Property value.
    pub value: PropVariant,
}

/// Ordered, immutable list of properties produced by
/// [`CompressionConfig::finalize`](super::CompressionConfig::finalize).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArchiveProperties {
    entries: Vec<ArchiveProperty>,
}

impl ArchiveProperties {
    pub(crate) fn push(&mut self, name: &'static str, value: impl Into<PropVariant>) {
        self.entries.push(ArchiveProperty {
            name,
            value: value.into(),
        });
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no property applies to the configuration.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Property names, in installation order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|p| p.name).collect()
    }

    /// Looks up a property value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropVariant> {
        self.entries
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }

    /// Iterates over the properties in installation order.
    pub fn iter(&self) -> std::slice::Iter<'_, ArchiveProperty> {
        self.entries.iter()
    }

    /// Installs the whole list on `out_archive` in a single call.
    ///
    /// An empty list installs nothing and always succeeds.
    ///
    /// # Errors
    ///
    /// Returns `BitError::Configuration` if the object exposes no
    /// property-setting interface or the engine rejects the list. Neither is
    /// retried.
    pub fn install(&self, out_archive: &mut dyn OutArchive) -> Result<()> {
        if self.entries.is_empty() {
            return Ok(());
        }

        let Some(setter) = out_archive.property_setter() else {
            warn!("output archive exposes no property-setting interface");
            return Err(BitError::Configuration(
                "property setting unsupported".to_string(),
            ));
        };

        let names = self.names();
        let values: Vec<PropVariant> = self.entries.iter().map(|p| p.value.clone()).collect();
        setter.set_properties(&names, &values).map_err(|status| {
            warn!(%status, "engine rejected archive properties");
            BitError::Configuration("cannot set properties of the archive".to_string())
        })?;

        debug!(properties = ?names, "archive properties installed");
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ArchiveProperties {
    type Item = &'a ArchiveProperty;
    type IntoIter = std::slice::Iter<'a, ArchiveProperty>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
