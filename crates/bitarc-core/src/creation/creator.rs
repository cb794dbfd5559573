//! Output archive initialization.

use tracing::debug;

use crate::Library;
use crate::Result;
use crate::creation::ArchiveProperties;
use crate::creation::CompressionConfig;
use crate::engine::OutArchive;

/// Binds a [`CompressionConfig`] to an engine library.
///
/// The configuration is finalized once, when the engine's output archive
/// object is created, and never revisited for that object.
///
/// # Examples
///
/// ```
/// use bitarc_core::Library;
/// use bitarc_core::creation::ArchiveCreator;
/// use bitarc_core::creation::CompressionConfig;
/// use bitarc_core::formats::ArchiveFormat;
///
/// fn prepare(library: &Library) -> Result<(), bitarc_core::BitError> {
///     let config = CompressionConfig::new(ArchiveFormat::SevenZip).with_solid_mode(true);
///     let creator = ArchiveCreator::new(library, config);
///     let _out = creator.init_out_archive()?;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct ArchiveCreator<'lib> {
    library: &'lib Library,
    config: CompressionConfig,
}

impl<'lib> ArchiveCreator<'lib> {
    /// Creates a creator for `config`.
    #[must_use]
    pub fn new(library: &'lib Library, config: CompressionConfig) -> Self {
        Self { library, config }
    }

    /// The configuration that will be installed.
    #[must_use]
    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    /// Mutable access to the configuration before initialization.
    pub fn config_mut(&mut self) -> &mut CompressionConfig {
        &mut self.config
    }

    /// The property list that [`init_out_archive`](Self::init_out_archive)
    /// would install.
    #[must_use]
    pub fn properties(&self) -> ArchiveProperties {
        self.config.finalize()
    }

    /// Creates the engine's output archive object and installs the
    /// finalized properties on it.
    ///
    /// # Errors
    ///
    /// Returns an engine error if the object cannot be created and
    /// `BitError::Configuration` if the properties cannot be installed.
    pub fn init_out_archive(&self) -> Result<Box<dyn OutArchive>> {
        let format = self.config.format();
        let mut out_archive = self.library.create_out_archive(format)?;
        let props = self.config.finalize();
        props.install(out_archive.as_mut())?;
        debug!(%format, count = props.len(), "output archive initialized");
        Ok(out_archive)
    }
}
