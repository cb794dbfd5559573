//! Compression configuration for archive creation.

use tracing::debug;

use crate::BitError;
use crate::Result;
use crate::creation::ArchiveProperties;
use crate::creation::CompressionLevel;
use crate::creation::CompressionMethod;
use crate::creation::is_valid_dictionary_size;
use crate::creation::is_valid_method;
use crate::formats::ArchiveFormat;
use crate::formats::FormatFeatures;

/// Validated compression settings for one archive-creation session.
///
/// The target format is fixed at construction; every other field starts
/// from a format-derived default and changes only through validated setters.
/// [`finalize`](Self::finalize) turns the configuration into the ordered
/// property list the engine consumes.
///
/// Not designed for concurrent mutation; use one instance per session.
///
/// # Examples
///
/// ```
/// use bitarc_core::creation::CompressionConfig;
/// use bitarc_core::creation::CompressionLevel;
/// use bitarc_core::creation::CompressionMethod;
/// use bitarc_core::formats::ArchiveFormat;
///
/// # fn main() -> Result<(), bitarc_core::BitError> {
/// let mut config = CompressionConfig::new(ArchiveFormat::SevenZip);
/// config.set_compression_method(CompressionMethod::Lzma)?;
/// config.set_dictionary_size(64 * 1024 * 1024)?;
/// config.set_compression_level(CompressionLevel::Ultra);
///
/// let props = config.finalize();
/// assert_eq!(props.names(), vec!["x", "0", "s", "0d"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionConfig {
    format: ArchiveFormat,
    level: CompressionLevel,
    method: CompressionMethod,
    dictionary_size: u32,
    solid_mode: bool,
    crypt_headers: bool,
    password: String,
    update_mode: bool,
    volume_size: u64,
}

impl CompressionConfig {
    /// Creates a configuration with the defaults for `format`.
    ///
    /// Defaults: normal level, the format's default method, engine-default
    /// dictionary, no solid mode, no password, single volume.
    #[must_use]
    pub fn new(format: ArchiveFormat) -> Self {
        Self {
            format,
            level: CompressionLevel::Normal,
            method: format.default_method(),
            dictionary_size: 0,
            solid_mode: false,
            crypt_headers: false,
            password: String::new(),
            update_mode: false,
            volume_size: 0,
        }
    }

    /// Target container format.
    #[must_use]
    pub fn format(&self) -> ArchiveFormat {
        self.format
    }

    /// Current compression level.
    #[must_use]
    pub fn compression_level(&self) -> CompressionLevel {
        self.level
    }

    /// Current compression method.
    #[must_use]
    pub fn compression_method(&self) -> CompressionMethod {
        self.method
    }

    /// Dictionary size in bytes; `0` means the engine default.
    #[must_use]
    pub fn dictionary_size(&self) -> u32 {
        self.dictionary_size
    }

    /// Whether solid mode was requested.
    #[must_use]
    pub fn solid_mode(&self) -> bool {
        self.solid_mode
    }

    /// Whether header encryption is in effect.
    #[must_use]
    pub fn crypt_headers(&self) -> bool {
        self.crypt_headers
    }

    /// Archive password; empty when none is set.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns `true` if a non-empty password is set.
    #[must_use]
    pub fn is_password_defined(&self) -> bool {
        !self.password.is_empty()
    }

    /// Whether an existing archive should be updated instead of replaced.
    #[must_use]
    pub fn update_mode(&self) -> bool {
        self.update_mode
    }

    /// Target volume size in bytes; `0` means a single volume.
    #[must_use]
    pub fn volume_size(&self) -> u64 {
        self.volume_size
    }

    /// Sets the compression level.
    pub fn set_compression_level(&mut self, level: CompressionLevel) {
        self.level = level;
    }

    /// Sets the compression method.
    ///
    /// If the format carries a single method, a valid call leaves the
    /// method at the format's default and is otherwise a no-op. Every
    /// accepted change resets the dictionary size to the engine default.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the format cannot carry `method`.
    pub fn set_compression_method(&mut self, method: CompressionMethod) -> Result<()> {
        if !is_valid_method(self.format, method) {
            return Err(BitError::invalid(format!(
                "compression method {method} is not valid for the {} format",
                self.format
            )));
        }
        if self.format.has_feature(FormatFeatures::MULTIPLE_METHODS) {
            self.method = method;
            self.dictionary_size = 0;
        } else {
            debug!(format = %self.format, %method, "format has a single method, keeping default");
        }
        Ok(())
    }

    /// Sets the dictionary size in bytes for the current method.
    ///
    /// For Copy, Deflate and Deflate64 the dictionary is implied by the
    /// method: a legal value is accepted but not stored.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `size` is illegal for the current
    /// method.
    pub fn set_dictionary_size(&mut self, size: u32) -> Result<()> {
        if !is_valid_dictionary_size(self.method, size) {
            return Err(BitError::invalid(format!(
                "dictionary size {size} is not valid for the {} method",
                self.method
            )));
        }
        if !self.method.has_fixed_dictionary() {
            self.dictionary_size = size;
        }
        Ok(())
    }

    /// Sets the password and whether archive headers are encrypted too.
    ///
    /// Header encryption only takes effect with a non-empty password.
    pub fn set_password(&mut self, password: impl Into<String>, crypt_headers: bool) {
        self.password = password.into();
        self.crypt_headers = crypt_headers && !self.password.is_empty();
    }

    /// Sets the password, keeping the current header-encryption request.
    pub fn set_password_keep_headers(&mut self, password: impl Into<String>) {
        let crypt_headers = self.crypt_headers;
        self.set_password(password, crypt_headers);
    }

    /// Sets solid mode.
    pub fn set_solid_mode(&mut self, solid_mode: bool) {
        self.solid_mode = solid_mode;
    }

    /// Sets update mode.
    pub fn set_update_mode(&mut self, update_mode: bool) {
        self.update_mode = update_mode;
    }

    /// Sets the target volume size in bytes.
    pub fn set_volume_size(&mut self, size: u64) {
        self.volume_size = size;
    }

    /// Builder form of [`set_compression_level`](Self::set_compression_level).
    #[must_use]
    pub fn with_compression_level(mut self, level: CompressionLevel) -> Self {
        self.set_compression_level(level);
        self
    }

    /// Builder form of [`set_compression_method`](Self::set_compression_method).
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the format cannot carry `method`.
    pub fn with_compression_method(mut self, method: CompressionMethod) -> Result<Self> {
        self.set_compression_method(method)?;
        Ok(self)
    }

    /// Builder form of [`set_dictionary_size`](Self::set_dictionary_size).
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `size` is illegal for the method.
    pub fn with_dictionary_size(mut self, size: u32) -> Result<Self> {
        self.set_dictionary_size(size)?;
        Ok(self)
    }

    /// Builder form of [`set_password`](Self::set_password).
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>, crypt_headers: bool) -> Self {
        self.set_password(password, crypt_headers);
        self
    }

    /// Builder form of [`set_solid_mode`](Self::set_solid_mode).
    #[must_use]
    pub fn with_solid_mode(mut self, solid_mode: bool) -> Self {
        self.set_solid_mode(solid_mode);
        self
    }

    /// Builder form of [`set_volume_size`](Self::set_volume_size).
    #[must_use]
    pub fn with_volume_size(mut self, size: u64) -> Self {
        self.set_volume_size(size);
        self
    }

    /// Builder form of [`set_update_mode`](Self::set_update_mode).
    #[must_use]
    pub fn with_update_mode(mut self, update_mode: bool) -> Self {
        self.set_update_mode(update_mode);
        self
    }

    /// Builds the ordered property list for the engine.
    ///
    /// Only properties the format supports are emitted, in this order:
    /// header encryption (`he`), level (`x`), method override (`0` for 7z,
    /// `m` otherwise), solid mode (`s`), dictionary (`0mem`/`0d` for 7z,
    /// `mem`/`d` otherwise, with a `b` size suffix).
    #[must_use]
    pub fn finalize(&self) -> ArchiveProperties {
        let mut props = ArchiveProperties::default();
        let is_seven_zip = self.format == ArchiveFormat::SevenZip;

        if self.crypt_headers && self.format.has_feature(FormatFeatures::HEADER_ENCRYPTION) {
            props.push("he", true);
        }
        if self.format.has_feature(FormatFeatures::COMPRESSION_LEVEL) {
            props.push("x", self.level.value());
        }
        if self.format.has_feature(FormatFeatures::MULTIPLE_METHODS)
            && self.method != self.format.default_method()
        {
            props.push(if is_seven_zip { "0" } else { "m" }, self.method.name());
        }
        if self.format.has_feature(FormatFeatures::SOLID_ARCHIVE) {
            props.push("s", self.solid_mode);
        }
        if self.dictionary_size != 0 {
            let name = match (is_seven_zip, self.method == CompressionMethod::Ppmd) {
                (true, true) => "0mem",
                (true, false) => "0d",
                (false, true) => "mem",
                (false, false) => "d",
            };
            props.push(name, format!("{}b", self.dictionary_size));
        }
        props
    }
}
