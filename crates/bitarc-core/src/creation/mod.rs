//! Archive creation configuration.
//!
//! [`CompressionConfig`] validates every setting against the target format
//! and produces the ordered [`ArchiveProperties`] the engine consumes.
//! [`ArchiveCreator`] installs them on a freshly created output archive.

pub mod config;
pub mod creator;
pub mod level;
pub mod method;
pub mod properties;

pub use config::CompressionConfig;
pub use creator::ArchiveCreator;
pub use level::CompressionLevel;
pub use method::CompressionMethod;
pub use method::is_valid_dictionary_size;
pub use method::is_valid_method;
pub use properties::ArchiveProperties;
pub use properties::ArchiveProperty;
