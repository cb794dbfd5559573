//! Archive container formats.

pub mod detect;
pub mod format;

pub use detect::detect_format;
pub use format::ArchiveFormat;
pub use format::FormatFeatures;
