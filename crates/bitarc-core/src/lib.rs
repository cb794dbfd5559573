//! Typed wrapper around an external 7-zip-style compression engine.
//!
//! `bitarc-core` does not compress anything itself. It drives an opaque
//! engine through narrow capability traits and provides three components on
//! top of it:
//!
//! - [`creation`]: validates compression settings against the target format
//!   and turns them into the engine's ordered property list
//! - [`extraction`]: the engine-facing callback that materializes items,
//!   restores metadata and accumulates per-item failures
//! - [`info`]: archive and item metadata as an engine-agnostic mapping
//!
//! The engine is reached through an explicitly created [`Library`] handle
//! that every component borrows.
//!
//! # Examples
//!
//! ```
//! use bitarc_core::CompressionConfig;
//! use bitarc_core::creation::CompressionLevel;
//! use bitarc_core::creation::CompressionMethod;
//! use bitarc_core::formats::ArchiveFormat;
//!
//! # fn main() -> Result<(), bitarc_core::BitError> {
//! let config = CompressionConfig::new(ArchiveFormat::SevenZip)
//!     .with_compression_method(CompressionMethod::Lzma2)?
//!     .with_compression_level(CompressionLevel::Ultra)
//!     .with_dictionary_size(64 * 1024 * 1024)?
//!     .with_solid_mode(true)
//!     .with_password("secret", true);
//!
//! let props = config.finalize();
//! assert_eq!(props.names(), vec!["he", "x", "s", "0d"]);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod creation;
pub mod engine;
pub mod error;
pub mod extraction;
pub mod formats;
pub mod info;
pub mod report;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod types;

pub use creation::ArchiveCreator;
pub use creation::CompressionConfig;
pub use engine::Library;
pub use error::BitError;
pub use error::Result;
pub use extraction::Callbacks;
pub use extraction::Extractor;
pub use formats::ArchiveFormat;
pub use info::ArchiveInfo;
pub use report::ExtractionReport;
