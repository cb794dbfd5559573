//! Extraction orchestration.
//!
//! The engine enumerates items and calls into an [`ExtractionSession`] for
//! each one; the session decides where bytes go, restores metadata and
//! accumulates per-item failures. [`Extractor`] wires a session to an opened
//! archive and turns the outcome into an [`ExtractionReport`](crate::ExtractionReport).

pub mod attributes;
pub mod callbacks;
pub mod extractor;
pub mod session;
pub mod sink;

pub use callbacks::Callbacks;
pub use extractor::Extractor;
pub use session::Destination;
pub use session::EMPTY_FILE_ALIAS;
pub use session::ExtractionSession;
pub use session::ItemInfo;
pub use sink::OutputSink;
