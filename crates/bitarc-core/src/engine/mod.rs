//! Engine boundary: status codes, property values and capability traits.

pub mod library;
pub mod property;
pub mod status;
pub mod traits;
pub mod variant;

pub use library::Library;
pub use property::PropertyId;
pub use status::Status;
pub use status::StatusResult;
pub use traits::AskMode;
pub use traits::Engine;
pub use traits::ExtractCallback;
pub use traits::InArchive;
pub use traits::OperationResult;
pub use traits::OutArchive;
pub use traits::PasswordCallback;
pub use traits::PropertyReader;
pub use traits::SetProperties;
pub use variant::PropVariant;
pub use variant::VariantType;
