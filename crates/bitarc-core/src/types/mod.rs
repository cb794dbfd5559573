//! Filesystem-facing value types.

pub mod dest_dir;

pub use dest_dir::DestDir;
pub use dest_dir::relative_item_path;
