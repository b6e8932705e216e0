//! SellEasy Storage Library
//!
//! Storage abstraction for uploaded listing media. The API writes every
//! accepted media file through the `Storage` trait and records only the
//! resulting public URL in the database.
//!
//! # Storage key format
//!
//! All keys live under the `media/` prefix: `media/{filename}`. Keys must not
//! contain `..` or a leading `/`.

pub mod local;
pub mod traits;

// Re-export commonly used types
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
