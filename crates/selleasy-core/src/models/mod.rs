//! Data models for the application
//!
//! This module contains the listing domain: products, their media, the
//! category catalog, and the create-listing input with its validation schema.
//! The validation schema is shared so the form session and the API validate
//! identically.

mod category;
mod media;
mod product;

// Re-export all models for convenient imports
pub use category::*;
pub use media::*;
pub use product::*;
