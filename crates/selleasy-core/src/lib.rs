//! SellEasy Core Library
//!
//! This crate provides the domain models, error types, configuration, and the
//! listing validation schema shared by the backend and the client workflow.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    Category, CreateProduct, MediaKind, NewProductMedia, Product, ProductMedia,
};
