//! Database repositories for data access layer
//!
//! Each repository owns a specific domain entity and provides its queries.
//! The users table has no repository here: credentials are outside the
//! listing workflow and nothing in this service reads them.

pub mod products;

pub use products::ProductRepository;
