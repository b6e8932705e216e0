//! SellEasy database layer
//!
//! Repository implementations over Postgres. Schema migrations live in the
//! workspace-level `migrations/` directory and are applied by the API at
//! startup.

pub mod db;

pub use db::ProductRepository;
