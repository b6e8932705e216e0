//! HTTP request handlers

pub mod media_download;
pub mod product_create;
pub mod product_get;
