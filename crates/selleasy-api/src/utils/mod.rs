//! Common utilities for request handlers

pub mod multipart;
