//! Application-wide constants.

/// Maximum number of media files accepted per listing.
pub const MAX_MEDIA_FILES: usize = 5;

/// Maximum size of a single media file in bytes (10 MiB).
pub const MAX_MEDIA_FILE_BYTES: usize = 10 * 1024 * 1024;

/// Multipart field name shared by every media part of a create request.
pub const MEDIA_FIELD_NAME: &str = "media";

/// Cover image used by listing cards for products without media.
pub const PLACEHOLDER_COVER_URL: &str = "/placeholder-product.svg";
