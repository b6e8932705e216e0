use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Media kind enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify by MIME prefix: `image/*` is an image, everything else video.
    pub fn from_content_type(content_type: &str) -> MediaKind {
        if content_type.starts_with("image/") {
            MediaKind::Image
        } else {
            MediaKind::Video
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

/// A stored media attachment of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct ProductMedia {
    pub id: i32,
    pub product_id: i32,
    pub url: String,
    pub kind: MediaKind,
}

/// Input for a media row created alongside its product.
#[derive(Debug, Clone)]
pub struct NewProductMedia {
    pub url: String,
    pub kind: MediaKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classified_by_mime_prefix() {
        assert_eq!(
            MediaKind::from_content_type("image/jpeg"),
            MediaKind::Image
        );
        assert_eq!(MediaKind::from_content_type("image/png"), MediaKind::Image);
        assert_eq!(MediaKind::from_content_type("video/mp4"), MediaKind::Video);
        // Anything that is not image/* is treated as video
        assert_eq!(
            MediaKind::from_content_type("application/octet-stream"),
            MediaKind::Video
        );
    }

    #[test]
    fn test_media_serializes_camel_case() {
        let media = ProductMedia {
            id: 7,
            product_id: 42,
            url: "http://localhost:4000/media/media/abc.jpg".to_string(),
            kind: MediaKind::Image,
        };
        let json = serde_json::to_value(&media).unwrap();
        assert_eq!(json["productId"], 42);
        assert_eq!(json["kind"], "image");
        assert!(json.get("product_id").is_none());
    }
}
