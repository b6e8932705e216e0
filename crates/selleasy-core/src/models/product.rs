use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::category::{validate_category, Category};
use super::media::ProductMedia;

/// A marketplace listing with its ordered media attachments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: Category,
    pub created_at: DateTime<Utc>,
    pub views: i32,
    pub media: Vec<ProductMedia>,
}

/// Database row for the products table (media rows are joined separately).
#[derive(Debug)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductRow {
    pub id: i32,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: Category,
    pub created_at: DateTime<Utc>,
    pub views: i32,
}

impl ProductRow {
    /// Build the wire model from this row plus its media attachments.
    pub fn into_product(self, media: Vec<ProductMedia>) -> Product {
        Product {
            id: self.id,
            title: self.title,
            price: self.price,
            description: self.description,
            category: self.category,
            created_at: self.created_at,
            views: self.views,
            media,
        }
    }
}

/// Input for creating a listing. The validation rules here are the single
/// schema both the form session and the create endpoint apply.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateProduct {
    #[validate(length(
        min = 3,
        max = 80,
        message = "Title must be between 3 and 80 characters"
    ))]
    pub title: String,
    #[validate(range(exclusive_min = 0.0, message = "Price must be greater than 0"))]
    #[validate(custom(function = validate_price))]
    pub price: f64,
    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,
    /// Category slug; must name an entry of the catalog.
    #[validate(custom(function = validate_category))]
    pub category: String,
}

/// Validator hook for `CreateProduct::price`: finite values only. `"inf"`
/// and `"NaN"` parse as f64, and serde_json serializes non-finite floats as
/// JSON `null`.
fn validate_price(price: f64) -> Result<(), ValidationError> {
    if price.is_finite() {
        Ok(())
    } else {
        let mut err = ValidationError::new("price");
        err.message = Some("Price must be a number".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn valid_input() -> CreateProduct {
        CreateProduct {
            title: "Desk Lamp".to_string(),
            price: 19.99,
            description: "A sturdy lamp for any desk".to_string(),
            category: "home".to_string(),
        }
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(valid_input().validate().is_ok());
    }

    #[test]
    fn test_title_length_bounds() {
        let mut input = valid_input();
        input.title = "ab".to_string();
        assert!(input.validate().is_err());

        input.title = "abc".to_string();
        assert!(input.validate().is_ok());

        input.title = "x".repeat(80);
        assert!(input.validate().is_ok());

        input.title = "x".repeat(81);
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_price_must_be_positive() {
        let mut input = valid_input();
        input.price = 0.0;
        assert!(input.validate().is_err());

        input.price = -3.5;
        assert!(input.validate().is_err());

        // Strictly greater than zero, not >= 0.01
        input.price = 0.005;
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_price_must_be_finite() {
        // "inf" and "NaN" are valid f64 text, so a multipart price part can
        // deliver them; validation has to be the backstop.
        let mut input = valid_input();
        input.price = "inf".parse().unwrap();
        assert!(input.validate().is_err());

        input.price = f64::NEG_INFINITY;
        assert!(input.validate().is_err());

        input.price = f64::NAN;
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_description_minimum_length() {
        let mut input = valid_input();
        input.description = "too short".to_string();
        assert!(input.validate().is_err());

        input.description = "long enough to pass".to_string();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_category_must_be_in_catalog() {
        let mut input = valid_input();
        input.category = String::new();
        assert!(input.validate().is_err());

        input.category = "vehicles".to_string();
        assert!(input.validate().is_err());

        input.category = "electronics".to_string();
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_product_serializes_camel_case() {
        let product = Product {
            id: 42,
            title: "Desk Lamp".to_string(),
            price: 19.99,
            description: "A sturdy lamp for any desk".to_string(),
            category: Category::Home,
            created_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap(),
            views: 3,
            media: vec![],
        };
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["category"], "home");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
        assert_eq!(json["views"], 3);
    }
}
