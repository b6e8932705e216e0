use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::ValidationError;

/// Listing category catalog.
///
/// Serializes as the slug (`"electronics"`); `label()` carries the display
/// text hosts render in the category select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Electronics,
    Clothing,
    Home,
    Beauty,
    Toys,
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Electronics,
        Category::Clothing,
        Category::Home,
        Category::Beauty,
        Category::Toys,
        Category::Other,
    ];

    /// Parse a category slug; `None` for anything outside the catalog.
    pub fn from_slug(slug: &str) -> Option<Category> {
        match slug {
            "electronics" => Some(Category::Electronics),
            "clothing" => Some(Category::Clothing),
            "home" => Some(Category::Home),
            "beauty" => Some(Category::Beauty),
            "toys" => Some(Category::Toys),
            "other" => Some(Category::Other),
            _ => None,
        }
    }

    pub fn as_slug(&self) -> &'static str {
        match self {
            Category::Electronics => "electronics",
            Category::Clothing => "clothing",
            Category::Home => "home",
            Category::Beauty => "beauty",
            Category::Toys => "toys",
            Category::Other => "other",
        }
    }

    /// Display label for select controls and cards.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Electronics => "Electronics",
            Category::Clothing => "Clothing & Accessories",
            Category::Home => "Home & Garden",
            Category::Beauty => "Beauty & Personal Care",
            Category::Toys => "Toys & Games",
            Category::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_slug())
    }
}

/// Validator hook for `CreateProduct::category`: non-empty and in the catalog.
pub fn validate_category(category: &str) -> Result<(), ValidationError> {
    if Category::from_slug(category).is_some() {
        Ok(())
    } else {
        let mut err = ValidationError::new("category");
        err.message = Some("Please select a category".into());
        Err(err)
    }
}
