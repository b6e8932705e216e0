//! The listing grid session.
//!
//! Holds the fetched product collection and the success acknowledgment
//! shown after a creation. The collection is replaced wholesale on every
//! refresh, never patched in place; a failed fetch lands in a retryable
//! error state instead of an indefinite loading indicator.

use chrono::{DateTime, Utc};

use selleasy_core::constants::PLACEHOLDER_COVER_URL;
use selleasy_core::models::{MediaKind, Product};

use crate::ApiClient;

#[derive(Debug, Clone, PartialEq)]
pub enum ListingState {
    /// A fetch is outstanding.
    Loading,
    /// The last fetch failed; calling refresh again retries.
    Failed { message: String },
    /// The backend has no listings yet.
    Empty,
    /// Products in backend order, newest first.
    Ready { products: Vec<Product> },
}

/// Success acknowledgment for a freshly created listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acknowledgment {
    pub product_id: i32,
}

/// The choice offered by the acknowledgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckResolution {
    ViewProduct,
    AddAnother,
}

/// What the host should do after the acknowledgment closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckOutcome {
    /// Navigate to this product's detail; fetching it counts the view.
    ViewProduct(i32),
    /// Reopen the product form.
    AddAnother,
}

pub struct ListingSession {
    state: ListingState,
    acknowledgment: Option<Acknowledgment>,
}

impl Default for ListingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingSession {
    pub fn new() -> Self {
        Self {
            state: ListingState::Loading,
            acknowledgment: None,
        }
    }

    pub fn state(&self) -> &ListingState {
        &self.state
    }

    /// The fetched products, or an empty slice in every other state.
    pub fn products(&self) -> &[Product] {
        match &self.state {
            ListingState::Ready { products } => products,
            _ => &[],
        }
    }

    /// Fetch the collection and replace the current state with the result.
    pub async fn refresh(&mut self, client: &ApiClient) {
        self.state = ListingState::Loading;
        self.state = match client.list_products().await {
            Ok(products) if products.is_empty() => ListingState::Empty,
            Ok(products) => ListingState::Ready { products },
            Err(err) => ListingState::Failed {
                message: err.to_string(),
            },
        };
    }

    /// Record the acknowledgment for a created listing, then re-fetch so
    /// the grid shows it. The acknowledgment is in place before the fetch
    /// starts, never concurrently with the create request.
    pub async fn product_created(&mut self, client: &ApiClient, product_id: i32) {
        self.acknowledge(product_id);
        self.refresh(client).await;
    }

    pub fn acknowledge(&mut self, product_id: i32) {
        self.acknowledgment = Some(Acknowledgment { product_id });
    }

    pub fn acknowledgment(&self) -> Option<&Acknowledgment> {
        self.acknowledgment.as_ref()
    }

    /// Close the acknowledgment with the user's choice. `None` when no
    /// acknowledgment was showing.
    pub fn resolve_acknowledgment(&mut self, resolution: AckResolution) -> Option<AckOutcome> {
        let ack = self.acknowledgment.take()?;
        Some(match resolution {
            AckResolution::ViewProduct => AckOutcome::ViewProduct(ack.product_id),
            AckResolution::AddAnother => AckOutcome::AddAnother,
        })
    }

    /// Card models for the current products, in grid order.
    pub fn cards(&self, now: DateTime<Utc>) -> Vec<ProductCard> {
        self.products()
            .iter()
            .map(|product| ProductCard::from_product(product, now))
            .collect()
    }
}

/// Everything a grid card renders for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    pub id: i32,
    pub title: String,
    pub price_label: String,
    pub description: String,
    pub category_label: &'static str,
    /// First media URL, or the shared placeholder when the listing has none.
    pub cover_url: String,
    pub cover_kind: Option<MediaKind>,
    pub posted_label: String,
    pub views_label: String,
}

impl ProductCard {
    pub fn from_product(product: &Product, now: DateTime<Utc>) -> Self {
        let (cover_url, cover_kind) = match product.media.first() {
            Some(media) => (media.url.clone(), Some(media.kind)),
            None => (PLACEHOLDER_COVER_URL.to_string(), None),
        };

        Self {
            id: product.id,
            title: product.title.clone(),
            price_label: format!("${:.2}", product.price),
            description: product.description.clone(),
            category_label: product.category.label(),
            cover_url,
            cover_kind,
            posted_label: time_ago(product.created_at, now),
            views_label: format!("{} views", product.views),
        }
    }
}

fn time_ago(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - created_at).num_seconds().max(0);
    if seconds < 60 {
        return "just now".to_string();
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return plural(minutes, "minute");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return plural(hours, "hour");
    }
    let days = hours / 24;
    if days < 30 {
        return plural(days, "day");
    }
    let months = days / 30;
    if months < 12 {
        return plural(months, "month");
    }
    plural(months / 12, "year")
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}
