use std::collections::HashMap;

use selleasy_core::models::{CreateProduct, NewProductMedia, Product, ProductMedia, ProductRow};
use selleasy_core::AppError;
use sqlx::{PgPool, Postgres};

const PRODUCT_COLUMNS: &str = "id, title, price, description, category, created_at, views";
const MEDIA_COLUMNS: &str = "id, product_id, url, kind";

/// Listing repository
///
/// Owns product rows and their media attachments. Media rows are only ever
/// created together with their product, so the two inserts share one
/// transaction; nothing mutates a media row afterwards.
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a product and its media rows atomically.
    ///
    /// `input` is expected to be validated already; `created_at` and `views`
    /// come from the column defaults.
    #[tracing::instrument(
        skip(self, input, media),
        fields(db.table = "products", db.operation = "insert", media_count = media.len())
    )]
    pub async fn create_with_media(
        &self,
        input: &CreateProduct,
        media: Vec<NewProductMedia>,
    ) -> Result<Product, AppError> {
        let mut tx = self.pool.begin().await?;

        let row: ProductRow = sqlx::query_as::<Postgres, ProductRow>(&format!(
            r#"
            INSERT INTO products (title, price, description, category)
            VALUES ($1, $2, $3, $4)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&input.title)
        .bind(input.price)
        .bind(&input.description)
        .bind(&input.category)
        .fetch_one(&mut *tx)
        .await?;

        let mut attached = Vec::with_capacity(media.len());
        for item in media {
            let media_row: ProductMedia = sqlx::query_as::<Postgres, ProductMedia>(&format!(
                r#"
                INSERT INTO product_media (product_id, url, kind)
                VALUES ($1, $2, $3)
                RETURNING {MEDIA_COLUMNS}
                "#
            ))
            .bind(row.id)
            .bind(&item.url)
            .bind(item.kind)
            .fetch_one(&mut *tx)
            .await?;
            attached.push(media_row);
        }

        tx.commit().await?;

        tracing::info!(product_id = row.id, "Product created");

        Ok(row.into_product(attached))
    }

    /// List every product, newest first, each with its ordered media.
    #[tracing::instrument(skip(self), fields(db.table = "products", db.operation = "select"))]
    pub async fn list_with_media(&self) -> Result<Vec<Product>, AppError> {
        let rows: Vec<ProductRow> = sqlx::query_as::<Postgres, ProductRow>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        // One media query for the whole page instead of one per product.
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let media_rows: Vec<ProductMedia> = sqlx::query_as::<Postgres, ProductMedia>(&format!(
            r#"
            SELECT {MEDIA_COLUMNS}
            FROM product_media
            WHERE product_id = ANY($1)
            ORDER BY product_id, id
            "#
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_product: HashMap<i32, Vec<ProductMedia>> = HashMap::new();
        for m in media_rows {
            by_product.entry(m.product_id).or_default().push(m);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let media = by_product.remove(&row.id).unwrap_or_default();
                row.into_product(media)
            })
            .collect())
    }

    /// Fetch one product with its media; `None` when the id is unknown.
    #[tracing::instrument(
        skip(self),
        fields(db.table = "products", db.operation = "select", db.record_id = %id)
    )]
    pub async fn get_with_media(&self, id: i32) -> Result<Option<Product>, AppError> {
        let row: Option<ProductRow> = sqlx::query_as::<Postgres, ProductRow>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let media = self.media_for(row.id).await?;
        Ok(Some(row.into_product(media)))
    }

    /// Bump the view counter and return the product as now stored;
    /// `None` when the id is unknown.
    #[tracing::instrument(
        skip(self),
        fields(db.table = "products", db.operation = "update", db.record_id = %id)
    )]
    pub async fn increment_views(&self, id: i32) -> Result<Option<Product>, AppError> {
        let row: Option<ProductRow> = sqlx::query_as::<Postgres, ProductRow>(&format!(
            r#"
            UPDATE products
            SET views = views + 1
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let media = self.media_for(row.id).await?;
        Ok(Some(row.into_product(media)))
    }

    async fn media_for(&self, product_id: i32) -> Result<Vec<ProductMedia>, AppError> {
        let media: Vec<ProductMedia> = sqlx::query_as::<Postgres, ProductMedia>(&format!(
            r#"
            SELECT {MEDIA_COLUMNS}
            FROM product_media
            WHERE product_id = $1
            ORDER BY id
            "#
        ))
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(media)
    }
}
