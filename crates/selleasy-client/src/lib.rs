//! Client-side workflow for the SellEasy marketplace.
//!
//! Provides a minimal HTTP client for the listing API plus the stateful
//! sessions a host UI drives: media staging with preview lifecycle,
//! voice dictation, the product form with its submission pipeline, and
//! the listing grid with its post-creation acknowledgment.

pub mod api;
pub mod dictation;
pub mod form;
pub mod listing;
pub mod staging;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client for the SellEasy listing API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create client from environment: SELLEASY_API_URL (or API_URL).
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("SELLEASY_API_URL")
            .or_else(|_| std::env::var("API_URL"))
            .unwrap_or_else(|_| "http://localhost:4000".to_string());

        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET request with optional query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.build_url(path);
        let mut request = self.client.get(&url);

        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request.send().await.context("Failed to send request")?;
        let response = Self::check_status(response).await?;

        let body: T = response
            .json()
            .await
            .context("Failed to parse response as JSON")?;

        Ok(body)
    }

    /// POST multipart form and deserialize response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T> {
        let url = self.build_url(path);
        let request = self.client.post(&url).multipart(form);

        let response = request.send().await.context("Failed to send request")?;
        let response = Self::check_status(response).await?;

        let body: T = response
            .json()
            .await
            .context("Failed to parse response as JSON")?;

        Ok(body)
    }

    /// Non-2xx responses become errors carrying the server's message, so
    /// hosts can show it verbatim: the `error` field when the body is the
    /// API's JSON error shape, otherwise the raw body text. Falls back to the
    /// status line when the body is empty.
    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await.unwrap_or_default();
        if error_text.trim().is_empty() {
            return Err(anyhow::anyhow!("Request failed with status {}", status));
        }

        if let Ok(body) = serde_json::from_str::<serde_json::Value>(&error_text) {
            if let Some(message) = body.get("error").and_then(|v| v.as_str()) {
                return Err(anyhow::anyhow!(message.to_string()));
            }
        }
        Err(anyhow::anyhow!(error_text))
    }
}

// Re-export the session types and wire models hosts work with.
pub use api::{CreatedProduct, MediaPart};
pub use dictation::{
    append_transcript, extract_price, DictationError, DictationResult, DictationSession,
    FormField, SpeechRecognizer,
};
pub use form::{
    FieldError, ProductDraft, ProductFormSession, SubmissionPayload, SubmitResult, SubmitStart,
};
pub use listing::{
    AckOutcome, AckResolution, Acknowledgment, ListingSession, ListingState, ProductCard,
};
pub use selleasy_core::models::{Category, CreateProduct, MediaKind, Product, ProductMedia};
pub use staging::{
    FileSource, MediaStaging, NoopPreviewRegistry, PreviewRegistry, SelectedFile, StagedFile,
    StagingError,
};
