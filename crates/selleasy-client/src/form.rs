//! The product form session.
//!
//! Owns the draft field values, the media staging area, and the dictation
//! state machine for one open form. Submission is split in two: `begin_submit`
//! validates and locks the form while handing back the payload, and
//! `complete_submit` applies the outcome. The async [`submit`] helper drives
//! both around the create request.
//!
//! [`submit`]: ProductFormSession::submit

use anyhow::Result;
use uuid::Uuid;
use validator::Validate;

use selleasy_core::error::AppError;
use selleasy_core::models::CreateProduct;

use crate::api::{CreatedProduct, MediaPart};
use crate::dictation::{
    append_transcript, extract_price, DictationError, DictationSession, FormField,
    SpeechRecognizer,
};
use crate::staging::{MediaStaging, PreviewRegistry, SelectedFile, StagedFile, StagingError};
use crate::ApiClient;

/// Raw field values as the user typed (or dictated) them. `price` stays a
/// string until submit so partial input never fails early.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    pub title: String,
    pub price: String,
    pub description: String,
    pub category: String,
}

/// One inline validation message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Validated fields plus the staged media, ready for the create request.
#[derive(Debug, Clone)]
pub struct SubmissionPayload {
    pub input: CreateProduct,
    pub files: Vec<MediaPart>,
}

/// Outcome of [`ProductFormSession::begin_submit`].
#[derive(Debug)]
pub enum SubmitStart {
    /// Payload to hand to the create endpoint. The form is now locked.
    Ready(SubmissionPayload),
    /// Validation failed; field errors are recorded on the session.
    Invalid,
    /// A submission is already in flight; nothing happened.
    AlreadyPending,
}

/// Outcome of the full [`ProductFormSession::submit`] round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitResult {
    /// The listing was created; carries its id for acknowledgment.
    Created(i32),
    /// Validation failed before any request went out.
    Invalid,
    /// The request failed; the error text is on the session and the form
    /// stays populated for a retry.
    Failed,
    /// A submission was already in flight; no request was issued.
    AlreadyPending,
}

pub struct ProductFormSession {
    draft: ProductDraft,
    staging: MediaStaging,
    dictation: DictationSession,
    pending: bool,
    field_errors: Vec<FieldError>,
    submit_error: Option<String>,
}

impl ProductFormSession {
    pub fn new(
        previews: Box<dyn PreviewRegistry>,
        recognizer: Box<dyn SpeechRecognizer>,
    ) -> Self {
        Self {
            draft: ProductDraft::default(),
            staging: MediaStaging::new(previews),
            dictation: DictationSession::new(recognizer),
            pending: false,
            field_errors: Vec::new(),
            submit_error: None,
        }
    }

    pub fn draft(&self) -> &ProductDraft {
        &self.draft
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    /// Message for one field, for inline rendering.
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    // Field setters are ignored while a submission is pending; the form is
    // non-interactive until the request resolves.

    pub fn set_title(&mut self, value: impl Into<String>) {
        if !self.pending {
            self.draft.title = value.into();
        }
    }

    pub fn set_price(&mut self, value: impl Into<String>) {
        if !self.pending {
            self.draft.price = value.into();
        }
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        if !self.pending {
            self.draft.description = value.into();
        }
    }

    pub fn set_category(&mut self, value: impl Into<String>) {
        if !self.pending {
            self.draft.category = value.into();
        }
    }

    pub fn staged_files(&self) -> &[StagedFile] {
        self.staging.files()
    }

    /// Stage picked files. Ignored while a submission is pending.
    pub fn add_files(&mut self, selected: Vec<SelectedFile>) -> Result<(), StagingError> {
        if self.pending {
            return Ok(());
        }
        self.staging.add_files(selected)
    }

    /// Remove one staged file and release its preview. Ignored while a
    /// submission is pending.
    pub fn remove_file(&mut self, id: Uuid) {
        if !self.pending {
            self.staging.remove(id);
        }
    }

    /// Read-only view of the dictation state for host rendering.
    pub fn dictation(&self) -> &DictationSession {
        &self.dictation
    }

    /// Activate dictation for a field. Ignored while a submission is
    /// pending.
    pub fn start_dictation(&mut self, field: FormField) -> Result<(), DictationError> {
        if self.pending {
            return Ok(());
        }
        self.dictation.start(field)
    }

    /// Forward a recognized chunk from the host's speech engine.
    pub fn push_transcript(&mut self, chunk: &str) {
        self.dictation.push_transcript(chunk);
    }

    /// Stop capture without merging. The host's mic toggle routes here.
    pub fn stop_dictation(&mut self) {
        self.dictation.stop();
    }

    /// The speech engine ended on its own; merge the transcript into the
    /// field it was bound to. For the price field the first decimal number
    /// is taken, and a transcript without one changes nothing.
    pub fn dictation_ended(&mut self) {
        let Some(result) = self.dictation.finish() else {
            return;
        };
        match result.field {
            FormField::Price => {
                if let Some(price) = extract_price(&result.transcript) {
                    self.draft.price = price.to_string();
                }
            }
            FormField::Title => {
                self.draft.title = append_transcript(&self.draft.title, &result.transcript);
            }
            FormField::Description => {
                self.draft.description =
                    append_transcript(&self.draft.description, &result.transcript);
            }
        }
    }

    /// Validate the draft and lock the form. Only a draft that passes
    /// validation discards in-flight dictation; on a failed validation the
    /// session keeps listening so the transcript can still merge. On success
    /// the returned payload carries the validated fields plus every staged
    /// file, and the form stays locked until [`complete_submit`] runs.
    ///
    /// [`complete_submit`]: ProductFormSession::complete_submit
    pub fn begin_submit(&mut self) -> SubmitStart {
        if self.pending {
            return SubmitStart::AlreadyPending;
        }

        self.field_errors.clear();
        self.submit_error = None;

        let price: f64 = match self.draft.price.trim().parse() {
            // "inf" and "NaN" parse as f64 but are not prices.
            Ok(price) if f64::is_finite(price) => price,
            _ => {
                self.field_errors.push(FieldError {
                    field: "price".to_string(),
                    message: "Price must be a number".to_string(),
                });
                return SubmitStart::Invalid;
            }
        };

        let input = CreateProduct {
            title: self.draft.title.clone(),
            price,
            description: self.draft.description.clone(),
            category: self.draft.category.clone(),
        };

        if let Err(errors) = input.validate() {
            self.field_errors = AppError::from(errors)
                .field_errors()
                .into_iter()
                .map(|(field, message)| FieldError { field, message })
                .collect();
            return SubmitStart::Invalid;
        }

        self.dictation.stop();

        let files = self
            .staging
            .files()
            .iter()
            .map(|file| MediaPart {
                file_name: file.name.clone(),
                content_type: file.content_type.clone(),
                data: file.data.to_vec(),
            })
            .collect();

        self.pending = true;
        SubmitStart::Ready(SubmissionPayload { input, files })
    }

    /// Apply the create request's outcome. Success resets the form and
    /// returns the created id for acknowledgment; failure records the error
    /// text and leaves every value in place for a retry.
    pub fn complete_submit(
        &mut self,
        outcome: Result<CreatedProduct, anyhow::Error>,
    ) -> Option<i32> {
        if !self.pending {
            return None;
        }
        self.pending = false;

        match outcome {
            Ok(created) => {
                self.reset_fields();
                Some(created.id)
            }
            Err(err) => {
                self.submit_error = Some(err.to_string());
                None
            }
        }
    }

    /// Validate, send, and apply the outcome in one call.
    pub async fn submit(&mut self, client: &ApiClient) -> SubmitResult {
        match self.begin_submit() {
            SubmitStart::AlreadyPending => SubmitResult::AlreadyPending,
            SubmitStart::Invalid => SubmitResult::Invalid,
            SubmitStart::Ready(payload) => {
                let outcome = client.create_product(&payload.input, payload.files).await;
                match self.complete_submit(outcome) {
                    Some(id) => SubmitResult::Created(id),
                    None => SubmitResult::Failed,
                }
            }
        }
    }

    /// Close the form. While idle this resets the draft and releases every
    /// staged preview, and reports `true`. While a submission is pending the
    /// close is ignored and `false` comes back.
    pub fn close(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.dictation.stop();
        self.reset_fields();
        true
    }

    fn reset_fields(&mut self) {
        self.draft = ProductDraft::default();
        self.staging.clear();
        self.field_errors.clear();
        self.submit_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::staging::NoopPreviewRegistry;

    struct AlwaysOnRecognizer;

    impl SpeechRecognizer for AlwaysOnRecognizer {
        fn is_supported(&self) -> bool {
            true
        }

        fn start(&mut self) -> Result<(), DictationError> {
            Ok(())
        }

        fn stop(&mut self) {}
    }

    fn session() -> ProductFormSession {
        ProductFormSession::new(Box::new(NoopPreviewRegistry), Box::new(AlwaysOnRecognizer))
    }

    fn fill_valid(form: &mut ProductFormSession) {
        form.set_title("Desk Lamp");
        form.set_price("19.99");
        form.set_description("A sturdy lamp for any desk");
        form.set_category("home");
    }

    fn jpeg(name: &str) -> SelectedFile {
        SelectedFile::new(name, "image/jpeg", vec![1u8, 2, 3])
    }

    #[test]
    fn test_short_title_blocks_submission() {
        let mut form = session();
        fill_valid(&mut form);
        form.set_title("ab");

        assert!(matches!(form.begin_submit(), SubmitStart::Invalid));
        assert!(!form.is_pending());
        assert_eq!(
            form.field_error("title"),
            Some("Title must be between 3 and 80 characters")
        );
    }

    #[test]
    fn test_non_numeric_price_blocks_submission() {
        let mut form = session();
        fill_valid(&mut form);
        form.set_price("abc");

        assert!(matches!(form.begin_submit(), SubmitStart::Invalid));
        assert_eq!(form.field_error("price"), Some("Price must be a number"));

        form.set_price("");
        assert!(matches!(form.begin_submit(), SubmitStart::Invalid));
        assert_eq!(form.field_error("price"), Some("Price must be a number"));
    }

    #[test]
    fn test_zero_price_blocks_submission() {
        let mut form = session();
        fill_valid(&mut form);
        form.set_price("0");

        assert!(matches!(form.begin_submit(), SubmitStart::Invalid));
        assert_eq!(
            form.field_error("price"),
            Some("Price must be greater than 0")
        );
    }

    #[test]
    fn test_non_finite_price_blocks_submission() {
        let mut form = session();
        fill_valid(&mut form);

        // Rust's f64 parser accepts these; the form must not.
        for text in ["inf", "-inf", "infinity", "NaN"] {
            form.set_price(text);
            assert!(matches!(form.begin_submit(), SubmitStart::Invalid));
            assert_eq!(form.field_error("price"), Some("Price must be a number"));
        }
    }

    #[test]
    fn test_begin_submit_locks_the_form() {
        let mut form = session();
        fill_valid(&mut form);
        form.add_files(vec![jpeg("a.jpg")]).unwrap();

        let payload = match form.begin_submit() {
            SubmitStart::Ready(payload) => payload,
            other => panic!("expected Ready, got {:?}", other),
        };
        assert_eq!(payload.input.title, "Desk Lamp");
        assert_eq!(payload.input.price, 19.99);
        assert_eq!(payload.input.category, "home");
        assert_eq!(payload.files.len(), 1);
        assert_eq!(payload.files[0].file_name, "a.jpg");
        assert!(form.is_pending());

        // A second submit while pending is refused.
        assert!(matches!(form.begin_submit(), SubmitStart::AlreadyPending));

        // Edits while pending are ignored.
        form.set_title("changed");
        assert_eq!(form.draft().title, "Desk Lamp");
        form.add_files(vec![jpeg("b.jpg")]).unwrap();
        assert_eq!(form.staged_files().len(), 1);
    }

    #[test]
    fn test_successful_submit_resets_everything() {
        let mut form = session();
        fill_valid(&mut form);
        form.add_files(vec![jpeg("a.jpg")]).unwrap();

        assert!(matches!(form.begin_submit(), SubmitStart::Ready(_)));
        let created = form.complete_submit(Ok(CreatedProduct { id: 42 }));

        assert_eq!(created, Some(42));
        assert!(!form.is_pending());
        assert_eq!(form.draft(), &ProductDraft::default());
        assert!(form.staged_files().is_empty());
        assert!(form.submit_error().is_none());
    }

    #[test]
    fn test_failed_submit_keeps_the_form_populated() {
        let mut form = session();
        fill_valid(&mut form);
        form.add_files(vec![jpeg("a.jpg")]).unwrap();

        assert!(matches!(form.begin_submit(), SubmitStart::Ready(_)));
        let created = form.complete_submit(Err(anyhow::anyhow!("server error")));

        assert_eq!(created, None);
        assert!(!form.is_pending());
        assert_eq!(form.submit_error(), Some("server error"));
        assert_eq!(form.draft().title, "Desk Lamp");
        assert_eq!(form.staged_files().len(), 1);
    }

    #[test]
    fn test_close_is_ignored_while_pending() {
        let mut form = session();
        fill_valid(&mut form);

        assert!(matches!(form.begin_submit(), SubmitStart::Ready(_)));
        assert!(!form.close());
        assert!(form.is_pending());

        form.complete_submit(Ok(CreatedProduct { id: 1 }));
        assert!(form.close());
    }

    #[test]
    fn test_close_while_idle_discards_draft_and_files() {
        let mut form = session();
        fill_valid(&mut form);
        form.add_files(vec![jpeg("a.jpg"), jpeg("b.jpg")]).unwrap();

        assert!(form.close());
        assert_eq!(form.draft(), &ProductDraft::default());
        assert!(form.staged_files().is_empty());
    }

    #[test]
    fn test_dictated_price_takes_first_decimal_number() {
        let mut form = session();
        form.start_dictation(FormField::Price).unwrap();
        form.push_transcript("twelve dollars and 5.50 cents");
        form.dictation_ended();

        assert_eq!(form.draft().price.parse::<f64>().unwrap(), 5.50);
    }

    #[test]
    fn test_dictated_price_without_number_changes_nothing() {
        let mut form = session();
        form.set_price("10");
        form.start_dictation(FormField::Price).unwrap();
        form.push_transcript("about ten bucks");
        form.dictation_ended();

        assert_eq!(form.draft().price, "10");
    }

    #[test]
    fn test_dictated_text_appends_with_space() {
        let mut form = session();
        form.set_description("Great");
        form.start_dictation(FormField::Description).unwrap();
        form.push_transcript("condition");
        form.dictation_ended();

        assert_eq!(form.draft().description, "Great condition");
    }

    #[test]
    fn test_submit_discards_inflight_dictation() {
        let mut form = session();
        fill_valid(&mut form);
        form.start_dictation(FormField::Title).unwrap();
        form.push_transcript("never merged");

        assert!(matches!(form.begin_submit(), SubmitStart::Ready(_)));
        assert!(!form.dictation().is_listening());
        assert_eq!(form.draft().title, "Desk Lamp");
    }

    #[test]
    fn test_failed_validation_keeps_dictation_listening() {
        let mut form = session();
        fill_valid(&mut form);
        form.set_title("ab");
        form.start_dictation(FormField::Description).unwrap();
        form.push_transcript("with original box");

        assert!(matches!(form.begin_submit(), SubmitStart::Invalid));
        assert!(form.dictation().is_listening());

        // The transcript is still live and merges on a natural end.
        form.dictation_ended();
        assert_eq!(
            form.draft().description,
            "A sturdy lamp for any desk with original box"
        );
    }
}
