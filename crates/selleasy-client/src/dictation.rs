//! Voice dictation bound to a single form field.
//!
//! The session is a small state machine owned by the form: `Idle` until a
//! field activates it, `Listening` while the host's speech engine runs.
//! Transcript chunks accumulate on the session; when the engine ends
//! naturally the accumulated text merges into the active field. A forced
//! stop (submit or close) discards the in-flight transcript instead.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Form fields dictation can target. The category select takes no speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Title,
    Price,
    Description,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Title => "title",
            FormField::Price => "price",
            FormField::Description => "description",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum DictationError {
    #[error("Voice input is not supported on this device")]
    Unsupported,
    #[error("Speech engine error: {0}")]
    Engine(String),
}

/// Control surface of the host's speech-to-text engine. Transcript chunks
/// and the natural end of recognition flow back through the owning
/// [`DictationSession`].
pub trait SpeechRecognizer {
    /// Whether the host can transcribe at all.
    fn is_supported(&self) -> bool;
    /// Begin a capture session.
    fn start(&mut self) -> Result<(), DictationError>;
    /// Abort the capture session. Results delivered afterwards are dropped.
    fn stop(&mut self);
}

/// Transcript accumulated for one field, handed over when the engine ends
/// naturally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictationResult {
    pub field: FormField,
    pub transcript: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DictationState {
    Idle,
    Listening { field: FormField, transcript: String },
}

pub struct DictationSession {
    recognizer: Box<dyn SpeechRecognizer>,
    state: DictationState,
}

impl DictationSession {
    pub fn new(recognizer: Box<dyn SpeechRecognizer>) -> Self {
        Self {
            recognizer,
            state: DictationState::Idle,
        }
    }

    /// Activate dictation for one field. Fails with
    /// [`DictationError::Unsupported`] when the host has no engine; a start
    /// while another field is already listening is ignored.
    pub fn start(&mut self, field: FormField) -> Result<(), DictationError> {
        if !self.recognizer.is_supported() {
            return Err(DictationError::Unsupported);
        }
        if matches!(self.state, DictationState::Listening { .. }) {
            return Ok(());
        }

        self.recognizer.start()?;
        self.state = DictationState::Listening {
            field,
            transcript: String::new(),
        };
        Ok(())
    }

    /// Accumulate a recognized chunk. Chunks arriving while idle (late
    /// results after a forced stop) are dropped.
    pub fn push_transcript(&mut self, chunk: &str) {
        if let DictationState::Listening { transcript, .. } = &mut self.state {
            *transcript = append_transcript(transcript, chunk);
        }
    }

    /// The engine ended on its own. Returns the accumulated transcript for
    /// the active field, or `None` when idle or nothing was recognized.
    pub fn finish(&mut self) -> Option<DictationResult> {
        match std::mem::replace(&mut self.state, DictationState::Idle) {
            DictationState::Listening { field, transcript } if !transcript.is_empty() => {
                Some(DictationResult { field, transcript })
            }
            _ => None,
        }
    }

    /// Force the session back to idle, discarding any in-flight transcript.
    pub fn stop(&mut self) {
        if matches!(self.state, DictationState::Listening { .. }) {
            self.recognizer.stop();
            self.state = DictationState::Idle;
        }
    }

    pub fn is_listening(&self) -> bool {
        matches!(self.state, DictationState::Listening { .. })
    }

    pub fn active_field(&self) -> Option<FormField> {
        match &self.state {
            DictationState::Listening { field, .. } => Some(*field),
            DictationState::Idle => None,
        }
    }

    /// Host-facing notice while capture runs.
    pub fn notice(&self) -> Option<String> {
        self.active_field()
            .map(|field| format!("Listening. Speak to fill the {} field.", field))
    }
}

static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(\.\d+)?").expect("valid regex"));

/// First decimal number in a transcript: `"twelve dollars and 5.50 cents"`
/// yields `5.50`. `None` when the transcript has no digits.
pub fn extract_price(transcript: &str) -> Option<f64> {
    PRICE_RE.find(transcript)?.as_str().parse().ok()
}

/// Merge a transcript into an existing field value with a single separating
/// space. An empty current value takes the transcript as-is.
pub fn append_transcript(current: &str, transcript: &str) -> String {
    if current.is_empty() {
        transcript.to_string()
    } else {
        format!("{} {}", current, transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counts {
        starts: u32,
        stops: u32,
    }

    struct FakeRecognizer {
        supported: bool,
        counts: Rc<RefCell<Counts>>,
    }

    impl FakeRecognizer {
        fn supported() -> (Self, Rc<RefCell<Counts>>) {
            let counts = Rc::new(RefCell::new(Counts::default()));
            (
                Self {
                    supported: true,
                    counts: counts.clone(),
                },
                counts,
            )
        }

        fn unsupported() -> Self {
            Self {
                supported: false,
                counts: Rc::new(RefCell::new(Counts::default())),
            }
        }
    }

    impl SpeechRecognizer for FakeRecognizer {
        fn is_supported(&self) -> bool {
            self.supported
        }

        fn start(&mut self) -> Result<(), DictationError> {
            self.counts.borrow_mut().starts += 1;
            Ok(())
        }

        fn stop(&mut self) {
            self.counts.borrow_mut().stops += 1;
        }
    }

    #[test]
    fn test_unsupported_engine_reports_error() {
        let mut session = DictationSession::new(Box::new(FakeRecognizer::unsupported()));
        assert!(matches!(
            session.start(FormField::Title),
            Err(DictationError::Unsupported)
        ));
        assert!(!session.is_listening());
    }

    #[test]
    fn test_start_while_listening_is_ignored() {
        let (recognizer, counts) = FakeRecognizer::supported();
        let mut session = DictationSession::new(Box::new(recognizer));

        session.start(FormField::Title).unwrap();
        session.start(FormField::Description).unwrap();

        assert_eq!(session.active_field(), Some(FormField::Title));
        assert_eq!(counts.borrow().starts, 1);
    }

    #[test]
    fn test_natural_end_hands_over_accumulated_transcript() {
        let (recognizer, _) = FakeRecognizer::supported();
        let mut session = DictationSession::new(Box::new(recognizer));

        session.start(FormField::Description).unwrap();
        session.push_transcript("Great");
        session.push_transcript("condition");

        let result = session.finish().unwrap();
        assert_eq!(result.field, FormField::Description);
        assert_eq!(result.transcript, "Great condition");
        assert!(!session.is_listening());
    }

    #[test]
    fn test_finish_without_speech_yields_nothing() {
        let (recognizer, _) = FakeRecognizer::supported();
        let mut session = DictationSession::new(Box::new(recognizer));

        session.start(FormField::Title).unwrap();
        assert!(session.finish().is_none());
        assert!(session.finish().is_none());
    }

    #[test]
    fn test_forced_stop_discards_transcript() {
        let (recognizer, counts) = FakeRecognizer::supported();
        let mut session = DictationSession::new(Box::new(recognizer));

        session.start(FormField::Title).unwrap();
        session.push_transcript("vintage chair");
        session.stop();

        assert_eq!(counts.borrow().stops, 1);
        assert!(session.finish().is_none());

        // Late results after the stop are dropped.
        session.push_transcript("ignored");
        assert!(session.finish().is_none());
    }

    #[test]
    fn test_stop_while_idle_does_not_touch_engine() {
        let (recognizer, counts) = FakeRecognizer::supported();
        let mut session = DictationSession::new(Box::new(recognizer));

        session.stop();
        assert_eq!(counts.borrow().stops, 0);
    }

    #[test]
    fn test_notice_names_the_active_field() {
        let (recognizer, _) = FakeRecognizer::supported();
        let mut session = DictationSession::new(Box::new(recognizer));

        assert!(session.notice().is_none());
        session.start(FormField::Price).unwrap();
        assert_eq!(
            session.notice().unwrap(),
            "Listening. Speak to fill the price field."
        );
    }

    #[test]
    fn test_extract_price_takes_first_decimal_number() {
        assert_eq!(extract_price("twelve dollars and 5.50 cents"), Some(5.50));
        assert_eq!(extract_price("costs 12 dollars"), Some(12.0));
        assert_eq!(extract_price("1.5 then 2.5"), Some(1.5));
        assert_eq!(extract_price("no numbers here"), None);
        assert_eq!(extract_price(""), None);
    }

    #[test]
    fn test_append_transcript_joins_with_single_space() {
        assert_eq!(append_transcript("Great", "condition"), "Great condition");
        assert_eq!(append_transcript("", "Brand new"), "Brand new");
    }
}
