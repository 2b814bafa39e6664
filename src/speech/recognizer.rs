//! Speech recognition capability boundary
//!
//! The platform recognition engine is an external collaborator: continuous
//! mode, interim results, a single alternative, a fixed locale, and four
//! callbacks (session start, session end, result, error). It is modeled as
//! a trait plus an event stream so the capture state machine can be driven
//! by a scripted implementation in tests.

use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::warn;

/// Settings handed to the platform recognizer on start
#[derive(Clone, Debug)]
pub struct RecognizerConfig {
    /// Keep the session open across utterances
    pub continuous: bool,
    /// Deliver not-yet-finalized fragments
    pub interim_results: bool,
    /// Number of alternatives per result
    pub max_alternatives: u32,
    /// Recognition locale
    pub locale: String,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            continuous: true,
            interim_results: true,
            max_alternatives: 1,
            locale: "en-US".to_string(),
        }
    }
}

impl RecognizerConfig {
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }
}

/// Errors reported by the recognition engine
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecognitionError {
    /// The engine heard nothing; listening continues
    NoSpeech,
    /// Microphone capture failed
    AudioCapture(String),
    /// The user or platform denied microphone access
    NotAllowed(String),
    /// Anything else the engine reports
    Other(String),
}

impl RecognitionError {
    /// Transient errors are ignored; everything else stops listening
    pub fn is_transient(&self) -> bool {
        matches!(self, RecognitionError::NoSpeech)
    }
}

impl std::fmt::Display for RecognitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecognitionError::NoSpeech => write!(f, "no speech detected"),
            RecognitionError::AudioCapture(e) => write!(f, "audio capture failed: {}", e),
            RecognitionError::NotAllowed(e) => write!(f, "recognition not allowed: {}", e),
            RecognitionError::Other(e) => write!(f, "{}", e),
        }
    }
}

/// Events delivered by the recognition engine
#[derive(Clone, Debug)]
pub enum RecognizerEvent {
    /// The underlying session has started
    SessionStarted,

    /// The underlying session has ended (explicit stop or platform limit)
    SessionEnded,

    /// A recognition result
    ///
    /// `finals` holds fragments the engine considers settled, in arrival
    /// order; `interim` is the current not-yet-finalized text, replacing
    /// any previous interim.
    Result {
        finals: Vec<String>,
        interim: String,
    },

    /// The engine reported an error
    Error(RecognitionError),
}

/// Abstract speech recognition capability
pub trait SpeechRecognizer: Send {
    /// Begin a recognition session
    fn start(&mut self) -> crate::Result<()>;

    /// End the current recognition session
    fn stop(&mut self) -> crate::Result<()>;
}

/// Recognizer used when no platform engine is wired in
///
/// Starting it immediately reports a session that ends without results, so
/// the UI stays usable in text-only mode.
pub struct NullRecognizer {
    config: RecognizerConfig,
    event_tx: Sender<RecognizerEvent>,
}

impl NullRecognizer {
    pub fn new(config: RecognizerConfig) -> (Self, Receiver<RecognizerEvent>) {
        let (event_tx, event_rx) = bounded(16);
        (Self { config, event_tx }, event_rx)
    }
}

impl SpeechRecognizer for NullRecognizer {
    fn start(&mut self) -> crate::Result<()> {
        warn!(
            "No speech recognition engine available for locale {}; voice input disabled",
            self.config.locale
        );
        let _ = self.event_tx.send(RecognizerEvent::Error(
            RecognitionError::NotAllowed("no recognition engine available".to_string()),
        ));
        Ok(())
    }

    fn stop(&mut self) -> crate::Result<()> {
        let _ = self.event_tx.send(RecognizerEvent::SessionEnded);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_platform_settings() {
        let config = RecognizerConfig::default();
        assert!(config.continuous);
        assert!(config.interim_results);
        assert_eq!(config.max_alternatives, 1);
        assert_eq!(config.locale, "en-US");
    }

    #[test]
    fn test_only_no_speech_is_transient() {
        assert!(RecognitionError::NoSpeech.is_transient());
        assert!(!RecognitionError::AudioCapture("gone".into()).is_transient());
        assert!(!RecognitionError::Other("network".into()).is_transient());
    }

    #[test]
    fn test_null_recognizer_reports_unavailable() {
        let (mut rec, events) = NullRecognizer::new(RecognizerConfig::default());
        rec.start().unwrap();
        match events.try_recv().unwrap() {
            RecognizerEvent::Error(e) => assert!(!e.is_transient()),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
