//! Application configuration
//!
//! Central configuration for the backend client, speech capture timing,
//! and speech synthesis voice parameters.

use crate::{ParleyError, Result};
use std::time::Duration;

/// Environment variable that overrides the backend URL
pub const BACKEND_URL_ENV: &str = "PARLEY_BACKEND_URL";

/// Configuration for the complete application
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// URL of the assistant backend chat endpoint
    pub backend_url: String,

    /// How long a backend request may take before the turn fails
    pub request_timeout: Duration,

    /// How long the recognizer may stay quiet before listening auto-stops
    pub silence_timeout: Duration,

    /// Debounce window for coalescing trailing final fragments into one turn
    pub submit_delay: Duration,

    /// Locale for speech recognition and synthesis
    pub locale: String,

    /// Speech synthesis rate (1.0 = normal)
    pub speech_rate: f32,

    /// Speech synthesis pitch (1.0 = normal)
    pub speech_pitch: f32,

    /// Number of characters of the first user message used as a chat title
    pub title_len: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:3001/chat".to_string(),
            request_timeout: Duration::from_secs(5),
            silence_timeout: Duration::from_secs(10),
            submit_delay: Duration::from_secs(1),
            locale: "en-US".to_string(),
            speech_rate: 1.0,
            speech_pitch: 1.0,
            title_len: 20,
        }
    }
}

impl AppConfig {
    /// Create a configuration, honoring environment overrides
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.is_empty() {
                config.backend_url = url;
            }
        }
        config
    }

    /// Set the backend URL
    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = url.into();
        self
    }

    /// Set the backend request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the silence auto-stop timeout
    pub fn with_silence_timeout(mut self, timeout: Duration) -> Self {
        self.silence_timeout = timeout;
        self
    }

    /// Set the submission debounce window
    pub fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = delay;
        self
    }

    /// Set the recognition/synthesis locale
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Set the synthesis speech rate
    pub fn with_speech_rate(mut self, rate: f32) -> Self {
        self.speech_rate = rate;
        self
    }

    /// Set the synthesis speech pitch
    pub fn with_speech_pitch(mut self, pitch: f32) -> Self {
        self.speech_pitch = pitch;
        self
    }

    /// Set the chat-title length limit
    pub fn with_title_len(mut self, len: usize) -> Self {
        self.title_len = len;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.backend_url.is_empty() {
            return Err(ParleyError::ConfigError(
                "Backend URL is required".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(ParleyError::ConfigError(
                "Request timeout must be non-zero".to_string(),
            ));
        }
        if self.silence_timeout < self.submit_delay {
            return Err(ParleyError::ConfigError(
                "Silence timeout must not be shorter than the submit delay".to_string(),
            ));
        }
        if self.speech_rate <= 0.0 || self.speech_pitch <= 0.0 {
            return Err(ParleyError::ConfigError(
                "Speech rate and pitch must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
