pub mod backend;
pub mod chat;
pub mod config;
pub mod image;
pub mod roles;
pub mod speech;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ParleyError {
    #[error("Recognizer error: {0}")]
    RecognizerError(String),

    #[error("Synthesis error: {0}")]
    SynthesisError(String),

    #[error("Backend error: {0}")]
    BackendError(String),

    #[error("Backend request timed out")]
    BackendTimeout,

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("IO error: {0}")]
    IOError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),
}

impl From<std::io::Error> for ParleyError {
    fn from(e: std::io::Error) -> Self {
        ParleyError::IOError(e.to_string())
    }
}

impl ParleyError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Recognizer and synthesis hiccups leave the UI usable
            ParleyError::RecognizerError(_) => true,
            ParleyError::SynthesisError(_) => true,
            // A failed turn is retried by the user, not the client
            ParleyError::BackendError(_) => true,
            ParleyError::BackendTimeout => true,
            ParleyError::ImageError(_) => true,
            ParleyError::IOError(_) => false,
            ParleyError::ConfigError(_) => false,
            ParleyError::ChannelError(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            ParleyError::RecognizerError(_) => {
                "Speech recognition failed. Please try again.".to_string()
            }
            ParleyError::SynthesisError(_) => {
                "Text-to-speech failed. Response will be shown as text.".to_string()
            }
            ParleyError::BackendError(_) => {
                "The assistant could not be reached. Please try again.".to_string()
            }
            ParleyError::BackendTimeout => {
                "The assistant took too long to respond. Please try again.".to_string()
            }
            ParleyError::ImageError(_) => "The selected image could not be read.".to_string(),
            ParleyError::IOError(_) => "File system error occurred.".to_string(),
            ParleyError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            ParleyError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ParleyError>;
