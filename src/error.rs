//! Error handling and custom error types
//!
//! Provides unified error handling across the service using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Missing, blank or rejected provider credential, or an unusable setting.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Template error: {0}")]
    Template(String),

    /// The text model's output did not match the requested structure.
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Expected {expected} image prompts but the model returned {actual}")]
    PromptCountMismatch { expected: usize, actual: usize },

    #[error("Image generation error: {0}")]
    ImageGeneration(String),

    #[error("AI provider error: {0}")]
    AiProvider(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    /// True for errors the HTTP layer reports as an authentication failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
