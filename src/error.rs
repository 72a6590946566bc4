//! Error types for briefly-rs
//!
//! This module provides error handling for every stage of the summarization pipeline:
//! text extraction, transcripts, translation, model inference, storage and auth.

use thiserror::Error;

/// Main error type for briefly operations
#[derive(Error, Debug)]
pub enum BrieflyError {
    /// Missing or unusable user input (empty text, bad URL, bad parameters)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Text could not be extracted from an uploaded document
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// PDF processing errors
    #[error("PDF processing error: {0}")]
    Pdf(String),

    /// Transcript service errors
    #[error("Transcript error: {0}")]
    Transcript(String),

    /// Translation service errors
    #[error("Translation error: {0}")]
    Translation(String),

    /// Machine learning model errors
    #[error("ML model error: {0}")]
    MachineLearning(String),

    /// Database/storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Unique constraint violations (duplicate username or email)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Authentication and session errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// SQLite database errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Candle ML framework errors
    #[error("Candle ML error: {0}")]
    Candle(#[from] candle_core::Error),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic errors
    #[error("Generic error: {0}")]
    Generic(String),
}

/// Result type alias for briefly operations
pub type Result<T> = std::result::Result<T, BrieflyError>;

// Implement From traits for external error types
impl From<tokenizers::Error> for BrieflyError {
    fn from(err: tokenizers::Error) -> Self {
        BrieflyError::MachineLearning(format!("Tokenizer error: {}", err))
    }
}

impl From<lopdf::Error> for BrieflyError {
    fn from(err: lopdf::Error) -> Self {
        BrieflyError::Pdf(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for BrieflyError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        BrieflyError::Auth(err.to_string())
    }
}

impl From<anyhow::Error> for BrieflyError {
    fn from(err: anyhow::Error) -> Self {
        BrieflyError::Generic(err.to_string())
    }
}
