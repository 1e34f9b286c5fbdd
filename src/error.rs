use std::path::PathBuf;

use thiserror::Error;

use crate::sections::SectionKey;

#[derive(Error, Debug)]
pub enum FilingInsightsError {
    #[error("Invalid heading pattern for section {key}: {source}")]
    InvalidSectionPattern {
        key: SectionKey,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid text cleanup pattern: {0}")]
    CleanupPattern(#[source] regex::Error),

    #[error("Document not found: {0}")]
    DocumentNotFound(PathBuf),

    #[error("PDF text extraction failed: {0}")]
    PdfExtraction(String),

    #[error("Model request failed: {0}")]
    ModelRequest(String),

    #[error("Model response has an unexpected shape: {0}")]
    UnexpectedResponseShape(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "ollama")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, FilingInsightsError>;
