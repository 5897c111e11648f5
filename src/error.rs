use serde::Serialize;
use thiserror::Error;

/// A single rejected field of a recipe submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Errors that can occur while scraping, downloading or importing recipes
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// The supplied address is not an absolute http(s) URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The remote site did not answer within the configured timeout
    #[error("Request timeout - the website took too long to respond")]
    Timeout,

    /// The remote site answered with a non-success status
    #[error("Failed to fetch URL: {status} {reason}")]
    HttpStatus { status: u16, reason: String },

    /// Transport-level failure (DNS, TLS, connection reset...)
    #[error("Failed to fetch URL: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Downloaded resource is not an image
    #[error("URL does not point to an image (content-type: {0})")]
    NotAnImage(String),

    /// Downloaded image exceeds the configured size limit
    #[error("Image size must be less than {limit} bytes (got at least {size})")]
    ImageTooLarge { size: usize, limit: usize },

    /// The object store rejected an upload
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem error while reading an export archive
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A result could not be encoded as JSON
    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Recipe submission failed validation
    #[error("Invalid recipe: {}", format_field_errors(.0))]
    Validation(Vec<FieldError>),
}

impl ScrapeError {
    /// Short machine-friendly reason, distinguishing the failure classes a
    /// caller may want to branch on
    pub fn reason(&self) -> &'static str {
        match self {
            ScrapeError::InvalidUrl(_) => "invalid-url",
            ScrapeError::Timeout => "timeout",
            ScrapeError::HttpStatus { .. } => "http-status",
            ScrapeError::Fetch(_) => "fetch-failed",
            ScrapeError::NotAnImage(_) => "not-an-image",
            ScrapeError::ImageTooLarge { .. } => "image-too-large",
            ScrapeError::Storage(_) => "storage",
            ScrapeError::Io(_) => "io",
            ScrapeError::Json(_) => "json",
            ScrapeError::Config(_) => "config",
            ScrapeError::Validation(_) => "validation",
        }
    }

    /// Classify a reqwest failure, keeping timeouts apart from other transport errors
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ScrapeError::Timeout
        } else {
            ScrapeError::Fetch(err)
        }
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}
