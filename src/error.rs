use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookDistillerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Book source not found: {path}")]
    SourceNotFound { path: String },

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Page {index} is out of range for a document with {pages} pages")]
    PageOutOfRange { index: usize, pages: usize },

    #[error("Model API error [{status}]: {message}")]
    Api { status: u16, message: String },

    #[error("Unusable model response: {reason}")]
    ModelResponse { reason: String },

    #[error("Checkpoint error: {reason}")]
    Checkpoint { reason: String },

    #[error("Summary write error: {reason}")]
    SummaryWrite { reason: String },

    #[error("HTTP status error: {status}")]
    HttpStatus { status: u16 },

    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, BookDistillerError>;
