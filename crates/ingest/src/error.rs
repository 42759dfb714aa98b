use thiserror::Error;

/// Why a single document or page produced no text.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF parse error: {0}")]
    Pdf(String),

    #[error("DOCX parse error: {0}")]
    Docx(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
