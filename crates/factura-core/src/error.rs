//! Error types for the factura-core library.
//!
//! Text extraction never fails; these errors only cover reading documents
//! and configuration.

use thiserror::Error;

/// Main error type for the factura library.
#[derive(Error, Debug)]
pub enum FacturaError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

impl From<serde_json::Error> for FacturaError {
    fn from(err: serde_json::Error) -> Self {
        FacturaError::Config(err.to_string())
    }
}

/// Result type for the factura library.
pub type Result<T> = std::result::Result<T, FacturaError>;
