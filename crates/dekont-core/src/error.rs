//! Error types for the dekont-core library.
//!
//! Field extraction itself never fails: a receipt with no recognizable
//! fields produces an empty report. The variants here cover the pattern
//! registry (startup) and the PDF-to-text boundary.

use thiserror::Error;

use crate::models::receipt::{BankId, FieldKind};

/// Main error type for the dekont library.
#[derive(Error, Debug)]
pub enum DekontError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// A bank profile failed to compile.
    #[error("pattern error: {0}")]
    Pattern(#[from] PatternError),

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

/// Errors raised while building the pattern registry.
#[derive(Error, Debug)]
pub enum PatternError {
    /// A declared label did not compile into a valid regex.
    #[error("malformed {field} pattern for {bank}: {source}")]
    Malformed {
        bank: BankId,
        field: FieldKind,
        #[source]
        source: regex::Error,
    },
}

/// Result type for the dekont library.
pub type Result<T> = std::result::Result<T, DekontError>;
