//! Core library for Turkish bank receipt (dekont) processing.
//!
//! This crate provides:
//! - Field extraction from receipt text (recipient, sender, description,
//!   amount, date) across several bank layouts
//! - Report rendering with fixed Turkish labels
//! - PDF text extraction of the first receipt page (feature `pdf`)

pub mod error;
pub mod models;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod receipt;

pub use error::{DekontError, PatternError, PdfError, Result};
pub use models::config::DekontConfig;
pub use models::receipt::{BankId, ExtractionResult, FieldKind, FieldOrigin, MatchSource};
#[cfg(feature = "pdf")]
pub use pdf::{receipt_text_from_path, PdfExtractor, PdfProcessor};
pub use receipt::{extract_fields, CascadeParser, ParseOutcome, ReceiptExtractor, ReportStyle};
