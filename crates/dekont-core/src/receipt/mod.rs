//! Receipt field extraction module.

mod parser;
pub mod report;
pub mod rules;

pub use parser::{CascadeParser, ParseOutcome};
pub use report::{assemble, assemble_with, ReportStyle};

use crate::models::receipt::ExtractionResult;

/// Trait for receipt field extractors.
pub trait ReceiptExtractor {
    /// Resolve the transaction fields of a receipt text.
    fn extract(&self, text: &str) -> ExtractionResult;

    /// Resolve the fields and render them as a report.
    ///
    /// An empty string means no field was recognized.
    fn extract_report(&self, text: &str) -> String;
}

/// Extract the plain report from receipt text using every built-in profile.
pub fn extract_fields(text: &str) -> String {
    assemble(&CascadeParser::new().resolve(text))
}
