//! Label-free amount scan used when no labeled amount was found.
//!
//! Any number immediately followed by a currency marker qualifies, so this is
//! less precise than the label-anchored profile patterns and only runs last.

use super::patterns::CURRENCY_AMOUNT;
use super::{ExtractionMatch, FieldExtractor, SCAN_CONFIDENCE};

/// Finds bare `<number> TL` / `<number> ₺` occurrences.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrencyAmountScanner;

impl CurrencyAmountScanner {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for CurrencyAmountScanner {
    fn extract_all(&self, text: &str) -> Vec<ExtractionMatch> {
        CURRENCY_AMOUNT
            .captures_iter(text)
            .filter_map(|caps| ExtractionMatch::from_captures(&caps, SCAN_CONFIDENCE))
            .collect()
    }
}
