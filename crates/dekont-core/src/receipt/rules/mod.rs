//! Rule-based field extractors for bank receipts.

pub mod amounts;
pub mod normalize;
pub mod patterns;
pub mod profiles;

pub use amounts::CurrencyAmountScanner;
pub use normalize::normalize_value;
pub use profiles::{BankProfile, FieldPattern, PatternRegistry, ProfileSpec};

use regex::Captures;

use crate::models::receipt::{FieldOrigin, MatchSource};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// First occurrence in text order whose value survives normalization.
    fn extract(&self, text: &str) -> Option<ExtractionMatch> {
        self.extract_all(text).into_iter().next()
    }

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<ExtractionMatch>;
}

/// Confidence of a match anchored on a bank-specific label.
pub const PROFILE_CONFIDENCE: f32 = 0.95;

/// Confidence of a match anchored on a generic label.
pub const GENERIC_CONFIDENCE: f32 = 0.8;

/// Confidence of an unlabeled number found next to a currency marker.
pub const SCAN_CONFIDENCE: f32 = 0.5;

/// A normalized value together with where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch {
    pub value: String,
    pub confidence: f32,
    /// Byte range of the raw value in the source text.
    pub span: (usize, usize),
    /// Whole matched text, label included.
    pub matched: String,
}

impl ExtractionMatch {
    /// Build a match from a single-capture pattern hit.
    ///
    /// `None` when the captured value normalizes to nothing.
    pub(crate) fn from_captures(caps: &Captures<'_>, confidence: f32) -> Option<Self> {
        let raw = caps.get(1)?;
        let value = normalize_value(raw.as_str());
        if value.is_empty() {
            return None;
        }

        Some(Self {
            value,
            confidence,
            span: (raw.start(), raw.end()),
            matched: caps.get(0)?.as_str().trim_end().to_string(),
        })
    }

    /// Split into the value and the provenance recorded on the result.
    pub fn into_origin(self, source: MatchSource) -> (String, FieldOrigin) {
        let origin = FieldOrigin {
            source,
            confidence: self.confidence,
            matched: self.matched,
            span: self.span,
        };
        (self.value, origin)
    }
}
