//! Cascade parser resolving each receipt field across the bank profiles.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::models::receipt::{BankId, ExtractionResult, FieldKind, FieldOrigin, MatchSource};

use super::report::{assemble_with, ReportStyle};
use super::rules::{FieldExtractor, PatternRegistry};
use super::ReceiptExtractor;

/// Result of parsing one receipt text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseOutcome {
    /// Resolved field values.
    pub result: ExtractionResult,
    /// Rendered report (empty when nothing was recognized).
    pub report: String,
    /// Fields that could not be resolved.
    pub missing: Vec<FieldKind>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Resolves every field independently: bank profiles in registry order,
/// then the generic profile, then (amounts only) the currency scan.
#[derive(Debug, Clone)]
pub struct CascadeParser<'r> {
    registry: &'r PatternRegistry,
    /// Bank profiles to consult; `None` means all of them.
    banks: Option<Vec<BankId>>,
    style: ReportStyle,
}

impl CascadeParser<'static> {
    /// Create a parser over the process-wide registry.
    pub fn new() -> Self {
        Self::with_registry(PatternRegistry::global())
    }
}

impl<'r> CascadeParser<'r> {
    /// Create a parser over an explicit registry.
    pub fn with_registry(registry: &'r PatternRegistry) -> Self {
        Self {
            registry,
            banks: None,
            style: ReportStyle::Plain,
        }
    }

    /// Only consult the given bank profiles. Precedence still follows the
    /// registry, not the order of `banks`.
    pub fn with_banks(mut self, banks: &[BankId]) -> Self {
        self.banks = Some(banks.to_vec());
        self
    }

    /// Set the label style of rendered reports.
    pub fn with_style(mut self, style: ReportStyle) -> Self {
        self.style = style;
        self
    }

    pub fn registry(&self) -> &'r PatternRegistry {
        self.registry
    }

    fn is_enabled(&self, bank: BankId) -> bool {
        self.banks.as_ref().is_none_or(|banks| banks.contains(&bank))
    }

    /// Resolve a single field through the cascade.
    pub fn resolve_field(&self, text: &str, kind: FieldKind) -> Option<(String, FieldOrigin)> {
        for profile in self.registry.profiles() {
            if !self.is_enabled(profile.bank()) {
                continue;
            }
            let Some(pattern) = profile.pattern(kind) else {
                continue;
            };
            if let Some(found) = pattern.extract(text) {
                return Some(found.into_origin(MatchSource::Profile(profile.bank())));
            }
        }

        if let Some(found) = self
            .registry
            .generic()
            .pattern(kind)
            .and_then(|pattern| pattern.extract(text))
        {
            return Some(found.into_origin(MatchSource::Generic));
        }

        if kind == FieldKind::Amount {
            if let Some(found) = self.registry.amount_scan().extract(text) {
                return Some(found.into_origin(MatchSource::AmountScan));
            }
        }

        None
    }

    /// Resolve all five fields.
    pub fn resolve(&self, text: &str) -> ExtractionResult {
        let mut result = ExtractionResult::new();

        for kind in FieldKind::ALL {
            if let Some((value, origin)) = self.resolve_field(text, kind) {
                debug!(
                    "Resolved {} from {} (confidence {:.2})",
                    kind, origin.source, origin.confidence
                );
                result.set(kind, value, origin);
            }
        }

        result
    }

    /// Resolve all fields and render the report.
    pub fn parse(&self, text: &str) -> ParseOutcome {
        let start = Instant::now();

        debug!("Parsing receipt from {} characters of text", text.len());

        let result = self.resolve(text);
        let report = assemble_with(&result, self.style);

        if result.is_empty() {
            debug!("No transaction fields recognized");
            trace!("Text preview: {:?}", preview(text, 200));
        } else {
            debug!("Extracted {} of {} fields", result.found_count(), FieldKind::ALL.len());
        }

        ParseOutcome {
            missing: result.missing_fields(),
            result,
            report,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

impl Default for CascadeParser<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptExtractor for CascadeParser<'_> {
    fn extract(&self, text: &str) -> ExtractionResult {
        self.resolve(text)
    }

    fn extract_report(&self, text: &str) -> String {
        assemble_with(&self.resolve(text), self.style)
    }
}

/// First `max_chars` characters of `text`.
fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
