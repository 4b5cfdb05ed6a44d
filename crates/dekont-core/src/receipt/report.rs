//! Rendering of extraction results into the labeled report.

use serde::{Deserialize, Serialize};

use crate::models::receipt::{ExtractionResult, FieldKind};

/// Currency label appended to the amount line.
pub const CURRENCY_SUFFIX: &str = "TL";

/// How report labels are decorated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStyle {
    /// `Alıcı: value`
    #[default]
    Plain,
    /// `**Alıcı**: value`, for chat hosts that render markdown.
    Markdown,
}

/// Fixed display label of a field.
pub fn label(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Description => "Açıklama",
        FieldKind::Recipient => "Alıcı",
        FieldKind::Sender => "Gönderen",
        FieldKind::Amount => "İşlem Tutarı",
        FieldKind::Date => "İşlem Tarihi",
    }
}

/// Render a result in the plain style.
///
/// Returns an empty string when no field was recognized.
pub fn assemble(result: &ExtractionResult) -> String {
    assemble_with(result, ReportStyle::Plain)
}

/// Render the non-empty fields one per line in presentation order.
pub fn assemble_with(result: &ExtractionResult, style: ReportStyle) -> String {
    if result.is_empty() {
        return String::new();
    }

    FieldKind::REPORT_ORDER
        .into_iter()
        .filter_map(|kind| {
            let value = result.get(kind);
            if value.is_empty() {
                return None;
            }
            let label = match style {
                ReportStyle::Plain => label(kind).to_string(),
                ReportStyle::Markdown => format!("**{}**", label(kind)),
            };
            Some(match kind {
                FieldKind::Amount => format!("{}: {} {}", label, value, CURRENCY_SUFFIX),
                _ => format!("{}: {}", label, value),
            })
        })
        .collect::<Vec<_>>()
        .join("\n")
}
