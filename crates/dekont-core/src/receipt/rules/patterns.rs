//! Common regex fragments and patterns for receipt field extraction.
//!
//! Bank labels are declared as plain upper-case text and expanded by
//! [`fold_label`] into fragments that tolerate Turkish letter variants,
//! so `İŞLEM`, `ISLEM`, `işlem` and `IŞLEM` all match the same label.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::receipt::FieldKind;

/// Numeric run captured as an amount: digits with `.`/`,` grouping and an
/// optional two-digit fraction. Both `1.234.567,89` and `1,234.56` match.
pub const AMOUNT_NUMBER: &str = r"[0-9]+(?:[.,][0-9]{1,3})*(?:[.,][0-9]{2})?";

/// Optional separator between a label and its value.
pub const SEPARATOR: &str = r"[ \t]*(?:[:=>\-–—]+[ \t]*)?";

/// Currency markers recognized after amounts and stripped from values.
pub const CURRENCY_MARKERS: [&str; 2] = ["TL", "₺"];

lazy_static! {
    // Last-resort amount scan: a bare number directly followed by a currency marker
    pub static ref CURRENCY_AMOUNT: Regex = Regex::new(
        &format!(r"(?i)({AMOUNT_NUMBER})[ \t]*(?:TL\b|₺)")
    ).unwrap();

    // Normalizer edges
    pub static ref LEADING_SEPARATORS: Regex = Regex::new(r"^[:\-\s]+").unwrap();

    pub static ref TRAILING_SEPARATORS: Regex = Regex::new(r"[:\-\s]+$").unwrap();

    pub static ref ORDINAL_PREFIX: Regex = Regex::new(r"^\d+\.\s+").unwrap();

    pub static ref LEADING_DASHES: Regex = Regex::new(r"^\s*[-–—]+\s*").unwrap();

    pub static ref TRAILING_DASHES: Regex = Regex::new(r"\s*[-–—]+\s*$").unwrap();
}

/// Expand a declared label into a case- and diacritic-tolerant fragment.
///
/// Spaces become optional horizontal whitespace and `/` an optional slash,
/// everything else that is not a foldable letter is escaped literally.
pub fn fold_label(label: &str) -> String {
    let mut fragment = String::with_capacity(label.len() * 4);

    for c in label.chars() {
        match c {
            'I' | 'İ' | 'ı' | 'i' | 'Î' | 'î' => fragment.push_str("[IİıÎî]"),
            'S' | 'Ş' | 's' | 'ş' => fragment.push_str("[SŞ]"),
            'C' | 'Ç' | 'c' | 'ç' => fragment.push_str("[CÇ]"),
            'G' | 'Ğ' | 'g' | 'ğ' => fragment.push_str("[GĞ]"),
            'O' | 'Ö' | 'o' | 'ö' => fragment.push_str("[OÖ]"),
            'U' | 'Ü' | 'u' | 'ü' => fragment.push_str("[UÜ]"),
            ' ' => fragment.push_str(r"[ \t]*"),
            '/' => fragment.push_str(r"[ \t]*/?[ \t]*"),
            _ => fragment.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }

    fragment
}

/// Fragment for one label, closed with a word boundary when it ends in a
/// letter so `AÇIKLAMA` does not fire inside `AÇIKLAMASI`.
fn label_fragment(label: &str) -> String {
    let mut fragment = fold_label(label);
    if label.chars().last().is_some_and(char::is_alphanumeric) {
        fragment.push_str(r"\b");
    }
    fragment
}

/// Build the full pattern source for a field from its label alternatives.
///
/// Text fields capture the remainder of the label's line. Amount fields
/// skip to the first numeric run on that line and capture only the number.
pub fn field_pattern(kind: FieldKind, labels: &[&str]) -> String {
    let alternatives: Vec<String> = labels.iter().map(|l| label_fragment(l)).collect();
    let label = format!("(?:{})", alternatives.join("|"));

    match kind {
        FieldKind::Amount => {
            format!(r"(?i)\b{label}{SEPARATOR}[^\r\n]*?({AMOUNT_NUMBER})")
        }
        _ => format!(r"(?i)\b{label}{SEPARATOR}([^\r\n]+)"),
    }
}
