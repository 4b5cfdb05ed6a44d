//! Cleanup of captured field values into their display form.

use super::patterns::{
    CURRENCY_MARKERS, LEADING_DASHES, LEADING_SEPARATORS, ORDINAL_PREFIX, TRAILING_DASHES,
    TRAILING_SEPARATORS,
};

/// Strip decoration from the ends of a captured value.
///
/// Removes separator runs, a currency marker, a list-number prefix such as
/// `"1. "` and dash decoration, then trims. The interior of the value is
/// never touched. The passes repeat until nothing changes, so the function
/// is idempotent.
pub fn normalize_value(raw: &str) -> String {
    let mut current = normalize_pass(raw);
    loop {
        let next = normalize_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_pass(value: &str) -> String {
    let value = LEADING_SEPARATORS.replace(value, "");
    let value = TRAILING_SEPARATORS.replace(&value, "");
    let value = strip_currency_prefix(&value);
    let value = strip_currency_suffix(value);
    let value = ORDINAL_PREFIX.replace(value, "");
    let value = LEADING_DASHES.replace(&value, "");
    let value = TRAILING_DASHES.replace(&value, "");

    value.trim().to_string()
}

/// Remove a leading currency marker. `TL` only counts when no letter follows
/// it, so `TL1000.00` loses the marker and `TLC Lojistik` is kept.
fn strip_currency_prefix(value: &str) -> &str {
    for marker in CURRENCY_MARKERS {
        let Some(head) = value.get(..marker.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(marker) {
            continue;
        }
        let rest = &value[marker.len()..];
        if is_word(marker) && rest.chars().next().is_some_and(char::is_alphabetic) {
            continue;
        }
        return rest.trim_start();
    }
    value
}

/// Remove a trailing currency marker unless it ends a longer word.
fn strip_currency_suffix(value: &str) -> &str {
    for marker in CURRENCY_MARKERS {
        let Some(split) = value.len().checked_sub(marker.len()) else {
            continue;
        };
        let Some(tail) = value.get(split..) else {
            continue;
        };
        if !tail.eq_ignore_ascii_case(marker) {
            continue;
        }
        let rest = &value[..split];
        if is_word(marker) && rest.chars().last().is_some_and(char::is_alphabetic) {
            continue;
        }
        return rest.trim_end();
    }
    value
}

fn is_word(marker: &str) -> bool {
    marker.chars().all(char::is_alphabetic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_remove_leading_colons_and_spaces() {
        assert_eq!(normalize_value(":  Test Value"), "Test Value");
    }

    #[test]
    fn test_remove_trailing_colons_and_dashes() {
        assert_eq!(normalize_value("Test Value  :-"), "Test Value");
    }

    #[test]
    fn test_remove_line_numbers() {
        assert_eq!(normalize_value("1. Company Name Ltd."), "Company Name Ltd.");
        assert_eq!(normalize_value("1. Acme Corp. -"), "Acme Corp.");
    }

    #[test]
    fn test_remove_currency_markers() {
        assert_eq!(normalize_value("TL 1000.00 ₺"), "1000.00");
        assert_eq!(normalize_value("500.00TL"), "500.00");
        assert_eq!(normalize_value("₺250"), "250");
    }

    #[test]
    fn test_currency_inside_words_is_kept() {
        assert_eq!(normalize_value("TLC Lojistik"), "TLC Lojistik");
        assert_eq!(normalize_value("Kartal"), "Kartal");
        assert_eq!(normalize_value("Kartl"), "Kartl");
    }

    #[test]
    fn test_currency_glued_to_amount() {
        assert_eq!(normalize_value("TL1000.00"), "1000.00");
        assert_eq!(normalize_value("₺1.250,00"), "1.250,00");
        assert_eq!(normalize_value("1000.00TL"), "1000.00");
        assert_eq!(normalize_value("TLC Lojistik"), "TLC Lojistik");
    }

    #[test]
    fn test_remove_extended_dashes() {
        assert_eq!(normalize_value("- Test Company -"), "Test Company");
        assert_eq!(normalize_value("— Test Company –"), "Test Company");
    }

    #[test]
    fn test_complex_cleaning() {
        assert_eq!(normalize_value(": 2. - Test Value TL :"), "Test Value");
    }

    #[test]
    fn test_interior_is_untouched() {
        assert_eq!(normalize_value("E-ticaret - Mağaza: Şube 2"), "E-ticaret - Mağaza: Şube 2");
        assert_eq!(normalize_value("Teknoloji A.Ş."), "Teknoloji A.Ş.");
    }

    #[test]
    fn test_amounts_survive() {
        assert_eq!(normalize_value("1.234.567,89"), "1.234.567,89");
        assert_eq!(normalize_value("30.07.2025 14:30:25"), "30.07.2025 14:30:25");
    }

    #[test]
    fn test_empty_and_decoration_only() {
        assert_eq!(normalize_value(""), "");
        assert_eq!(normalize_value(":- TL ₺"), "");
        assert_eq!(normalize_value("  —  "), "");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            ":  Test Value",
            "1. 2. Nested Ordinals",
            "1. TL Foo",
            "- TL - 3. Bar ₺ -",
            ": 2. - Test Value TL :",
            "TL",
            "  Mehmet Yılmaz  ",
            "1.234,56 TL",
        ];

        for sample in samples {
            let once = normalize_value(sample);
            assert_eq!(normalize_value(&once), once, "input: {sample:?}");
        }
    }
}
