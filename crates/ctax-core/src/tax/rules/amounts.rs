//! Locale-aware parsing of amounts and percentages.

use super::text::strip_currency_symbols;

/// Parse an amount such as `"1.234,56"`, `"1,234.56"` or `"12,50 €"`.
///
/// The decimal separator is whichever of `,` / `.` sits two or three
/// characters from the end (comma checked first); the other one is treated as
/// a grouping separator and dropped. Otherwise the string is parsed as-is.
pub fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = strip_currency_symbols(s)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let cleaned = cleaned.trim_end_matches(',');

    let normalized = if separator_is_decimal(cleaned, ',') {
        cleaned.replace('.', "").replace(',', ".")
    } else if separator_is_decimal(cleaned, '.') {
        cleaned.replace(',', "")
    } else {
        cleaned.to_string()
    };

    parse_finite(&normalized)
}

/// Parse a percentage such as `"20%"`, `"5,5 %"` or `"8"`.
pub fn parse_percentage(s: &str) -> Option<f64> {
    let normalized: String = s
        .chars()
        .filter(|c| *c != '%' && !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    parse_finite(&normalized)
}

fn separator_is_decimal(s: &str, separator: char) -> bool {
    s.rfind(separator)
        .map(|pos| matches!(s[pos..].chars().count(), 2 | 3))
        .unwrap_or(false)
}

// `f64::from_str` accepts "inf" and "NaN"; OCR text must contain real digits.
fn parse_finite(s: &str) -> Option<f64> {
    if !s.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}
