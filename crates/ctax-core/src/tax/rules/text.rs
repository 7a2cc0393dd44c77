//! Diacritic, case and currency folding shared by every matching step.

use std::ops::Range;

use unicode_normalization::UnicodeNormalization;

/// Currency glyphs removed before any numeric parsing.
pub const CURRENCY_SYMBOLS: &[char] = &[
    '$', '¢', '£', '¤', '¥', '֏', '؋', '৳', '฿', '៛', '₠', '₡', '₢', '₣', '₤', '₥', '₦', '₧',
    '₨', '₩', '₪', '₫', '€', '₭', '₮', '₯', '₰', '₱', '₲', '₳', '₴', '₵', '₶', '₷', '₸', '₹',
    '₺', '₻', '₼', '₽', '₾', '₿', '﷼',
];

// Combining diacritical marks, their extended and supplement blocks, the
// marks for symbols, and the combining half marks.
fn is_stripped_mark(c: char) -> bool {
    matches!(
        c,
        '\u{0300}'..='\u{036F}'
            | '\u{1AB0}'..='\u{1AFF}'
            | '\u{1DC0}'..='\u{1DFF}'
            | '\u{20D0}'..='\u{20FF}'
            | '\u{FE20}'..='\u{FE2F}'
    )
}

/// Remove diacritics: decompose, drop combining marks, recompose.
///
/// Idempotent: applying it twice yields the same string as applying it once.
pub fn strip_diacritics(s: &str) -> String {
    s.nfd().filter(|c| !is_stripped_mark(*c)).nfc().collect()
}

/// [`strip_diacritics`] over raw bytes; invalid UTF-8 sequences become U+FFFD.
pub fn strip_diacritics_lossy(bytes: &[u8]) -> String {
    strip_diacritics(&String::from_utf8_lossy(bytes))
}

/// Remove all known currency symbols, leaving digits and letters untouched.
pub fn strip_currency_symbols(s: &str) -> String {
    s.chars().filter(|c| !CURRENCY_SYMBOLS.contains(c)).collect()
}

fn fold_char(c: char) -> String {
    let mut buf = [0u8; 4];
    strip_diacritics(c.encode_utf8(&mut buf)).to_lowercase()
}

/// Diacritic- and case-insensitive form of `s`, used for comparisons.
pub fn fold(s: &str) -> String {
    s.chars().map(fold_char).collect()
}

/// Folded view of a string that remembers where each folded byte came from.
#[derive(Debug, Clone)]
pub struct FoldedText<'a> {
    source: &'a str,
    folded: String,
    // origin[i] is the source byte offset that produced folded byte i;
    // origin[folded.len()] == source.len().
    origin: Vec<usize>,
}

impl<'a> FoldedText<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut folded = String::with_capacity(source.len());
        let mut origin = Vec::with_capacity(source.len() + 1);

        for (offset, c) in source.char_indices() {
            let piece = fold_char(c);
            origin.extend(std::iter::repeat_n(offset, piece.len()));
            folded.push_str(&piece);
        }
        origin.push(source.len());

        Self {
            source,
            folded,
            origin,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.folded
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Slice of the source text that folded into `range`.
    pub fn source_span(&self, range: Range<usize>) -> &'a str {
        let start = self.origin[range.start];
        let end = self.origin[range.end];
        &self.source[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_diacritics() {
        assert_eq!(strip_diacritics("Taxe réduite"), "Taxe reduite");
        assert_eq!(strip_diacritics("Podatek należny"), "Podatek nalezny");
        assert_eq!(strip_diacritics("IVA común"), "IVA comun");
        // Decomposed input (e + combining acute)
        assert_eq!(strip_diacritics("cafe\u{0301}"), "cafe");
        // Combining half marks
        assert_eq!(strip_diacritics("ab\u{FE20}c"), "abc");
    }

    #[test]
    fn test_strip_diacritics_idempotent() {
        for s in [
            "Taxe réduite",
            "ÅÄÖ åäö",
            "n\u{0303}o\u{0308}\u{0301}",
            "한국어 세금",
            "x\u{20DD}y",
            "",
        ] {
            let once = strip_diacritics(s);
            assert_eq!(strip_diacritics(&once), once, "input: {:?}", s);
        }
    }

    #[test]
    fn test_strip_diacritics_lossy() {
        let bytes = b"TVA \xff r\xc3\xa9duite";
        assert_eq!(strip_diacritics_lossy(bytes), "TVA \u{FFFD} reduite");
    }

    #[test]
    fn test_strip_currency_symbols() {
        assert_eq!(strip_currency_symbols("12,50 €"), "12,50 ");
        assert_eq!(strip_currency_symbols("$1,234.56"), "1,234.56");
        assert_eq!(strip_currency_symbols("£5 ¥6 ₹7 ₽8 ₿9"), "5 6 7 8 9");
        assert_eq!(strip_currency_symbols("TVA 20%"), "TVA 20%");
    }

    #[test]
    fn test_fold() {
        assert_eq!(fold("TAXE Réduite"), "taxe reduite");
        assert_eq!(fold("MwSt"), "mwst");
    }

    #[test]
    fn test_folded_text_maps_back_to_source() {
        let text = FoldedText::new("Total Taxe Réduite 5,5%");
        let folded = text.as_str();
        assert_eq!(folded, "total taxe reduite 5,5%");

        let start = folded.find("reduite").unwrap();
        assert_eq!(text.source_span(start..start + "reduite".len()), "Réduite");
    }

    #[test]
    fn test_folded_text_keeps_combining_marks_in_span() {
        let text = FoldedText::new("Re\u{0301}duite X");
        let folded = text.as_str();
        assert_eq!(folded, "reduite x");

        let end = "reduite".len();
        assert_eq!(text.source_span(0..end), "Re\u{0301}duite");
    }
}
