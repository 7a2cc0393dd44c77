//! Reading tax rows laid out left to right.

use regex::{Captures, Regex};
use tracing::{debug, trace};

use crate::models::tax::Candidate;
use crate::ocr::OcrDocument;

use super::amounts::{parse_amount, parse_percentage};
use super::matcher::NameMatcher;
use super::patterns::{NAME_MARK, PERCENT_FIRST, PERCENT_SECOND};
use super::text::{strip_currency_symbols, FoldedText};

/// Where the rate sits relative to the tax name in a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLayout {
    /// `20% TVA 100,00 20,00`
    PercentFirst,
    /// `TVA 20% 100,00 20,00`
    PercentSecond,
}

impl RowLayout {
    fn pattern(self) -> &'static Regex {
        match self {
            RowLayout::PercentFirst => &PERCENT_FIRST,
            RowLayout::PercentSecond => &PERCENT_SECOND,
        }
    }
}

/// Extracts tax candidates from single lines of text.
#[derive(Debug, Clone, Copy)]
pub struct HorizontalExtractor<'m> {
    matcher: &'m NameMatcher,
}

impl<'m> HorizontalExtractor<'m> {
    pub fn new(matcher: &'m NameMatcher) -> Self {
        Self { matcher }
    }

    /// Extract a candidate from one line. `page_id` is left empty.
    pub fn extract_line(&self, line: &str) -> Option<Candidate> {
        let text = strip_currency_symbols(line);
        let folded = FoldedText::new(&text);
        let found = self.matcher.find(folded.as_str())?;

        let mut marked = String::with_capacity(folded.as_str().len());
        marked.push_str(&folded.as_str()[..found.start]);
        marked.push(NAME_MARK);
        marked.push_str(&folded.as_str()[found.end..]);

        let (layout, caps) = probe(&marked)?;
        trace!("Line {:?} matched {:?}", line, layout);

        let mut candidate = Candidate {
            code: Some(folded.source_span(found.start..found.end).trim().to_string()),
            rate: parse_percentage(&caps["rate"]),
            ..Default::default()
        };

        let first = caps.name("first").map(|m| m.as_str());
        let second = caps.name("second").map(|m| m.as_str());
        match (first, second) {
            (Some(base), Some(value)) => {
                candidate.base = parse_amount(base);
                candidate.value = parse_amount(value);
            }
            (Some(value), None) => {
                candidate.value = parse_amount(value);
            }
            _ => {}
        }

        Some(candidate)
    }

}

// Percent-second wins when its rate carries `%` or the line has none at all;
// otherwise a `%` rate directly before the name is tried.
fn probe(marked: &str) -> Option<(RowLayout, Captures<'_>)> {
    let has_percent = marked.contains('%');

    if let Some(caps) = RowLayout::PercentSecond.pattern().captures(marked) {
        if !has_percent || caps["rate"].contains('%') {
            return Some((RowLayout::PercentSecond, caps));
        }
    }

    if has_percent {
        if let Some(caps) = RowLayout::PercentFirst.pattern().captures(marked) {
            return Some((RowLayout::PercentFirst, caps));
        }
    }

    None
}

/// Scan every line of every page. All matching lines become candidates.
pub fn extract_horizontal(document: &OcrDocument, matcher: &NameMatcher) -> Vec<Candidate> {
    let extractor = HorizontalExtractor::new(matcher);
    let mut candidates = Vec::new();

    for (page_id, page) in document.pages.iter().enumerate() {
        for line in page.lines() {
            if let Some(mut candidate) = extractor.extract_line(&line.text()) {
                candidate.page_id = Some(page_id);
                candidates.push(candidate);
            }
        }
    }

    debug!("Found {} horizontal tax candidates", candidates.len());

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::{Page, Polygon, Word};
    use crate::tax::rules::matcher::MatchPolicy;
    use pretty_assertions::assert_eq;

    fn extract(names: &[&str], line: &str) -> Option<Candidate> {
        let matcher = NameMatcher::new(names, MatchPolicy::Earliest);
        HorizontalExtractor::new(&matcher).extract_line(line)
    }

    #[test]
    fn test_percent_second_two_amounts() {
        assert_eq!(
            extract(&["TVA"], "TVA 8% 12.50 100.00"),
            Some(Candidate {
                code: Some("TVA".to_string()),
                page_id: None,
                rate: Some(8.0),
                base: Some(12.5),
                value: Some(100.0),
            })
        );
    }

    #[test]
    fn test_percent_second_single_amount_is_value() {
        assert_eq!(
            extract(&["MwSt"], "MwSt. 19 % 38,00 €"),
            Some(Candidate {
                code: Some("MwSt".to_string()),
                rate: Some(19.0),
                value: Some(38.0),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_percent_first() {
        assert_eq!(
            extract(&["TVA"], "20% TVA 1.000,00 200,00"),
            Some(Candidate {
                code: Some("TVA".to_string()),
                rate: Some(20.0),
                base: Some(1000.0),
                value: Some(200.0),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_code_keeps_document_spelling() {
        let candidate = extract(&["taxe reduite"], "Taxe Réduite 5,5% 10,00 0,55").unwrap();
        assert_eq!(candidate.code.as_deref(), Some("Taxe Réduite"));
        assert_eq!(candidate.rate, Some(5.5));
        assert_eq!(candidate.base, Some(10.0));
        assert_eq!(candidate.value, Some(0.55));
    }

    #[test]
    fn test_rate_without_percent_sign() {
        let candidate = extract(&["IVA"], "IVA 21 210,00").unwrap();
        assert_eq!(candidate.rate, Some(21.0));
        assert_eq!(candidate.value, Some(210.0));
        assert_eq!(candidate.base, None);
    }

    #[test]
    fn test_no_candidate_without_numbers_or_name() {
        assert_eq!(extract(&["TVA"], "TVA non applicable"), None);
        assert_eq!(extract(&["TVA"], "Total HT 100,00"), None);
    }

    #[test]
    fn test_dash_separators() {
        let expected = Some(Candidate {
            code: Some("TVA".to_string()),
            rate: Some(20.0),
            base: Some(100.0),
            value: Some(20.0),
            ..Default::default()
        });
        assert_eq!(extract(&["TVA"], "TVA - 20% 100,00 20,00"), expected);
        assert_eq!(extract(&["TVA"], "TVA 20% - 100,00 20,00"), expected);
        assert_eq!(extract(&["TVA"], "TVA: 20% - 100,00 - 20,00"), expected);
    }

    #[test]
    fn test_attached_minus_is_kept() {
        let candidate = extract(&["TVA"], "Avoir TVA 20% -100,00 -20,00").unwrap();
        assert_eq!(candidate.base, Some(-100.0));
        assert_eq!(candidate.value, Some(-20.0));
    }

    #[test]
    fn test_space_grouped_amounts() {
        assert_eq!(
            extract(&["TVA"], "TVA 20% 1 234,56 246,91"),
            Some(Candidate {
                code: Some("TVA".to_string()),
                rate: Some(20.0),
                base: Some(1234.56),
                value: Some(246.91),
                ..Default::default()
            })
        );
        let candidate = extract(&["VAT"], "VAT 20% 12 000.00").unwrap();
        assert_eq!(candidate.value, Some(12000.0));
        assert_eq!(candidate.base, None);
    }

    #[test]
    fn test_extract_horizontal_records_page_ids() {
        let row = |y: f32| {
            vec![
                Word::new("TVA", 0.9, Polygon::from_rect(0.1, y, 0.2, y + 0.02)),
                Word::new("20%", 0.9, Polygon::from_rect(0.3, y, 0.4, y + 0.02)),
                Word::new("20,00", 0.9, Polygon::from_rect(0.5, y, 0.6, y + 0.02)),
            ]
        };
        let document = OcrDocument::new(vec![
            Page::new(vec![Word::new("Facture", 0.9, Polygon::from_rect(0.1, 0.1, 0.3, 0.12))]),
            Page::new(row(0.5)),
        ]);

        let matcher = NameMatcher::new(&["TVA"], MatchPolicy::Earliest);
        let candidates = extract_horizontal(&document, &matcher);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].page_id, Some(1));
        assert_eq!(candidates[0].value, Some(20.0));
    }
}
