//! Reading tax values from the column under a tax label.

use tracing::{debug, trace};

use crate::models::tax::Candidate;
use crate::ocr::{OcrDocument, Word};

use super::amounts::{parse_amount, parse_percentage};
use super::matcher::NameMatcher;
use super::text::fold;

/// Fill the numeric gaps of `seed` from columns under matching labels.
///
/// Labels are visited page by page in reading order. `code` and `page_id`
/// are taken from the first label whose column holds a number and are never
/// overwritten. The scan stops once `value` is known.
pub fn extract_vertical(
    document: &OcrDocument,
    matcher: &NameMatcher,
    seed: Candidate,
    margin: f32,
) -> Candidate {
    let mut found = seed;

    'pages: for (page_id, page) in document.pages.iter().enumerate() {
        for line in page.lines() {
            for word in line.words() {
                if matcher.find(&fold(&word.text)).is_none() {
                    continue;
                }

                let numbers = column_numbers(page.column_below(&word.polygon, margin));
                trace!(
                    "Label {:?} on page {} has {} numbers below",
                    word.text,
                    page_id,
                    numbers.len()
                );

                match numbers.as_slice() {
                    [] => continue,
                    [only] if found.value.is_none() => found.value = Some(*only),
                    [first, rest @ ..] => {
                        if found.rate.is_none() {
                            found.rate = Some(*first);
                        }
                        if let (Some(second), None) = (rest.first(), found.value) {
                            found.value = Some(*second);
                        }
                    }
                }

                if found.code.is_none() {
                    found.code = Some(word.text.trim().to_string());
                    found.page_id = Some(page_id);
                }

                if found.value.is_some() {
                    debug!("Vertical search found a tax value on page {}", page_id);
                    break 'pages;
                }
            }
        }
    }

    found
}

// Numeric tokens of a column, top to bottom; anything else is skipped.
fn column_numbers(column: Vec<&Word>) -> Vec<f64> {
    column
        .into_iter()
        .filter_map(|w| {
            if w.text.contains('%') {
                parse_percentage(&w.text)
            } else {
                parse_amount(&w.text)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::{Page, Polygon, DEFAULT_COLUMN_MARGIN};
    use crate::tax::rules::matcher::MatchPolicy;
    use pretty_assertions::assert_eq;

    fn word(text: &str, x: f32, y: f32) -> Word {
        Word::new(text, 0.95, Polygon::from_rect(x, y, x + 0.08, y + 0.02))
    }

    fn run(pages: Vec<Page>, seed: Candidate) -> Candidate {
        let matcher = NameMatcher::new(&["TVA"], MatchPolicy::Earliest);
        extract_vertical(&OcrDocument::new(pages), &matcher, seed, DEFAULT_COLUMN_MARGIN)
    }

    #[test]
    fn test_two_numbers_fill_rate_and_value() {
        let page = Page::new(vec![
            word("Total", 0.1, 0.3),
            word("TVA", 0.5, 0.3),
            word("HT", 0.3, 0.3),
            word("8%", 0.5, 0.35),
            word("100,00", 0.3, 0.35),
            word("12,50", 0.5, 0.4),
        ]);

        assert_eq!(
            run(vec![page], Candidate::default()),
            Candidate {
                code: Some("TVA".to_string()),
                page_id: Some(0),
                rate: Some(8.0),
                base: None,
                value: Some(12.5),
            }
        );
    }

    #[test]
    fn test_single_number_is_value() {
        let page = Page::new(vec![word("TVA", 0.5, 0.3), word("n/a", 0.5, 0.35), word("7,30", 0.5, 0.4)]);

        let found = run(vec![page], Candidate::default());
        assert_eq!(found.value, Some(7.3));
        assert_eq!(found.rate, None);
    }

    #[test]
    fn test_seed_code_and_rate_are_kept() {
        let seed = Candidate {
            code: Some("T.V.A".to_string()),
            page_id: Some(3),
            rate: Some(20.0),
            ..Default::default()
        };
        let page = Page::new(vec![word("TVA", 0.5, 0.3), word("5%", 0.5, 0.35), word("4,00", 0.5, 0.4)]);

        let found = run(vec![page], seed);
        assert_eq!(found.code.as_deref(), Some("T.V.A"));
        assert_eq!(found.page_id, Some(3));
        assert_eq!(found.rate, Some(20.0));
        assert_eq!(found.value, Some(4.0));
    }

    #[test]
    fn test_labels_without_numbers_are_skipped() {
        let first = Page::new(vec![word("TVA", 0.1, 0.1), word("incluse", 0.1, 0.15)]);
        let second = Page::new(vec![word("TVA", 0.6, 0.2), word("3,10", 0.6, 0.25)]);

        let found = run(vec![first, second], Candidate::default());
        assert_eq!(found.code.as_deref(), Some("TVA"));
        assert_eq!(found.page_id, Some(1));
        assert_eq!(found.value, Some(3.1));
    }

    #[test]
    fn test_no_label_leaves_seed_untouched() {
        let page = Page::new(vec![word("Total", 0.1, 0.1), word("9,99", 0.1, 0.15)]);
        assert_eq!(run(vec![page], Candidate::default()), Candidate::default());
    }
}
