//! Row templates for horizontally laid out tax lines.
//!
//! Both templates run on folded line text in which the matched tax name has
//! been replaced by [`NAME_MARK`], so they compile once regardless of which
//! names a caller asks for.

use lazy_static::lazy_static;
use regex::Regex;

/// Stands in for the matched tax name inside a line (private use code point).
pub const NAME_MARK: char = '\u{E000}';

// A minus sign only counts when it touches the digits: in "TVA - 20%" the
// dash is a separator.
const NUMBER: &str = r"-?(?:\d*[.,])*\d+";

// Like NUMBER, but also takes space-grouped thousands ("1 234,56"), which OCR
// returns as separate words. The grouped form needs decimals so that two
// plain integers ("100 200") stay two amounts.
const AMOUNT: &str = r"-?(?:\d{1,3}(?:[\s\u{00a0}]\d{3})+[.,]\d{1,2}|(?:\d*[.,])*\d+)";

lazy_static! {
    // `<name> <rate%?> <amount?> <amount?>`, e.g. "TVA 20% 100,00 20,00"
    pub static ref PERCENT_SECOND: Regex = Regex::new(&format!(
        r"{NAME_MARK}[^\d%]*?(?P<rate>{NUMBER}(?:\s?%)?)(?:\D*?(?P<first>{AMOUNT}))?(?:\D*?(?P<second>{AMOUNT}))?"
    ))
    .unwrap();

    // `<rate%> <name> <amount?> <amount?>`, e.g. "20% TVA 100,00 20,00"
    pub static ref PERCENT_FIRST: Regex = Regex::new(&format!(
        r"(?P<rate>{NUMBER}\s?%)[\s.:()\-]*{NAME_MARK}(?:\D*?(?P<first>{AMOUNT}))?(?:\D*?(?P<second>{AMOUNT}))?"
    ))
    .unwrap();
}
