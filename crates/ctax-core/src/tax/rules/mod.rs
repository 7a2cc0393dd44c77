//! Heuristic rules for locating and reconstructing tax fields.

pub mod amounts;
pub mod curation;
pub mod horizontal;
pub mod matcher;
pub mod patterns;
pub mod scoring;
pub mod text;
pub mod vertical;

pub use amounts::{parse_amount, parse_percentage};
pub use curation::curate;
pub use horizontal::{extract_horizontal, HorizontalExtractor, RowLayout};
pub use matcher::{match_index, MatchPolicy, NameMatch, NameMatcher};
pub use scoring::{pick_best, score};
pub use text::{fold, strip_currency_symbols, strip_diacritics, strip_diacritics_lossy};
pub use vertical::extract_vertical;
