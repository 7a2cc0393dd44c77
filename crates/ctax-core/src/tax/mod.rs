//! Custom tax field extraction.

mod extractor;
pub mod rules;

pub use extractor::{extract_custom_tax, TaxExtractor};
