//! Heuristic tax field extraction from OCR output.
//!
//! This crate provides:
//! - An OCR document model (pages of words with normalized polygons)
//! - Reading-order line and column reconstruction
//! - Locale-aware amount and percentage parsing
//! - Tax row extraction, candidate scoring and value curation

pub mod error;
pub mod models;
pub mod ocr;
pub mod tax;

pub use error::{CtaxError, DocumentError, Result};
pub use models::config::{CtaxConfig, ExtractionConfig, OutputConfig};
pub use models::tax::{Candidate, RateBounds, TaxRecord};
pub use ocr::{Line, OcrDocument, Page, Point, Polygon, Word};
pub use tax::rules::MatchPolicy;
pub use tax::{extract_custom_tax, TaxExtractor};
