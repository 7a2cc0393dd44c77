//! OCR document model consumed by the tax extraction engine.
//!
//! The document is a read-only tree of pages and words. Every word carries a
//! polygon in normalized page coordinates (`0.0..=1.0` on both axes).

mod layout;

pub use layout::{Line, Lines, DEFAULT_COLUMN_MARGIN};

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CtaxError, DocumentError};

/// A point in normalized page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f32; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

/// Ordered outline of a word. Points are kept in the order the OCR service
/// produced them; corners are derived on demand.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon(Vec<Point>);

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Axis-aligned rectangle from two corners.
    pub fn from_rect(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self(vec![
            Point::new(min_x, min_y),
            Point::new(max_x, min_y),
            Point::new(max_x, max_y),
            Point::new(min_x, max_y),
        ])
    }

    pub fn points(&self) -> &[Point] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn min_x(&self) -> f32 {
        self.0.iter().map(|p| p.x).fold(f32::INFINITY, f32::min)
    }

    pub fn max_x(&self) -> f32 {
        self.0.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max)
    }

    pub fn min_y(&self) -> f32 {
        self.0.iter().map(|p| p.y).fold(f32::INFINITY, f32::min)
    }

    pub fn max_y(&self) -> f32 {
        self.0.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.min_x(), self.min_y())
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.max_x(), self.max_y())
    }

    /// Mean of all points.
    pub fn centroid(&self) -> Point {
        if self.0.is_empty() {
            return Point::new(0.0, 0.0);
        }
        let n = self.0.len() as f32;
        let (sx, sy) = self
            .0
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point::new(sx / n, sy / n)
    }

    /// Check if `y` falls within the vertical extent of the polygon.
    pub fn contains_y(&self, y: f32) -> bool {
        y >= self.min_y() && y <= self.max_y()
    }

    /// Check if the horizontal extents overlap once `other` is widened by
    /// `margin` on both sides.
    pub fn overlaps_x(&self, other: &Polygon, margin: f32) -> bool {
        self.min_x() <= other.max_x() + margin && self.max_x() >= other.min_x() - margin
    }
}

/// A recognized word with its confidence and outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    #[serde(default)]
    pub confidence: f32,

    /// Outline in normalized page coordinates.
    pub polygon: Polygon,
}

impl Word {
    pub fn new(text: impl Into<String>, confidence: f32, polygon: Polygon) -> Self {
        Self {
            text: text.into(),
            confidence,
            polygon,
        }
    }
}

/// A single page of OCR output. Words come in no particular order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub words: Vec<Word>,
}

impl Page {
    pub fn new(words: Vec<Word>) -> Self {
        Self { words }
    }
}

/// Complete OCR result for a document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OcrDocument {
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl OcrDocument {
    pub fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    /// Parse and validate a document from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, CtaxError> {
        let document: OcrDocument = serde_json::from_str(json)
            .map_err(|e| DocumentError::Parse(e.to_string()))?;
        document.validate()?;

        debug!(
            "Loaded OCR document with {} pages, {} words",
            document.pages.len(),
            document.word_count()
        );

        Ok(document)
    }

    /// Load and validate a document from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, CtaxError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Check that every word has a usable polygon.
    pub fn validate(&self) -> Result<(), DocumentError> {
        for (page_id, page) in self.pages.iter().enumerate() {
            for (word_id, word) in page.words.iter().enumerate() {
                if word.polygon.len() < 3 {
                    return Err(DocumentError::InvalidPolygon {
                        page: page_id,
                        word: word_id,
                        points: word.polygon.len(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn word_count(&self) -> usize {
        self.pages.iter().map(|p| p.words.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
