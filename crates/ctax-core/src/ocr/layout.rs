//! Reading-order reconstruction from an unordered bag of words.
//!
//! Two views are built over a page without copying any word:
//! horizontal lines (words sharing a vertical band) and the column of words
//! found directly underneath a label.

use std::cmp::Ordering;

use super::{Page, Polygon, Word};

/// Default horizontal tolerance for column reconstruction, in normalized units.
pub const DEFAULT_COLUMN_MARGIN: f32 = 0.05;

/// A horizontal line of words, sorted left to right.
#[derive(Debug, Clone)]
pub struct Line<'a> {
    words: Vec<&'a Word>,
}

impl<'a> Line<'a> {
    pub fn words(&self) -> &[&'a Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Word texts joined with single spaces.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Lazy iterator over the lines of a page, top to bottom.
///
/// Restart by calling [`Page::lines`] again; the order is stable for a given page.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    sorted: Vec<&'a Word>,
    assigned: Vec<bool>,
    cursor: usize,
}

impl<'a> Lines<'a> {
    fn new(page: &'a Page) -> Self {
        let mut sorted: Vec<&Word> = page.words.iter().collect();
        sorted.sort_by(|a, b| cmp_f32(a.polygon.min_y(), b.polygon.min_y()));

        Self {
            assigned: vec![false; sorted.len()],
            sorted,
            cursor: 0,
        }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor < self.sorted.len() && self.assigned[self.cursor] {
            self.cursor += 1;
        }
        if self.cursor >= self.sorted.len() {
            return None;
        }

        let seed = self.sorted[self.cursor];
        self.assigned[self.cursor] = true;

        let mut words = vec![seed];
        for i in (self.cursor + 1)..self.sorted.len() {
            if !self.assigned[i] && on_same_line(seed, self.sorted[i]) {
                self.assigned[i] = true;
                words.push(self.sorted[i]);
            }
        }

        words.sort_by(|a, b| cmp_f32(a.polygon.min_x(), b.polygon.min_x()));

        Some(Line { words })
    }
}

impl Page {
    /// Horizontal reading-order lines.
    pub fn lines(&self) -> Lines<'_> {
        Lines::new(self)
    }

    /// Words on or below `polygon` whose horizontal extent overlaps it within
    /// `margin`, top to bottom. A word with exactly this polygon is skipped.
    pub fn column_below(&self, polygon: &Polygon, margin: f32) -> Vec<&Word> {
        let top = polygon.min_y();

        let mut column: Vec<&Word> = self
            .words
            .iter()
            .filter(|w| w.polygon != *polygon)
            .filter(|w| w.polygon.centroid().y >= top)
            .filter(|w| w.polygon.overlaps_x(polygon, margin))
            .collect();

        column.sort_by(|a, b| {
            cmp_f32(a.polygon.min_y(), b.polygon.min_y())
                .then_with(|| cmp_f32(a.polygon.min_x(), b.polygon.min_x()))
        });

        column
    }
}

// Symmetric: either word's vertical centre lies within the other's band.
fn on_same_line(seed: &Word, other: &Word) -> bool {
    seed.polygon.contains_y(other.polygon.centroid().y)
        || other.polygon.contains_y(seed.polygon.centroid().y)
}

fn cmp_f32(a: f32, b: f32) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
