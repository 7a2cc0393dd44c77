//! Tax records produced by the extraction engine.

use serde::{Deserialize, Serialize};

/// A provisional tax record built while scanning the document.
///
/// Many candidates may exist per extraction; exactly one is curated into a
/// [`TaxRecord`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidate {
    /// Tax name as it appears in the document.
    pub code: Option<String>,
    /// Zero-based index of the page the candidate was found on.
    pub page_id: Option<usize>,
    /// Tax rate, in percent once curated.
    pub rate: Option<f64>,
    /// Taxable base amount.
    pub base: Option<f64>,
    /// Tax amount.
    pub value: Option<f64>,
}

impl Candidate {
    /// Check if no field has been filled in.
    pub fn is_empty(&self) -> bool {
        self.code.is_none()
            && self.page_id.is_none()
            && self.rate.is_none()
            && self.base.is_none()
            && self.value.is_none()
    }
}

/// Final, curated tax information for a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRecord {
    pub code: Option<String>,
    pub page_id: Option<usize>,
    pub rate: Option<f64>,
    pub base: Option<f64>,
    pub value: Option<f64>,
}

impl From<Candidate> for TaxRecord {
    fn from(candidate: Candidate) -> Self {
        Self {
            code: candidate.code,
            page_id: candidate.page_id,
            rate: candidate.rate,
            base: candidate.base,
            value: candidate.value,
        }
    }
}

/// Inclusive bounds a tax rate (in percent) is expected to fall within.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateBounds {
    pub min: f64,
    pub max: f64,
}

impl RateBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, rate: f64) -> bool {
        rate >= self.min && rate <= self.max
    }
}

impl Default for RateBounds {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
        }
    }
}
