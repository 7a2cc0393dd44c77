//! Tax extraction pipeline: horizontal rows, vertical fallback, curation.

use std::time::Instant;

use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::tax::{RateBounds, TaxRecord};
use crate::ocr::{OcrDocument, DEFAULT_COLUMN_MARGIN};

use super::rules::{
    curation::curate,
    horizontal::extract_horizontal,
    matcher::{MatchPolicy, NameMatcher},
    scoring::pick_best,
    vertical::extract_vertical,
};

/// Configured tax extractor.
///
/// Holds no per-document state, so one extractor can serve any number of
/// documents, from any number of threads.
#[derive(Debug, Clone)]
pub struct TaxExtractor {
    bounds: RateBounds,
    policy: MatchPolicy,
    column_margin: f32,
}

impl TaxExtractor {
    /// Create an extractor with default settings.
    pub fn new() -> Self {
        Self {
            bounds: RateBounds::default(),
            policy: MatchPolicy::default(),
            column_margin: DEFAULT_COLUMN_MARGIN,
        }
    }

    /// Create an extractor from configuration. Bounds ordering is the
    /// caller's responsibility (see [`ExtractionConfig::validate`]).
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            bounds: config.bounds(),
            policy: config.match_policy,
            column_margin: config.column_margin,
        }
    }

    /// Set the plausible rate range, in percent.
    pub fn with_bounds(mut self, min_rate_percentage: f64, max_rate_percentage: f64) -> Self {
        self.bounds = RateBounds::new(min_rate_percentage, max_rate_percentage);
        self
    }

    /// Set how competing name matches in a line are resolved.
    pub fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the horizontal tolerance of column reconstruction.
    pub fn with_column_margin(mut self, margin: f32) -> Self {
        self.column_margin = margin;
        self
    }

    pub fn bounds(&self) -> RateBounds {
        self.bounds
    }

    /// Extract the tax identified by any of `tax_names` from a document.
    ///
    /// Returns `None` when no names are given, the document has no pages, or
    /// nothing plausible is found.
    pub fn extract<S: AsRef<str>>(
        &self,
        document: &OcrDocument,
        tax_names: &[S],
    ) -> Option<TaxRecord> {
        let start = Instant::now();

        let matcher = NameMatcher::new(tax_names, self.policy);
        if matcher.is_empty() || document.is_empty() {
            debug!("Nothing to extract: no tax names or no pages");
            return None;
        }

        let candidates = extract_horizontal(document, &matcher);
        let any_value = candidates.iter().any(|c| c.value.is_some());
        let picked = pick_best(candidates, &matcher);

        let found = match picked {
            Some(candidate) if any_value => candidate,
            seed => {
                debug!("No tax value in horizontal rows, reading columns");
                extract_vertical(document, &matcher, seed.unwrap_or_default(), self.column_margin)
            }
        };

        let curated = curate(found, self.bounds);
        if curated.is_empty() {
            debug!("No tax found in {:?}", start.elapsed());
            return None;
        }

        info!(
            "Extracted tax {:?} (rate {:?}, base {:?}, value {:?}) in {:?}",
            curated.code,
            curated.rate,
            curated.base,
            curated.value,
            start.elapsed()
        );

        Some(curated.into())
    }
}

impl Default for TaxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract a custom tax with explicit rate bounds.
pub fn extract_custom_tax<S: AsRef<str>>(
    document: &OcrDocument,
    tax_names: &[S],
    min_rate_percentage: f64,
    max_rate_percentage: f64,
) -> Option<TaxRecord> {
    TaxExtractor::new()
        .with_bounds(min_rate_percentage, max_rate_percentage)
        .extract(document, tax_names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::{Page, Polygon, Word};
    use pretty_assertions::assert_eq;

    fn row(y: f32, texts: &[&str]) -> Vec<Word> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let x = 0.05 + i as f32 * 0.15;
                Word::new(*t, 0.98, Polygon::from_rect(x, y, x + 0.1, y + 0.02))
            })
            .collect()
    }

    fn document(rows: &[(f32, &[&str])]) -> OcrDocument {
        let words = rows.iter().flat_map(|(y, texts)| row(*y, texts)).collect();
        OcrDocument::new(vec![Page::new(words)])
    }

    #[test]
    fn test_horizontal_row() {
        let doc = document(&[(0.1, &["Facture", "42"]), (0.5, &["TVA", "8%", "12.50", "100.00"])]);

        assert_eq!(
            extract_custom_tax(&doc, &["TVA"], 0.0, 20.0),
            Some(TaxRecord {
                code: Some("TVA".to_string()),
                page_id: Some(0),
                rate: Some(8.0),
                base: Some(100.0),
                value: Some(12.5),
            })
        );
    }

    #[test]
    fn test_empty_inputs() {
        let doc = document(&[(0.5, &["TVA", "8%", "12.50"])]);
        assert_eq!(extract_custom_tax(&doc, &[] as &[&str], 0.0, 100.0), None);
        assert_eq!(extract_custom_tax(&doc, &[""], 0.0, 100.0), None);
        assert_eq!(extract_custom_tax(&OcrDocument::default(), &["TVA"], 0.0, 100.0), None);
    }

    #[test]
    fn test_no_match() {
        let doc = document(&[(0.5, &["Total", "HT", "100.00"])]);
        assert_eq!(extract_custom_tax(&doc, &["TVA", "VAT"], 0.0, 100.0), None);
    }

    #[test]
    fn test_rate_only_row_triggers_vertical_fallback() {
        // "TVA 20%" on one row, the amount in the column beneath the label.
        let mut words = row(0.3, &["TVA", "20%"]);
        words.push(Word::new("4,00", 0.9, Polygon::from_rect(0.05, 0.35, 0.15, 0.37)));
        let doc = OcrDocument::new(vec![Page::new(words)]);

        let record = TaxExtractor::new().extract(&doc, &["TVA"]).unwrap();
        assert_eq!(record.code.as_deref(), Some("TVA"));
        assert_eq!(record.rate, Some(20.0));
        assert_eq!(record.value, Some(4.0));
        assert_eq!(record.base, None);
    }

    #[test]
    fn test_from_config() {
        let config = ExtractionConfig {
            min_rate_percentage: 5.0,
            max_rate_percentage: 25.0,
            match_policy: MatchPolicy::Latest,
            ..Default::default()
        };
        let extractor = TaxExtractor::from_config(&config);
        assert_eq!(extractor.bounds(), RateBounds::new(5.0, 25.0));
        assert_eq!(extractor.policy, MatchPolicy::Latest);
    }
}
