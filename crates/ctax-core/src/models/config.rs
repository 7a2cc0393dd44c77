//! Configuration structures for tax extraction.

use serde::{Deserialize, Serialize};

use crate::error::CtaxError;
use crate::models::tax::RateBounds;
use crate::ocr::DEFAULT_COLUMN_MARGIN;
use crate::tax::rules::matcher::MatchPolicy;

/// Main configuration for ctax.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CtaxConfig {
    /// Tax extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output rendering configuration.
    pub output: OutputConfig,
}

/// Tax extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Tax names to look for, used when none are given on the command line.
    pub tax_names: Vec<String>,

    /// Lowest plausible tax rate, in percent.
    pub min_rate_percentage: f64,

    /// Highest plausible tax rate, in percent.
    pub max_rate_percentage: f64,

    /// Horizontal tolerance when reading a column under a label (normalized units).
    pub column_margin: f32,

    /// Which occurrence wins when several tax names match a line.
    pub match_policy: MatchPolicy,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            tax_names: Vec::new(),
            min_rate_percentage: 0.0,
            max_rate_percentage: 100.0,
            column_margin: DEFAULT_COLUMN_MARGIN,
            match_policy: MatchPolicy::default(),
        }
    }
}

impl ExtractionConfig {
    pub fn bounds(&self) -> RateBounds {
        RateBounds::new(self.min_rate_percentage, self.max_rate_percentage)
    }

    /// Reject settings the engine does not check for itself.
    pub fn validate(&self) -> Result<(), CtaxError> {
        if self.min_rate_percentage > self.max_rate_percentage {
            return Err(CtaxError::Config(format!(
                "min_rate_percentage ({}) is greater than max_rate_percentage ({})",
                self.min_rate_percentage, self.max_rate_percentage
            )));
        }
        if self.column_margin.is_nan() || self.column_margin < 0.0 {
            return Err(CtaxError::Config(format!(
                "column_margin must be non-negative, got {}",
                self.column_margin
            )));
        }
        Ok(())
    }
}

/// Output rendering configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl CtaxConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, CtaxError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.extraction.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), CtaxError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CtaxConfig::default();
        assert_eq!(config.extraction.bounds(), RateBounds::new(0.0, 100.0));
        assert_eq!(config.extraction.match_policy, MatchPolicy::Earliest);
        assert!(config.extraction.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CtaxConfig =
            serde_json::from_str(r#"{"extraction": {"tax_names": ["TVA"], "max_rate_percentage": 20}}"#)
                .unwrap();

        assert_eq!(config.extraction.tax_names, vec!["TVA".to_string()]);
        assert_eq!(config.extraction.bounds(), RateBounds::new(0.0, 20.0));
        assert_eq!(config.extraction.column_margin, DEFAULT_COLUMN_MARGIN);
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_validate_rejects_inverted_bounds() {
        let config = ExtractionConfig {
            min_rate_percentage: 30.0,
            max_rate_percentage: 10.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CtaxError::Config(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = CtaxConfig::default();
        config.extraction.tax_names = vec!["IVA".to_string()];
        config.extraction.match_policy = MatchPolicy::Latest;
        config.save(&path).unwrap();

        let loaded = CtaxConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extraction.tax_names, vec!["IVA".to_string()]);
        assert_eq!(loaded.extraction.match_policy, MatchPolicy::Latest);
    }
}
