use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// What the loader does with a record whose cells cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// Log the record at `warn`, count it and keep going.
    #[default]
    Skip,
    /// Abort the whole load on the first malformed record.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub preferred_labels: Vec<String>,
    pub base_color: String,
    pub alt_color: String,
    pub decimals: usize,
    pub parse_policy: ParsePolicy,
    pub histogram_bins: usize,
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            preferred_labels: vec![
                "Action".to_string(),
                "Adventure".to_string(),
                "Drama".to_string(),
            ],
            base_color: "#636efa".to_string(),
            alt_color: "#ef553b".to_string(),
            decimals: 2,
            parse_policy: ParsePolicy::Skip,
            histogram_bins: 10,
            preview_rows: 5,
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config file. Keys that are absent keep their defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: DashboardConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.histogram_bins == 0 {
            return Err(DashboardError::Config(
                "histogram_bins must be at least 1".to_string(),
            ));
        }
        if self.base_color.trim().is_empty() || self.alt_color.trim().is_empty() {
            return Err(DashboardError::Config(
                "base_color and alt_color must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn preferred_set(&self) -> HashSet<String> {
        self.preferred_labels.iter().cloned().collect()
    }
}
