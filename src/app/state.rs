use std::sync::Arc;

use crate::heatmap::{build_heatmap_now, Heatmap, HeatmapOptions};
use crate::types::ProgressData;

/// Visible state of a progress view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressState {
    pub data: Arc<ProgressData>,
    pub loading: bool,
    /// Commit fetch failure, ready to display
    pub error: Option<String>,
}

impl ProgressState {
    /// Fresh state for a new request: loading, no data, no error
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Default::default()
        }
    }

    pub fn from_cached(data: Arc<ProgressData>) -> Self {
        Self {
            data,
            loading: false,
            error: None,
        }
    }

    pub fn from_outcome(data: Arc<ProgressData>, outcome_error: Option<String>) -> Self {
        Self {
            data,
            loading: false,
            error: outcome_error,
        }
    }

    /// Build the heatmap for the current counts
    pub fn heatmap(&self, options: &HeatmapOptions) -> Heatmap {
        build_heatmap_now(&self.data.counts_by_date, options)
    }
}
