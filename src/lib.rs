//! # Repository Progress Library
//!
//! `repo_progress` computes the data behind a project's commit-activity view:
//! a GitHub-style calendar heatmap and a per-day commit list annotated with
//! notes from the project's progress log.
//!
//! ## Features
//!
//! - Fetch a bounded window of commits and an optional progress log over HTTP
//! - Bucket commits per UTC day
//! - Parse progress-log blurbs keyed by commit SHA (with prefix lookup)
//! - Build Sunday-aligned week columns with month and year segments
//! - Cache results per project and window, keeping only the latest request
//! - Fetch case studies and split their frontmatter
//!
//! ## Example
//!
//! ```no_run
//! use repo_progress::analysis::ProgressCache;
//! use repo_progress::config::ProgressConfig;
//! use repo_progress::heatmap::HeatmapOptions;
//! use repo_progress::ProgressLoader;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), repo_progress::ProgressError> {
//! let config = ProgressConfig::from_env();
//! let source = Arc::new(config.http_source()?);
//! let loader = ProgressLoader::new(source, Arc::new(ProgressCache::new()));
//!
//! let state = loader.load_and_wait("octo", "widgets", config.lookback_days).await;
//! let heatmap = state.heatmap(&HeatmapOptions { months_window: Some(12), ..Default::default() });
//! println!("{} weeks, {} commits", heatmap.weeks.len(), heatmap.total_commits());
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod app;
pub mod config;
pub mod error;
pub mod heatmap;
pub mod types;
pub mod utils;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use app::{ProgressLoader, ProgressState};
pub use error::ProgressError;
pub use heatmap::{build_heatmap, Heatmap, HeatmapOptions};
pub use types::{CacheKey, Commit, ProgressData};
