mod blurbs;
mod cache;
pub mod case_study;
pub mod progress;
pub mod source;


pub use blurbs::{parse_blurbs, parse_blurbs_file, BlurbMap};
pub use cache::ProgressCache;
pub use case_study::{parse_frontmatter, CaseStudy};
pub use progress::{fetch_progress, since_for, LoadOutcome, DEFAULT_LOOKBACK_DAYS};
pub use source::{HttpProgressSource, ProgressSource};
