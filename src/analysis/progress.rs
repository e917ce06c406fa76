use chrono::{DateTime, Duration, Utc};
use futures::future::join;
use tracing::{debug, warn};

use super::blurbs::parse_blurbs;
use super::source::ProgressSource;
use crate::types::ProgressData;
use crate::utils::dates::start_of_day_utc;

/// Default lookback of the progress view, in days.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 3650;

/// Result of one load: whatever data was obtained plus the commit error, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOutcome {
    pub data: ProgressData,
    /// Set only when the commit fetch failed. Progress log failures are not errors.
    pub error: Option<String>,
}

/// Start of the commit window: midnight UTC today minus `days`.
///
/// Windows reaching past the earliest representable instant are clamped to it.
pub fn since_for(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    Duration::try_days(i64::from(days))
        .and_then(|lookback| start_of_day_utc(now).checked_sub_signed(lookback))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Fetch commits and the progress log concurrently and combine them.
///
/// Both requests always run to completion and fail independently: a failed
/// commit fetch still lets the blurbs through, and a failed progress log
/// fetch is treated as "no log".
pub async fn fetch_progress(
    source: &dyn ProgressSource,
    owner: &str,
    repo: &str,
    days: u32,
    now: DateTime<Utc>,
) -> LoadOutcome {
    let since = since_for(now, days);
    debug!(owner, repo, %since, "loading progress");

    let (commits, log) = join(
        source.fetch_commits(owner, repo, since),
        source.fetch_progress_log(owner, repo),
    )
    .await;

    let log = log.unwrap_or_else(|e| {
        warn!(owner, repo, error = %e, "progress log unavailable");
        None
    });
    let blurbs = log.as_deref().map(parse_blurbs).unwrap_or_default();

    match commits {
        Ok(commits) => {
            debug!(
                owner,
                repo,
                commits = commits.len(),
                blurbs = blurbs.len(),
                "progress loaded"
            );
            LoadOutcome {
                data: ProgressData::from_commits(commits, blurbs),
                error: None,
            }
        }
        Err(e) => {
            warn!(owner, repo, error = %e, "failed to load commits");
            LoadOutcome {
                data: ProgressData::from_commits(Vec::new(), blurbs),
                error: Some(e.user_message()),
            }
        }
    }
}
