//! # Common Types
//!
//! This module contains the common types used throughout the crate for
//! representing fetched commits, the day-bucketed progress data derived from
//! them, and the keys under which that data is cached.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;
use url::Url;

use crate::analysis::BlurbMap;
use crate::utils::dates::{format_day, utc_day_of};

/// Author block of a commit as returned by `/api/commits`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitAuthor {
    pub name: String,
    /// ISO-8601 timestamp
    pub date: String,
}

/// A single commit as returned by `/api/commits`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub html_url: String,
    pub message: String,
    pub author: CommitAuthor,
}

impl Commit {
    /// First line of the commit message.
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }

    /// `YYYY-MM-DD` of the author date in UTC.
    pub fn day_key(&self) -> Option<String> {
        utc_day_of(&self.author.date).map(format_day)
    }
}

/// A key used for caching progress results per project and lookback window.
///
/// Owner and repository are trimmed and lowercased so `Nick/Repo` and
/// `nick/repo` share an entry.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct CacheKey {
    pub owner: String,
    pub repo: String,
    pub days: u32,
}

impl CacheKey {
    pub fn new(owner: &str, repo: &str, days: u32) -> Self {
        Self {
            owner: owner.trim().to_lowercase(),
            repo: repo.trim().to_lowercase(),
            days,
        }
    }
}

/// Commits bucketed per UTC day, plus the blurbs parsed from the progress log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProgressData {
    pub commits_by_date: BTreeMap<String, Vec<Commit>>,
    pub counts_by_date: BTreeMap<String, u32>,
    pub blurbs_by_sha: BlurbMap,
}

/// A commit on a selected day, paired with its blurb when the log has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayEntry<'a> {
    pub commit: &'a Commit,
    pub blurb: Option<&'a str>,
}

impl ProgressData {
    /// Bucket `commits` by the UTC day of their author date.
    ///
    /// Within a day the fetch order is kept. Commits whose date cannot be
    /// parsed have no day and are skipped.
    pub fn from_commits(commits: Vec<Commit>, blurbs_by_sha: BlurbMap) -> Self {
        let mut commits_by_date: BTreeMap<String, Vec<Commit>> = BTreeMap::new();
        let mut counts_by_date: BTreeMap<String, u32> = BTreeMap::new();

        for commit in commits {
            let Some(day) = commit.day_key() else {
                warn!(
                    sha = %commit.sha,
                    date = %commit.author.date,
                    "skipping commit with unparseable author date"
                );
                continue;
            };
            *counts_by_date.entry(day.clone()).or_insert(0) += 1;
            commits_by_date.entry(day).or_default().push(commit);
        }

        Self {
            commits_by_date,
            counts_by_date,
            blurbs_by_sha,
        }
    }

    pub fn commit_count(&self) -> usize {
        self.commits_by_date.values().map(Vec::len).sum()
    }

    /// Commits authored on `day` (`YYYY-MM-DD`), newest first, with their blurbs.
    pub fn commits_on(&self, day: &str) -> Vec<DayEntry<'_>> {
        let mut entries: Vec<DayEntry<'_>> = self
            .commits_by_date
            .get(day)
            .map(|commits| {
                commits
                    .iter()
                    .map(|commit| DayEntry {
                        commit,
                        blurb: self.blurbs_by_sha.lookup(&commit.sha),
                    })
                    .collect()
            })
            .unwrap_or_default();

        entries.sort_by(|a, b| {
            let a = chrono::DateTime::parse_from_rfc3339(&a.commit.author.date).ok();
            let b = chrono::DateTime::parse_from_rfc3339(&b.commit.author.date).ok();
            b.cmp(&a)
        });
        entries
    }
}

/// Owner of a repository in the `/api/repos` payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepoOwner {
    pub login: Option<String>,
}

/// The subset of repository metadata needed to locate a project.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepoMeta {
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub html_url: Option<String>,
    pub owner: Option<RepoOwner>,
}

/// Resolved `(owner, name)` pair; either half may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: Option<String>,
    pub name: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

impl RepoRef {
    /// Derive owner and name from repository metadata.
    ///
    /// Owner: `owner.login`, then `full_name`, then the first path segment of
    /// `html_url`, then `fallback_owner`. Name: `name`, then `full_name`, then
    /// the second path segment of `html_url`.
    pub fn derive(meta: &RepoMeta, fallback_owner: Option<&str>) -> Self {
        let full_name: Vec<&str> = meta
            .full_name
            .as_deref()
            .map(|f| f.split('/').collect())
            .unwrap_or_default();
        let url_path: Vec<String> = meta
            .html_url
            .as_deref()
            .and_then(|u| Url::parse(u).ok())
            .and_then(|u| u.path_segments().map(|s| s.map(str::to_string).collect()))
            .unwrap_or_default();

        let owner = non_empty(meta.owner.as_ref().and_then(|o| o.login.as_deref()))
            .or_else(|| non_empty(full_name.first().copied()))
            .or_else(|| non_empty(url_path.first().map(String::as_str)))
            .or_else(|| non_empty(fallback_owner));

        let name = non_empty(meta.name.as_deref())
            .or_else(|| non_empty(full_name.get(1).copied()))
            .or_else(|| non_empty(url_path.get(1).map(String::as_str)));

        Self { owner, name }
    }

    /// Resolve a command-line target: a URL, `owner/repo`, or a bare repository name.
    pub fn parse_target(target: &str, fallback_owner: Option<&str>) -> Self {
        let target = target.trim();
        let meta = if target.contains("://") {
            RepoMeta {
                html_url: Some(target.to_string()),
                ..Default::default()
            }
        } else if target.contains('/') {
            RepoMeta {
                full_name: Some(target.to_string()),
                ..Default::default()
            }
        } else {
            RepoMeta {
                name: Some(target.to_string()),
                ..Default::default()
            }
        };
        Self::derive(&meta, fallback_owner)
    }
}
