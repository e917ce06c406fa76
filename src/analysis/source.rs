use chrono::{DateTime, SecondsFormat, Utc};
use futures::future::{BoxFuture, FutureExt};
use reqwest::header::CACHE_CONTROL;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::case_study::{parse_frontmatter, CaseStudy};
use crate::error::{ProgressError, Result};
use crate::types::Commit;

/// Where the loader gets commits and progress logs from.
///
/// The HTTP implementation talks to the portfolio API; tests plug in
/// in-memory sources with controllable timing.
pub trait ProgressSource: Send + Sync {
    /// All commits of `owner/repo` authored at or after `since`.
    fn fetch_commits<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        since: DateTime<Utc>,
    ) -> BoxFuture<'a, Result<Vec<Commit>>>;

    /// The raw progress log, or `None` when the project has none.
    fn fetch_progress_log<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>>>;
}

/// `{path, content}` payload shared by the markdown endpoints.
#[derive(Debug, Deserialize)]
struct MarkdownFile {
    #[serde(default)]
    content: String,
}

/// Client for the `/api/*` endpoints of the portfolio backend.
#[derive(Clone)]
pub struct HttpProgressSource {
    client: Client,
    api_base: String,
}

impl HttpProgressSource {
    /// Create a source for `api_base` (e.g. `https://example.dev`).
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(client, api_base)
    }

    pub fn with_client(client: Client, api_base: &str) -> Result<Self> {
        let api_base = api_base.trim().trim_end_matches('/').to_string();
        if api_base.is_empty() {
            return Err(ProgressError::Config("API base URL is not set".to_string()));
        }
        Url::parse(&api_base).map_err(|e| {
            ProgressError::Config(format!("invalid API base URL {api_base:?}: {e}"))
        })?;
        Ok(Self { client, api_base })
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// GET `path` with query parameters. `404` becomes `Ok(None)`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>> {
        let url = format!("{}{}", self.api_base, path);
        debug!(%url, ?query, "fetching");

        let res = self
            .client
            .get(&url)
            .query(query)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = res.text().await?;
        if !status.is_success() {
            return Err(ProgressError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(Some(serde_json::from_str(&body)?))
    }

    /// Fetch the project's case study and split off its frontmatter.
    ///
    /// A project without a case study yields an empty [`CaseStudy`].
    pub async fn fetch_case_study(&self, owner: &str, repo: &str) -> Result<CaseStudy> {
        let file: Option<MarkdownFile> = self
            .get_json("/api/case-study", &[("owner", owner), ("repo", repo)])
            .await?;
        Ok(file.map(|f| parse_frontmatter(&f.content)).unwrap_or_default())
    }
}

impl ProgressSource for HttpProgressSource {
    fn fetch_commits<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        since: DateTime<Utc>,
    ) -> BoxFuture<'a, Result<Vec<Commit>>> {
        async move {
            let since = since.to_rfc3339_opts(SecondsFormat::Millis, true);
            let commits: Option<Vec<Commit>> = self
                .get_json(
                    "/api/commits",
                    &[("owner", owner), ("repo", repo), ("since", since.as_str())],
                )
                .await?;
            // The commits endpoint has no "missing" state; a 404 is a failure
            commits.ok_or_else(|| ProgressError::Status {
                status: StatusCode::NOT_FOUND.as_u16(),
                body: format!("no commits endpoint for {owner}/{repo}"),
            })
        }
        .boxed()
    }

    fn fetch_progress_log<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>>> {
        async move {
            let file: Option<MarkdownFile> = self
                .get_json("/api/progress-md", &[("owner", owner), ("repo", repo)])
                .await?;
            Ok(file.map(|f| f.content).filter(|content| !content.is_empty()))
        }
        .boxed()
    }
}
