//! In-memory progress source for unit tests.

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

use crate::analysis::ProgressSource;
use crate::error::{ProgressError, Result};
use crate::types::{Commit, CommitAuthor};

pub fn commit(sha: &str, date: &str) -> Commit {
    Commit {
        sha: sha.to_string(),
        html_url: format!("https://github.com/octo/widgets/commit/{sha}"),
        message: format!("Commit {sha}\n\nDetails"),
        author: CommitAuthor {
            name: "Test User".to_string(),
            date: date.to_string(),
        },
    }
}

fn status_error(status: u16) -> ProgressError {
    ProgressError::Status {
        status,
        body: format!("boom {status}"),
    }
}

/// Canned responses keyed by repository name. Unknown repositories have no
/// commits and no log.
#[derive(Default)]
pub struct FakeSource {
    commits: Mutex<HashMap<String, std::result::Result<Vec<Commit>, u16>>>,
    logs: Mutex<HashMap<String, std::result::Result<Option<String>, u16>>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    panics: Mutex<HashSet<String>>,
    commit_calls: AtomicUsize,
}

impl FakeSource {
    pub fn with_commits(mut self, repo: &str, commits: Vec<Commit>) -> Self {
        self.commits.get_mut().unwrap().insert(repo.to_string(), Ok(commits));
        self
    }

    pub fn with_commit_error(mut self, repo: &str, status: u16) -> Self {
        self.commits.get_mut().unwrap().insert(repo.to_string(), Err(status));
        self
    }

    pub fn with_log(mut self, repo: &str, log: &str) -> Self {
        self.logs.get_mut().unwrap().insert(repo.to_string(), Ok(Some(log.to_string())));
        self
    }

    pub fn with_log_error(mut self, repo: &str, status: u16) -> Self {
        self.logs.get_mut().unwrap().insert(repo.to_string(), Err(status));
        self
    }

    pub fn with_commit_panic(mut self, repo: &str) -> Self {
        self.panics.get_mut().unwrap().insert(repo.to_string());
        self
    }

    /// Hold the next commit fetch for `repo` until the returned sender fires or is dropped.
    pub fn gate(&self, repo: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(repo.to_string(), rx);
        tx
    }

    pub fn commit_calls(&self) -> usize {
        self.commit_calls.load(Ordering::SeqCst)
    }
}

impl ProgressSource for FakeSource {
    fn fetch_commits<'a>(
        &'a self,
        _owner: &'a str,
        repo: &'a str,
        _since: DateTime<Utc>,
    ) -> BoxFuture<'a, Result<Vec<Commit>>> {
        async move {
            self.commit_calls.fetch_add(1, Ordering::SeqCst);
            let gate = self.gates.lock().unwrap().remove(repo);
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            if self.panics.lock().unwrap().contains(repo) {
                panic!("commit fetch for {repo} blew up");
            }
            let canned = self.commits.lock().unwrap().get(repo).cloned();
            match canned {
                Some(Ok(commits)) => Ok(commits),
                Some(Err(status)) => Err(status_error(status)),
                None => Ok(Vec::new()),
            }
        }
        .boxed()
    }

    fn fetch_progress_log<'a>(
        &'a self,
        _owner: &'a str,
        repo: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>>> {
        async move {
            let canned = self.logs.lock().unwrap().get(repo).cloned();
            match canned {
                Some(Ok(log)) => Ok(log),
                Some(Err(status)) => Err(status_error(status)),
                None => Ok(None),
            }
        }
        .boxed()
    }
}
