use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use repo_progress::analysis::{HttpProgressSource, ProgressCache, ProgressSource};
use repo_progress::heatmap::{ActivityLevel, HeatmapOptions};
use repo_progress::{build_heatmap, ProgressLoader};

type Params = Query<HashMap<String, String>>;

const PROGRESS_MD: &str = "\
# Widgets progress

[aaa1111] - Set up the project
Scaffolded the crate.

## [bbb2222]
Late night fix.
";

fn commit_json(sha: &str, date: &str) -> serde_json::Value {
    json!({
        "sha": sha,
        "html_url": format!("https://github.com/octo/widgets/commit/{sha}"),
        "message": format!("Commit {sha}\n\nbody"),
        "author": { "name": "Octo Cat", "date": date },
    })
}

async fn commits(Query(params): Params) -> Response {
    let since_ok = params
        .get("since")
        .is_some_and(|since| since.ends_with("T00:00:00.000Z"));
    if !since_ok || params.get("owner").map(String::as_str) != Some("octo") {
        return (StatusCode::BAD_REQUEST, "bad query").into_response();
    }

    match params.get("repo").map(String::as_str) {
        Some("widgets") => Json(json!([
            commit_json("aaa1111ffffffffffffffffffffffffffffffff0", "2024-03-01T10:00:00Z"),
            commit_json("bbb2222ffffffffffffffffffffffffffffffff0", "2024-03-01T23:00:00Z"),
            commit_json("ccc3333ffffffffffffffffffffffffffffffff0", "2024-03-05T08:15:00Z"),
        ]))
        .into_response(),
        Some("broken") => (StatusCode::BAD_GATEWAY, "github exploded").into_response(),
        _ => Json(json!([])).into_response(),
    }
}

async fn progress_md(Query(params): Params) -> Response {
    match params.get("repo").map(String::as_str) {
        Some("widgets") | Some("broken") => {
            Json(json!({ "path": "PROGRESS.md", "content": PROGRESS_MD })).into_response()
        }
        Some("flaky") => (StatusCode::INTERNAL_SERVER_ERROR, "oops").into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn case_study(Query(params): Params) -> Response {
    match params.get("repo").map(String::as_str) {
        Some("widgets") => Json(json!({
            "path": "CASE_STUDY.md",
            "content": "---\ntitle: \"Widgets\"\nyear: 2024\n---\n\n## Problem\nToo few widgets.\n",
        }))
        .into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn spawn_api() -> String {
    let app = Router::new()
        .route("/api/commits", get(commits))
        .route("/api/progress-md", get(progress_md))
        .route("/api/case-study", get(case_study));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

async fn setup() -> (ProgressLoader, HttpProgressSource) {
    let base = spawn_api().await;
    let source = HttpProgressSource::new(&base, Duration::from_secs(5)).unwrap();
    let loader = ProgressLoader::new(Arc::new(source.clone()), Arc::new(ProgressCache::new()));
    (loader, source)
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_full_workflow() {
    let (loader, _source) = setup().await;

    let state = loader.load_and_wait("octo", "widgets", 3650).await;
    assert!(!state.loading);
    assert_eq!(state.error, None);
    assert_eq!(state.data.counts_by_date.get("2024-03-01"), Some(&2));
    assert_eq!(state.data.counts_by_date.get("2024-03-05"), Some(&1));

    // Day selection: newest first, blurbs resolved through the 7-char prefix
    let entries = state.data.commits_on("2024-03-01");
    let view: Vec<(&str, Option<&str>)> = entries
        .iter()
        .map(|e| (e.commit.subject(), e.blurb))
        .collect();
    assert_eq!(
        view,
        vec![
            ("Commit bbb2222ffffffffffffffffffffffffffffffff0", Some("Late night fix.")),
            (
                "Commit aaa1111ffffffffffffffffffffffffffffffff0",
                Some("Set up the project\nScaffolded the crate.")
            ),
        ]
    );

    let heatmap = build_heatmap(
        &state.data.counts_by_date,
        &HeatmapOptions::default(),
        day(2024, 3, 20),
    );
    assert_eq!(heatmap.start(), Some(day(2024, 2, 25)));
    assert_eq!(heatmap.end(), Some(day(2024, 3, 3)));
    assert_eq!(heatmap.day(day(2024, 3, 1)).unwrap().level(), ActivityLevel::Medium);
    assert_eq!(heatmap.day(day(2024, 3, 5)).unwrap().level(), ActivityLevel::Low);
    assert_eq!(heatmap.total_commits(), 3);
}

#[tokio::test]
async fn test_missing_progress_log_is_not_an_error() {
    let (loader, source) = setup().await;

    assert_eq!(source.fetch_progress_log("octo", "bare").await.unwrap(), None);

    let state = loader.load_and_wait("octo", "bare", 30).await;
    assert_eq!(state.error, None);
    assert!(state.data.blurbs_by_sha.is_empty());
    assert!(state.data.counts_by_date.is_empty());
}

#[tokio::test]
async fn test_failing_progress_log_is_ignored() {
    let (loader, source) = setup().await;

    assert!(source.fetch_progress_log("octo", "flaky").await.is_err());

    let state = loader.load_and_wait("octo", "flaky", 30).await;
    assert_eq!(state.error, None);
    assert!(state.data.blurbs_by_sha.is_empty());
}

#[tokio::test]
async fn test_commit_failure_surfaces_server_message() {
    let (loader, _source) = setup().await;

    let state = loader.load_and_wait("octo", "broken", 30).await;
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("github exploded"));
    assert_eq!(
        state.data.blurbs_by_sha.get("aaa1111"),
        Some("Set up the project\nScaffolded the crate.")
    );
}

#[tokio::test]
async fn test_case_study() {
    let (_loader, source) = setup().await;

    let study = source.fetch_case_study("octo", "widgets").await.unwrap();
    assert_eq!(study.get("title"), Some("Widgets"));
    assert_eq!(study.get("year"), Some("2024"));
    assert_eq!(study.body, "## Problem\nToo few widgets.\n");

    let missing = source.fetch_case_study("octo", "nothing").await.unwrap();
    assert!(missing.is_empty());
}
