//! Repository Progress Tool
//!
//! Fetches a project's commit activity from the portfolio API and prints the
//! calendar heatmap, the commits of a selected day, or the project's blurbs.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use repo_progress::analysis::{parse_blurbs_file, ProgressCache};
use repo_progress::config::ProgressConfig;
use repo_progress::heatmap::{render_text, Heatmap, HeatmapOptions, TextStyle};
use repo_progress::types::RepoRef;
use repo_progress::utils::format_day;
use repo_progress::{ProgressLoader, ProgressState};

#[derive(Parser, Debug)]
#[command(name = "repo-progress", version, about)]
struct Args {
    /// Base URL of the portfolio API (e.g. https://example.dev)
    #[arg(long, env = "PROGRESS_API_BASE", global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch commits and print the activity heatmap
    Heatmap {
        /// `owner/repo`, a repository URL, or a bare name (owner from PROGRESS_GITHUB_USERNAME)
        target: String,

        /// Lookback window in days
        #[arg(long)]
        days: Option<u32>,

        /// Only show the last N months
        #[arg(long)]
        months: Option<i32>,

        /// Hard start of the grid (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Hard end of the grid (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,

        /// List the commits of this day with their blurbs
        #[arg(long)]
        day: Option<NaiveDate>,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Parse a local progress log and print its blurbs
    Blurbs {
        file: PathBuf,

        /// Print only the blurb for this commit
        #[arg(long)]
        sha: Option<String>,
    },
    /// Fetch a project's case study
    CaseStudy {
        target: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Serialize)]
struct HeatmapReport<'a> {
    owner: &'a str,
    repo: &'a str,
    error: Option<&'a str>,
    heatmap: &'a Heatmap,
}

fn resolve_target(target: &str, config: &ProgressConfig) -> Result<(String, String)> {
    let resolved = RepoRef::parse_target(target, config.github_username.as_deref());
    match (resolved.owner, resolved.name) {
        (Some(owner), Some(name)) => Ok((owner, name)),
        _ => bail!(
            "cannot resolve owner and repository from {target:?}; \
             set PROGRESS_GITHUB_USERNAME or pass owner/repo"
        ),
    }
}

fn print_day(state: &ProgressState, day: NaiveDate) {
    let key = format_day(day);
    let entries = state.data.commits_on(&key);
    println!("\n{key}: {} commit(s)", entries.len());
    for entry in entries {
        let sha = &entry.commit.sha;
        println!("  {} {}", sha.get(..7).unwrap_or(sha), entry.commit.subject());
        if let Some(blurb) = entry.blurb {
            for line in blurb.lines() {
                println!("      {line}");
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repo_progress=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = ProgressConfig::from_env();
    let args = Args::parse();
    if let Some(api_base) = args.api_base {
        config.api_base = api_base.trim_end_matches('/').to_string();
    }

    match args.command {
        Command::Heatmap {
            target,
            days,
            months,
            start,
            end,
            day,
            format,
        } => {
            let (owner, repo) = resolve_target(&target, &config)?;
            let days = days.unwrap_or(config.lookback_days);
            let source = Arc::new(config.http_source()?);
            let loader = ProgressLoader::new(source, Arc::new(ProgressCache::new()));

            info!(%owner, %repo, days, "loading progress");
            let state = loader.load_and_wait(&owner, &repo, days).await;
            if let Some(error) = &state.error {
                warn!(%error, "commit history unavailable");
            }

            let heatmap = state.heatmap(&HeatmapOptions {
                start,
                end,
                months_window: months,
            });

            match format {
                Format::Text => {
                    print!("{}", render_text(&heatmap, &TextStyle::default()));
                    println!(
                        "{} commits over {} weeks, {} annotated",
                        heatmap.total_commits(),
                        heatmap.weeks.len(),
                        state.data.blurbs_by_sha.len()
                    );
                }
                Format::Json => {
                    let report = HeatmapReport {
                        owner: &owner,
                        repo: &repo,
                        error: state.error.as_deref(),
                        heatmap: &heatmap,
                    };
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
            }

            if let Some(day) = day {
                print_day(&state, day);
            }
        }
        Command::Blurbs { file, sha } => {
            let blurbs = parse_blurbs_file(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            match sha {
                Some(sha) => match blurbs.lookup(&sha) {
                    Some(blurb) => println!("{blurb}"),
                    None => bail!("no blurb for {sha}"),
                },
                None => {
                    let sorted: BTreeMap<&str, &str> = blurbs.iter().collect();
                    println!("{}", serde_json::to_string_pretty(&sorted)?);
                }
            }
        }
        Command::CaseStudy { target } => {
            let (owner, repo) = resolve_target(&target, &config)?;
            let study = config.http_source()?.fetch_case_study(&owner, &repo).await?;
            if study.is_empty() {
                info!(%owner, %repo, "no case study");
            } else {
                println!("{}", serde_json::to_string_pretty(&study)?);
            }
        }
    }

    Ok(())
}
