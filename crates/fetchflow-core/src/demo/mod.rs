//! Staged walkthrough of the pipeline: sequential stages, a bounded search,
//! concurrent statistics, a retried flaky operation and a three-way join.
//!
//! A failing stage is recorded in the report and the walkthrough moves on.

mod flaky;

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

use crate::api::DataSource;
use crate::config::FetchflowConfig;
use crate::flow::{delay, lift, with_timeout, with_timeout_cancellable};
use crate::pipeline::{Pipeline, PipelineError};
use crate::retry::{run_with_retry, RetryPolicy};

pub use flaky::{FlakyError, FlakyOperation};

/// The eight stages, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ActiveUsers,
    UserWithPosts,
    FindByEmail,
    RecentPosts,
    TitleSearch,
    Stats,
    FlakyRetry,
    Parallel,
}

impl Stage {
    pub const ALL: [Stage; 8] = [
        Stage::ActiveUsers,
        Stage::UserWithPosts,
        Stage::FindByEmail,
        Stage::RecentPosts,
        Stage::TitleSearch,
        Stage::Stats,
        Stage::FlakyRetry,
        Stage::Parallel,
    ];

    pub fn number(self) -> usize {
        Stage::ALL.iter().position(|s| *s == self).unwrap_or(0) + 1
    }

    pub fn title(self) -> &'static str {
        match self {
            Stage::ActiveUsers => "active users",
            Stage::UserWithPosts => "user with posts",
            Stage::FindByEmail => "find user by email",
            Stage::RecentPosts => "recent posts",
            Stage::TitleSearch => "title search with timeout",
            Stage::Stats => "statistics (concurrent requests)",
            Stage::FlakyRetry => "retrying a flaky operation",
            Stage::Parallel => "three-way concurrent join",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.title())
    }
}

/// Knobs for the walkthrough.
#[derive(Debug, Clone)]
pub struct DemoOptions {
    /// Email looked up in stage 3.
    pub email: String,
    /// Search term and deadline for stage 5.
    pub search_term: String,
    pub search_timeout: Duration,
    /// Stage 7: failure probability, attempt budget and per-attempt deadline.
    pub flaky_failure_rate: f64,
    pub flaky_policy: RetryPolicy,
    pub flaky_attempt_timeout: Duration,
    /// Insert the pacing delays between stages.
    pub pacing: bool,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self::from_config(&FetchflowConfig::default())
    }
}

impl DemoOptions {
    pub fn from_config(cfg: &FetchflowConfig) -> Self {
        Self {
            email: "Sincere@april.biz".to_string(),
            search_term: "dolor".to_string(),
            search_timeout: cfg.search_timeout(),
            flaky_failure_rate: cfg.flaky_failure_rate,
            flaky_policy: cfg.retry_policy(),
            flaky_attempt_timeout: cfg.request_timeout(),
            pacing: true,
        }
    }
}

/// Outcome of one stage: summary lines on success, the error text otherwise.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub stage: Stage,
    pub outcome: Result<Vec<String>, String>,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Default)]
pub struct DemoReport {
    pub stages: Vec<StageReport>,
}

impl DemoReport {
    pub fn get(&self, stage: Stage) -> Option<&StageReport> {
        self.stages.iter().find(|r| r.stage == stage)
    }

    pub fn failures(&self) -> impl Iterator<Item = &StageReport> {
        self.stages.iter().filter(|r| r.outcome.is_err())
    }
}

type Outcome = Result<Vec<String>, String>;

/// Runs every stage in order against `pipeline`.
pub async fn run_demo<S: DataSource>(pipeline: &Pipeline<S>, opts: &DemoOptions) -> DemoReport {
    let mut report = DemoReport::default();
    let mut first_active: Option<u64> = None;

    for stage in Stage::ALL {
        tracing::info!(%stage, "stage start");
        let start = Instant::now();
        let outcome = match stage {
            Stage::ActiveUsers => {
                pace(opts, 1000).await;
                match pipeline.active_users().await {
                    Ok(users) => {
                        first_active = users.first().map(|u| u.id);
                        let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
                        Ok(vec![format!("active users: {}", names.join(", "))])
                    }
                    Err(e) => Err(describe(&e)),
                }
            }
            Stage::UserWithPosts => user_with_posts(pipeline, first_active).await,
            Stage::FindByEmail => find_by_email(pipeline, &opts.email).await,
            Stage::RecentPosts => recent_posts(pipeline).await,
            Stage::TitleSearch => title_search(pipeline, opts).await,
            Stage::Stats => {
                pace(opts, 500).await;
                stats(pipeline).await
            }
            Stage::FlakyRetry => {
                pace(opts, 500).await;
                flaky_retry(opts).await
            }
            Stage::Parallel => {
                pace(opts, 300).await;
                parallel(pipeline).await
            }
        };
        let elapsed = start.elapsed();
        match &outcome {
            Ok(_) => tracing::info!(%stage, elapsed_ms = elapsed.as_millis() as u64, "stage done"),
            Err(e) => tracing::warn!(%stage, error = %e, "stage failed"),
        }
        report.stages.push(StageReport {
            stage,
            outcome,
            elapsed,
        });
    }

    report
}

async fn pace(opts: &DemoOptions, ms: u64) {
    if opts.pacing {
        delay(Duration::from_millis(ms)).await;
    }
}

async fn user_with_posts<S: DataSource>(pipeline: &Pipeline<S>, user_id: Option<u64>) -> Outcome {
    let Some(user_id) = user_id else {
        return Ok(vec!["no active users, skipped".to_string()]);
    };
    let view = pipeline.user_with_posts(user_id).await.map_err(|e| describe(&e))?;
    let mut lines = vec![
        format!("user: {}", view.user.name),
        format!("posts: {}", view.post_count),
    ];
    if let Some(first) = view.posts.first() {
        lines.push(format!("first post: {}", first.title));
    }
    Ok(lines)
}

async fn find_by_email<S: DataSource>(pipeline: &Pipeline<S>, email: &str) -> Outcome {
    let found = pipeline
        .find_user_by_email(email)
        .await
        .map_err(|e| describe(&e))?;
    Ok(vec![match found {
        Some(user) => format!("found: {} ({})", user.name, user.email),
        None => format!("no user with email {}", email),
    }])
}

async fn recent_posts<S: DataSource>(pipeline: &Pipeline<S>) -> Outcome {
    let posts = pipeline.recent_posts(3).await.map_err(|e| describe(&e))?;
    Ok(posts
        .iter()
        .map(|p| format!("- {}", truncate(&p.title, 50)))
        .collect())
}

async fn title_search<S: DataSource>(pipeline: &Pipeline<S>, opts: &DemoOptions) -> Outcome {
    let found = with_timeout(
        lift(pipeline.search_posts_by_title(&opts.search_term)),
        opts.search_timeout,
    )
    .await
    .map_err(|e| describe(&e))?;
    Ok(vec![format!(
        "{} posts with \"{}\" in the title",
        found.len(),
        opts.search_term
    )])
}

async fn stats<S: DataSource>(pipeline: &Pipeline<S>) -> Outcome {
    let stats = pipeline.posts_stats().await.map_err(|e| describe(&e))?;
    let mut lines = vec![
        format!("users: {}", stats.total_users),
        format!("posts: {}", stats.total_posts),
        format!("average posts per user: {}", stats.average_posts_per_user),
    ];
    if let Some(top) = &stats.top_poster {
        lines.push(format!(
            "most active: {} ({} posts)",
            top.user_name, top.post_count
        ));
    }
    Ok(lines)
}

async fn flaky_retry(opts: &DemoOptions) -> Outcome {
    let op = FlakyOperation::new(opts.flaky_failure_rate);
    let value = run_with_retry(&opts.flaky_policy, || {
        with_timeout_cancellable(opts.flaky_attempt_timeout, |token| op.run(token))
    })
    .await
    .map_err(|e| describe(&e))?;
    Ok(vec![format!("operation finished: {}", value)])
}

async fn parallel<S: DataSource>(pipeline: &Pipeline<S>) -> Outcome {
    let (recent, found, ()) = tokio::try_join!(
        pipeline.recent_posts(2),
        pipeline.search_posts_by_title("sit"),
        async {
            delay(Duration::from_millis(1000)).await;
            Ok::<(), PipelineError>(())
        },
    )
    .map_err(|e| describe(&e))?;
    Ok(vec![
        format!("recent posts: {}", recent.len()),
        format!("posts with \"sit\": {}", found.len()),
    ])
}

/// The error followed by its sources, `: `-separated.
fn describe(e: &dyn std::error::Error) -> String {
    let mut text = e.to_string();
    let mut source = e.source();
    while let Some(inner) = source {
        text.push_str(": ");
        text.push_str(&inner.to_string());
        source = inner.source();
    }
    text
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests;
