//! CLI for the fetchflow pipeline.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fetchflow_core::api::{DataSource, HttpSource, MemorySource};
use fetchflow_core::config::{self, FetchflowConfig};
use fetchflow_core::pipeline::{Pipeline, PipelineOptions};
use std::path::PathBuf;

use commands::{
    run_active, run_completions, run_demo, run_find_user, run_flaky, run_man, run_recent,
    run_search, run_stats, run_user,
};

/// Top-level CLI for fetchflow.
#[derive(Debug, Parser)]
#[command(name = "fetchflow")]
#[command(
    about = "fetchflow: retry, timeout and fan-out over a REST fetch pipeline",
    long_about = None
)]
pub struct Cli {
    /// Service base URL (overrides `base_url` from the config file).
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Serve the built-in sample data instead of calling the service.
    #[arg(long, global = true)]
    pub offline: bool,

    /// Read configuration from this file instead of the XDG config dir.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// List active users (even ids).
    Active,

    /// Show a user together with their posts.
    User {
        /// User identifier.
        id: u64,
    },

    /// Look a user up by email (case-insensitive).
    FindUser {
        /// Email address to search for.
        email: String,
    },

    /// Show the newest posts.
    Recent {
        /// Number of posts to show.
        #[arg(long, default_value = "5", value_name = "N")]
        limit: usize,
    },

    /// Search post titles, bounded by a deadline.
    Search {
        /// Text to look for in titles.
        term: String,
        /// Deadline in milliseconds (default: search_timeout_ms from config).
        #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
        timeout_ms: Option<u64>,
    },

    /// Post statistics (users and posts fetched concurrently).
    Stats,

    /// Run a randomly failing operation through the retry driver.
    Flaky {
        /// Attempt budget, including the first attempt.
        #[arg(
            long,
            default_value = "3",
            value_name = "N",
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        attempts: u32,
        /// Failure probability per attempt (default: flaky_failure_rate from config).
        #[arg(long, value_name = "RATE", value_parser = parse_rate)]
        failure_rate: Option<f64>,
    },

    /// Run the full staged walkthrough.
    Demo {
        /// Skip the pacing delays between stages.
        #[arg(long)]
        no_pacing: bool,
    },

    /// Print shell completions to stdout.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Print the man page to stdout.
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        // These need neither config nor network.
        match &cli.command {
            CliCommand::Completions { shell } => return run_completions(*shell),
            CliCommand::Man => return run_man(),
            _ => {}
        }

        let cfg = load_config(&cli)?;
        tracing::debug!("loaded config: {:?}", cfg);
        let options = PipelineOptions::from_config(&cfg);

        if cli.offline {
            tracing::info!("offline mode: serving built-in sample data");
            let pipeline = Pipeline::new(MemorySource::fixtures(), options);
            cli.command.dispatch(&pipeline, &cfg).await
        } else {
            let source = HttpSource::new(&cfg.base_url)
                .with_context(|| format!("invalid base_url {:?}", cfg.base_url))?;
            let pipeline = Pipeline::new(source, options);
            cli.command.dispatch(&pipeline, &cfg).await
        }
    }

    async fn dispatch<S: DataSource>(
        self,
        pipeline: &Pipeline<S>,
        cfg: &FetchflowConfig,
    ) -> Result<()> {
        match self {
            CliCommand::Active => run_active(pipeline).await?,
            CliCommand::User { id } => run_user(pipeline, id).await?,
            CliCommand::FindUser { email } => run_find_user(pipeline, &email).await?,
            CliCommand::Recent { limit } => run_recent(pipeline, limit).await?,
            CliCommand::Search { term, timeout_ms } => {
                let timeout = timeout_ms
                    .map(std::time::Duration::from_millis)
                    .unwrap_or_else(|| cfg.search_timeout());
                run_search(pipeline, &term, timeout).await?
            }
            CliCommand::Stats => run_stats(pipeline).await?,
            CliCommand::Flaky {
                attempts,
                failure_rate,
            } => {
                let rate = failure_rate.unwrap_or(cfg.flaky_failure_rate);
                run_flaky(cfg, attempts, rate).await?
            }
            CliCommand::Demo { no_pacing } => run_demo(pipeline, cfg, !no_pacing).await?,
            CliCommand::Completions { shell } => run_completions(shell)?,
            CliCommand::Man => run_man()?,
        }
        Ok(())
    }
}

/// Probability in `[0, 1]`, the range config validation accepts.
fn parse_rate(s: &str) -> Result<f64, String> {
    let rate: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(format!("{rate} is not between 0 and 1"))
    }
}

fn load_config(cli: &Cli) -> Result<FetchflowConfig> {
    let mut cfg = match &cli.config {
        Some(path) => config::load_from_path(path)?,
        None => config::load_or_init()?,
    };
    if let Some(url) = &cli.base_url {
        cfg.base_url = url.clone();
    }
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests;
