use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::Accessor;
use crate::retry::RetryPolicy;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per call (including the first). Must be >= 1.
    pub max_attempts: u32,
    /// Base delay in milliseconds; the wait after attempt n is base * 2^n.
    pub base_delay_ms: u64,
    /// Maximum backoff delay in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 100,
            max_delay_ms: 30_000,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts)
            .with_base_delay(Duration::from_millis(self.base_delay_ms))
            .with_max_delay(Duration::from_millis(self.max_delay_ms))
    }
}

/// Global configuration loaded from `~/.config/fetchflow/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchflowConfig {
    /// Base URL of the REST service exposing `/users` and `/posts`.
    pub base_url: String,
    /// Deadline applied to every remote call, in milliseconds.
    pub request_timeout_ms: u64,
    /// Deadline for the title search stage, in milliseconds.
    pub search_timeout_ms: u64,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    /// Accessors that are retried on failure in addition to being bounded.
    #[serde(default = "default_unstable")]
    pub unstable: Vec<Accessor>,
    /// Failure probability of the demo's flaky operation (0.0..=1.0).
    #[serde(default = "default_flaky_failure_rate")]
    pub flaky_failure_rate: f64,
}

fn default_unstable() -> Vec<Accessor> {
    vec![Accessor::Users, Accessor::Posts]
}

fn default_flaky_failure_rate() -> f64 {
    0.7
}

impl Default for FetchflowConfig {
    fn default() -> Self {
        Self {
            base_url: "https://jsonplaceholder.typicode.com".to_string(),
            request_timeout_ms: 10_000,
            search_timeout_ms: 5_000,
            retry: None,
            unstable: default_unstable(),
            flaky_failure_rate: default_flaky_failure_rate(),
        }
    }
}

impl FetchflowConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_millis(self.search_timeout_ms)
    }

    /// Retry policy from the `[retry]` section, or the defaults.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone().unwrap_or_default().policy()
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            bail!("base_url must not be empty");
        }
        if self.request_timeout_ms == 0 || self.search_timeout_ms == 0 {
            bail!("timeouts must be greater than zero");
        }
        if let Some(retry) = &self.retry {
            if retry.max_attempts == 0 {
                bail!("retry.max_attempts must be at least 1");
            }
        }
        if !(0.0..=1.0).contains(&self.flaky_failure_rate) {
            bail!(
                "flaky_failure_rate must be within 0.0..=1.0, got {}",
                self.flaky_failure_rate
            );
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("fetchflow")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load and validate configuration from an explicit file.
pub fn load_from_path(path: &Path) -> Result<FetchflowConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: FetchflowConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FetchflowConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FetchflowConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}
