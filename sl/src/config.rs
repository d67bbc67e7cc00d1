//! servicelogger configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::cli::SendArgs;
use crate::delivery::TargetId;

/// OCM URL used when nothing else is configured
pub const DEFAULT_OCM_URL: &str = "https://api.openshift.com";

/// File configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OCM API base URL
    #[serde(rename = "ocm-url")]
    pub ocm_url: String,

    /// Per-request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ocm_url: DEFAULT_OCM_URL.to_string(),
            timeout_ms: 60_000,
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// An explicit path must load; otherwise the first candidate that loads
    /// wins and defaults are used when none does.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for candidate in Self::candidate_paths() {
            if !candidate.exists() {
                continue;
            }
            match Self::load_from_file(&candidate) {
                Ok(config) => return Ok(config),
                Err(e) => tracing::warn!(path = %candidate.display(), "Skipping config file: {:#}", e),
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// `.servicelogger.yml` in the working directory, then the user config dir
    fn candidate_paths() -> impl Iterator<Item = PathBuf> {
        [
            Some(PathBuf::from(".servicelogger.yml")),
            dirs::config_dir().map(|dir| dir.join("servicelogger").join("servicelogger.yml")),
        ]
        .into_iter()
        .flatten()
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        if config.timeout_ms == 0 {
            eyre::bail!("timeout-ms must be greater than 0");
        }

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Missing required settings for `send`
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("OCM token not set. Pass --ocm-token or set OCM_TOKEN.")]
    MissingToken,

    #[error("No cluster IDs given. Pass --cluster-id/--cluster-ids or set CLUSTER_ID/CLUSTER_IDS.")]
    MissingTargets,
}

/// Everything `send` needs, resolved once up front
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendConfig {
    pub base_url: String,
    pub auth_token: String,
    pub target_ids: Vec<TargetId>,
    pub timeout: Duration,
}

impl SendConfig {
    /// Resolve from flags, then the process environment, then the config file
    pub fn resolve(args: &SendArgs, config: &Config) -> Result<Self, ConfigError> {
        Self::resolve_with(args, config, |name| std::env::var(name).ok())
    }

    /// Resolve using `env` to look up environment variables
    pub fn resolve_with(
        args: &SendArgs,
        config: &Config,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let base_url = non_blank(args.ocm_url.clone())
            .or_else(|| non_blank(env("OCM_URL")))
            .unwrap_or_else(|| config.ocm_url.clone());

        let auth_token = non_blank(args.ocm_token.clone())
            .or_else(|| non_blank(env("OCM_TOKEN")))
            .ok_or(ConfigError::MissingToken)?;

        let target_ids = if let Some(ids) = &args.cluster_ids {
            clean_ids(ids.iter().map(String::as_str))
        } else if let Some(id) = &args.cluster_id {
            clean_ids([id.as_str()])
        } else if let Some(ids) = non_blank(env("CLUSTER_IDS")) {
            clean_ids(ids.split_whitespace())
        } else if let Some(id) = non_blank(env("CLUSTER_ID")) {
            clean_ids([id.as_str()])
        } else {
            Vec::new()
        };

        if target_ids.is_empty() {
            return Err(ConfigError::MissingTargets);
        }

        Ok(Self {
            base_url,
            auth_token,
            target_ids,
            timeout: Duration::from_millis(config.timeout_ms),
        })
    }
}

/// Trim IDs and drop blanks; duplicates are kept
fn clean_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Vec<TargetId> {
    ids.into_iter()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}
