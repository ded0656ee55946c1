//! Configuration
//!
//! Two layers, both TOML:
//! - the repository's merge policy, read from a file in the repository on
//!   every event (`.github/automerge.toml` by default)
//! - the application config, read once from the local config directory

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Default location of the policy file inside a repository.
pub const DEFAULT_POLICY_PATH: &str = ".github/automerge.toml";

/// Directory name under the user's config dir.
const APP_DIR: &str = "automerge";

/// Filename of the application config.
const APP_CONFIG_FILE: &str = "config.toml";

/// Upper bound for the recheck delay.
const MAX_RECHECK_DELAY_SECS: u64 = 3600;

/// Upper bound for the number of rechecks per evaluation chain.
const MAX_RECHECK_ATTEMPTS: u32 = 1000;

/// Review thresholds for a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergePolicy {
    /// Minimum number of approvals
    #[serde(alias = "minApprovals")]
    pub min_approvals: u32,
    /// Maximum number of outstanding change requests
    #[serde(alias = "maxRequestedChanges")]
    pub max_requested_changes: u32,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            min_approvals: 1,
            max_requested_changes: 0,
        }
    }
}

impl MergePolicy {
    /// Parse a policy file. Missing keys fall back to their defaults.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("invalid merge policy: {e}")))
    }
}

/// Read the merge policy from the repository.
///
/// Returns the default policy if the file doesn't exist.
pub async fn load_repo_policy(platform: &dyn PlatformService, path: &str) -> Result<MergePolicy> {
    match platform.get_file_content(path).await? {
        Some(content) => {
            let policy = MergePolicy::from_toml(&content)?;
            debug!(path, ?policy, "loaded merge policy");
            Ok(policy)
        }
        None => {
            debug!(path, "no merge policy file, using defaults");
            Ok(MergePolicy::default())
        }
    }
}

/// Delayed re-evaluation while checks are still running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecheckConfig {
    /// Seconds to wait before re-evaluating
    pub delay_secs: u64,
    /// Rechecks allowed before giving up on a PR
    pub max_attempts: u32,
}

impl Default for RecheckConfig {
    fn default() -> Self {
        Self {
            delay_secs: 60,
            max_attempts: 30,
        }
    }
}

impl RecheckConfig {
    /// Delay as a `Duration`
    pub const fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// GitHub Enterprise host (None for github.com)
    pub host: Option<String>,
    /// Path of the policy file inside each repository
    pub policy_path: String,
    /// Recheck scheduling
    pub recheck: RecheckConfig,
    /// Logging
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: None,
            policy_path: DEFAULT_POLICY_PATH.to_string(),
            recheck: RecheckConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse and validate application config from TOML.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| Error::Config(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.recheck.delay_secs == 0 || self.recheck.delay_secs > MAX_RECHECK_DELAY_SECS {
            return Err(Error::Config(format!(
                "recheck.delay_secs must be between 1 and {MAX_RECHECK_DELAY_SECS}, got {}",
                self.recheck.delay_secs
            )));
        }
        if self.recheck.max_attempts == 0 || self.recheck.max_attempts > MAX_RECHECK_ATTEMPTS {
            return Err(Error::Config(format!(
                "recheck.max_attempts must be between 1 and {MAX_RECHECK_ATTEMPTS}, got {}",
                self.recheck.max_attempts
            )));
        }
        if self.policy_path.trim().is_empty() {
            return Err(Error::Config("policy_path cannot be empty".to_string()));
        }
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(Error::Config(format!(
                "logging.level must be one of {}, got {}",
                valid_levels.join(", "),
                self.logging.level
            )));
        }
        Ok(())
    }
}

/// Default path of the application config file, if a config dir exists.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(APP_CONFIG_FILE))
}

/// Load application config.
///
/// An explicit path must exist. Without one, the default location is used and
/// a missing file yields the defaults.
pub fn load_app_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(AppConfig::default()),
        },
    };

    let content = fs::read_to_string(&path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    AppConfig::from_toml(&content).map_err(|e| match e {
        Error::Config(msg) => Error::Config(format!("{}: {msg}", path.display())),
        other => other,
    })
}
