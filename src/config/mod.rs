use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

mod validate;

/// Target environment for a deployment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Staging,
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DeckhandConfig {
    pub app: AppConfig,
    #[serde(default)]
    pub deploy: DeployConfig,
    #[serde(default)]
    pub environments: BTreeMap<Environment, EnvironmentConfig>,
    #[serde(default)]
    pub health_checks: Vec<HealthCheckConfig>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AppConfig {
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DeployConfig {
    #[serde(default = "default_backup_dir")]
    pub backup_dir: PathBuf,
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    #[serde(default = "default_cert_dir")]
    pub cert_dir: PathBuf,
    /// Backups kept after a successful deploy; older ones are pruned.
    #[serde(default = "default_keep_backups")]
    pub keep_backups: usize,
    /// Grace period between `up -d` returning and the first health probe.
    #[serde(default = "default_settle_seconds")]
    pub settle_seconds: u64,
    #[serde(default = "default_required_tools")]
    pub required_tools: Vec<String>,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            backup_dir: default_backup_dir(),
            log_dir: default_log_dir(),
            cert_dir: default_cert_dir(),
            keep_backups: default_keep_backups(),
            settle_seconds: default_settle_seconds(),
            required_tools: default_required_tools(),
        }
    }
}

fn default_backup_dir() -> PathBuf {
    PathBuf::from("backups")
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_cert_dir() -> PathBuf {
    PathBuf::from("certs")
}

fn default_keep_backups() -> usize {
    5
}

fn default_settle_seconds() -> u64 {
    10
}

fn default_required_tools() -> Vec<String> {
    vec!["docker".to_string()]
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnvironmentConfig {
    pub compose_file: PathBuf,
    pub env_file: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthCheckConfig {
    pub service: String,
    pub url: String,
    #[serde(default = "default_health_timeout")]
    pub timeout_seconds: u64,
    /// Exact status to require; any 2xx is accepted when unset.
    pub expect_status: Option<u16>,
}

fn default_health_timeout() -> u64 {
    5
}

impl HealthCheckConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl DeckhandConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        validate::validate(&config)?;

        Ok(config)
    }

    pub fn environment(&self, env: Environment) -> Result<&EnvironmentConfig> {
        self.environments
            .get(&env)
            .with_context(|| format!("Environment '{}' not found in config", env))
    }
}
