use std::path::PathBuf;
use std::time::Duration;

use crate::config::{DeckhandConfig, Environment, EnvironmentConfig};
use crate::health::ServiceHealthCheck;

/// Immutable request for one deployment run. Built once before the
/// pipeline starts and threaded through every component; nothing in here
/// changes while a run is in flight.
pub struct DeployContext {
    pub config: DeckhandConfig,
    pub environment: Environment,
    pub env: EnvironmentConfig,
    pub project_root: PathBuf,
}

impl DeployContext {
    pub fn new(
        config: DeckhandConfig,
        environment: Environment,
        env: EnvironmentConfig,
        project_root: PathBuf,
    ) -> Self {
        Self {
            config,
            environment,
            env,
            project_root,
        }
    }

    pub fn compose_file(&self) -> PathBuf {
        self.project_root.join(&self.env.compose_file)
    }

    pub fn env_file(&self) -> PathBuf {
        self.project_root.join(&self.env.env_file)
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.project_root.join(&self.config.deploy.backup_dir)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.project_root.join(&self.config.deploy.log_dir)
    }

    pub fn cert_dir(&self) -> PathBuf {
        self.project_root.join(&self.config.deploy.cert_dir)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_secs(self.config.deploy.settle_seconds)
    }

    pub fn keep_backups(&self) -> usize {
        self.config.deploy.keep_backups
    }

    /// Config artifacts that must exist before the run starts.
    pub fn required_artifacts(&self) -> Vec<PathBuf> {
        vec![self.compose_file(), self.env_file()]
    }

    /// Directories the workspace preparer guarantees before any backup.
    pub fn workspace_dirs(&self) -> Vec<PathBuf> {
        vec![self.backup_dir(), self.log_dir(), self.cert_dir()]
    }

    pub fn health_checks(&self) -> Vec<ServiceHealthCheck> {
        self.config
            .health_checks
            .iter()
            .map(ServiceHealthCheck::from)
            .collect()
    }
}
