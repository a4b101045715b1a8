use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::debug;

use crate::stack::StackRuntime;

/// Runs the stack through the `docker` CLI: `docker compose` for lifecycle
/// operations, plain `docker` for listings and artifact pruning.
#[derive(Debug, Clone)]
pub struct ComposeStack {
    compose_file: PathBuf,
    env_file: PathBuf,
}

impl ComposeStack {
    pub fn new(compose_file: impl Into<PathBuf>, env_file: impl Into<PathBuf>) -> Self {
        Self {
            compose_file: compose_file.into(),
            env_file: env_file.into(),
        }
    }

    async fn run_docker(&self, args: &[&str]) -> Result<String> {
        debug!("Running docker {}", args.join(" "));

        let output = Command::new("docker")
            .args(args)
            .output()
            .await
            .with_context(|| format!("Failed to run docker {}", args.join(" ")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("docker {} failed: {}", args.join(" "), stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn run_compose(&self, args: &[&str]) -> Result<String> {
        let compose_file = self.compose_file.to_string_lossy().into_owned();
        let env_file = self.env_file.to_string_lossy().into_owned();

        let mut full: Vec<&str> = vec![
            "compose",
            "-f",
            compose_file.as_str(),
            "--env-file",
            env_file.as_str(),
        ];
        full.extend_from_slice(args);

        self.run_docker(&full).await
    }
}

#[async_trait]
impl StackRuntime for ComposeStack {
    /// Clean rebuild of every service image. `--no-cache` trades speed for
    /// reproducibility: a stale layer cache can mask untracked dependency
    /// drift.
    async fn build_images(&self) -> Result<()> {
        self.run_compose(&["build", "--no-cache"]).await?;
        Ok(())
    }

    async fn start_all(&self) -> Result<()> {
        self.run_compose(&["up", "-d"]).await?;
        Ok(())
    }

    /// Tolerant of nothing running; `compose down` exits zero in that case.
    async fn stop_all(&self) -> Result<()> {
        self.run_compose(&["down", "--remove-orphans"]).await?;
        Ok(())
    }

    /// Verbatim `docker ps` listing, stored as an opaque blob in backups.
    async fn running_containers(&self) -> Result<String> {
        self.run_docker(&["ps"]).await
    }

    async fn prune_dangling_images(&self) -> Result<()> {
        self.run_docker(&["image", "prune", "-f"]).await?;
        Ok(())
    }
}
