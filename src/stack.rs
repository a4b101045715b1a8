use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// Seam between the pipeline and the container runtime, so orchestration
/// can be exercised without a Docker daemon.
#[async_trait]
pub trait StackRuntime: Send + Sync {
    /// Rebuild all service images from scratch. Single blocking call, no
    /// internal retry; a failed build is a code/config problem.
    async fn build_images(&self) -> Result<()>;

    /// Bring up the full stack detached.
    async fn start_all(&self) -> Result<()>;

    /// Tear down whatever is currently running; must tolerate an empty
    /// stack.
    async fn stop_all(&self) -> Result<()>;

    /// Listing of currently running containers, verbatim.
    async fn running_containers(&self) -> Result<String>;

    /// Remove dangling build artifacts no running container references.
    async fn prune_dangling_images(&self) -> Result<()>;
}

/// Owns the old-stack/new-stack cutover boundary.
pub struct StackController<'a, R: StackRuntime + ?Sized> {
    runtime: &'a R,
    settle: Duration,
}

impl<'a, R: StackRuntime + ?Sized> StackController<'a, R> {
    pub fn new(runtime: &'a R, settle: Duration) -> Self {
        Self { runtime, settle }
    }

    /// Stop the running stack, start the new one, then wait out the settle
    /// interval so services get bounded startup time before the first
    /// health probe.
    pub async fn cutover(&self) -> Result<()> {
        self.runtime.stop_all().await?;
        self.runtime.start_all().await?;

        if !self.settle.is_zero() {
            debug!("Settling for {:?} before health probes", self.settle);
            tokio::time::sleep(self.settle).await;
        }

        Ok(())
    }

    /// Best-effort stop used during rollback. Never raises: a teardown
    /// failure must not mask the original deploy failure.
    pub async fn teardown(&self) {
        if let Err(e) = self.runtime.stop_all().await {
            warn!("Teardown of new stack failed: {:#}", e);
        }
    }
}
