pub mod context;
pub mod error;
pub mod state;

use tracing::warn;

use crate::backup::BackupStore;
use crate::health::{HealthProbe, HealthVerifier};
use crate::output;
use crate::prereq;
use crate::stack::{StackController, StackRuntime};
use crate::workspace;

pub use context::DeployContext;
pub use error::{PipelineError, Stage};
pub use state::{PipelineState, StateTracker};

const TOTAL_STEPS: usize = 7;

/// Terminal result of one pipeline run, the only value returned to the
/// caller. `Aborted` means no stateful stage touched the stack;
/// `RolledBack` means the run failed at or after the build stage.
#[derive(Debug, PartialEq, Eq)]
pub enum DeploymentOutcome {
    Succeeded { services: Vec<String> },
    Aborted { stage: Stage, reason: String },
    RolledBack { stage: Stage, reason: String },
}

impl DeploymentOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            DeploymentOutcome::Succeeded { .. } => 0,
            DeploymentOutcome::Aborted { .. } | DeploymentOutcome::RolledBack { .. } => 1,
        }
    }
}

/// Sequences one deployment: prerequisite gate, workspace preparation,
/// backup snapshot, clean image build, stop/start cutover, health
/// verification, then cleanup on success or rollback on failure.
/// Strictly one pass per invocation; re-running is the caller's call.
pub struct Pipeline<'a, R: StackRuntime, P: HealthProbe> {
    ctx: &'a DeployContext,
    runtime: &'a R,
    verifier: HealthVerifier<P>,
}

impl<'a, R: StackRuntime, P: HealthProbe> Pipeline<'a, R, P> {
    pub fn new(ctx: &'a DeployContext, runtime: &'a R, verifier: HealthVerifier<P>) -> Self {
        Self {
            ctx,
            runtime,
            verifier,
        }
    }

    pub async fn run(&self) -> DeploymentOutcome {
        let mut tracker = StateTracker::new();

        output::header(&format!(
            "Deploying {} to {}",
            self.ctx.config.app.name, self.ctx.environment
        ));

        match self.execute(&mut tracker).await {
            Ok(services) => {
                tracker.advance(PipelineState::Succeeded);
                self.log_run(
                    output::Severity::Status,
                    &format!("deploy to {} succeeded", self.ctx.environment),
                );
                output::success(&format!(
                    "Deploy complete! {} service(s) healthy.",
                    services.len()
                ));
                DeploymentOutcome::Succeeded { services }
            }
            Err(err) => self.fail(&mut tracker, err).await,
        }
    }

    async fn execute(&self, tracker: &mut StateTracker) -> Result<Vec<String>, PipelineError> {
        // Step 1: prerequisite gate. Read-only, never retried.
        output::step(1, TOTAL_STEPS, "Checking prerequisites");
        let result = prereq::check(
            &self.ctx.config.deploy.required_tools,
            &self.ctx.required_artifacts(),
        );
        if !result.ok() {
            return Err(PipelineError::Prerequisite {
                missing: result.missing(),
            });
        }
        tracker.advance(PipelineState::PrereqChecked);
        output::success("Prerequisites present");

        // Step 2: Workspace directories
        output::step(2, TOTAL_STEPS, "Preparing workspace directories");
        workspace::ensure_directories(&self.ctx.workspace_dirs())
            .map_err(PipelineError::Workspace)?;
        tracker.advance(PipelineState::Prepared);
        output::success("Workspace ready");

        // Step 3: Backup snapshot. No deploy proceeds to the build stage
        // without one.
        output::step(3, TOTAL_STEPS, "Snapshotting pre-deploy state");
        let listing = match self.runtime.running_containers().await {
            Ok(listing) => listing,
            Err(e) => {
                warn!("Could not capture container listing: {:#}", e);
                String::new()
            }
        };
        let store = BackupStore::new(self.ctx.backup_dir());
        let record = store
            .snapshot(&self.ctx.env_file(), &listing)
            .map_err(PipelineError::BackupIo)?;
        tracker.advance(PipelineState::BackedUp);
        output::success(&format!("Backup {} created", record.id));

        // Step 4: Clean image build, single blocking call.
        output::step(4, TOTAL_STEPS, "Building images (no cache)");
        let spinner = output::create_spinner("Building...");
        let built = self.runtime.build_images().await;
        spinner.finish_and_clear();
        built.map_err(|e| PipelineError::Build(format!("{:#}", e)))?;
        tracker.advance(PipelineState::Built);
        output::success("Images built");

        // Step 5: cutover. Stop old, start new, settle.
        output::step(5, TOTAL_STEPS, "Cutting over to the new stack");
        let controller = StackController::new(self.runtime, self.ctx.settle());
        controller
            .cutover()
            .await
            .map_err(|e| PipelineError::Stack(format!("{:#}", e)))?;
        tracker.advance(PipelineState::CutOver);
        output::success("New stack started");

        // Step 6: Health verification across all services.
        output::step(6, TOTAL_STEPS, "Verifying service health");
        let checks = self.ctx.health_checks();
        let report = self.verifier.verify(&checks).await;
        if !report.all_healthy() {
            return Err(PipelineError::HealthCheck {
                services: report.unhealthy_services(),
            });
        }
        tracker.advance(PipelineState::HealthVerified);
        output::success("All services healthy");

        // Step 7: Best-effort housekeeping; never demotes the outcome.
        output::step(7, TOTAL_STEPS, "Cleaning up");
        self.cleanup(&store).await;

        Ok(checks.into_iter().map(|c| c.service).collect())
    }

    /// Map a fatal error to its terminal state. Pre-cutover failures abort
    /// with the stack untouched; later failures roll back, tearing down
    /// the new stack only once `stop_all` has actually been issued.
    async fn fail(&self, tracker: &mut StateTracker, err: PipelineError) -> DeploymentOutcome {
        let stage = err.stage();
        let reason = err.to_string();
        output::error(&format!("Deploy failed at {}: {}", stage, reason));

        if err.aborts_run() {
            tracker.advance(PipelineState::Aborted);
            self.log_run(
                output::Severity::Error,
                &format!("deploy aborted at {}: {}", stage, reason),
            );
            return DeploymentOutcome::Aborted { stage, reason };
        }

        if err.needs_teardown() {
            output::warning("Tearing down the new stack...");
            let controller = StackController::new(self.runtime, self.ctx.settle());
            controller.teardown().await;
            output::info("New stack stopped. Backups are kept for manual recovery.");
        }

        tracker.advance(PipelineState::RolledBack);
        self.log_run(
            output::Severity::Error,
            &format!("deploy rolled back at {}: {}", stage, reason),
        );
        DeploymentOutcome::RolledBack { stage, reason }
    }

    async fn cleanup(&self, store: &BackupStore) {
        if let Err(e) = self.runtime.prune_dangling_images().await {
            warn!("Image prune failed: {:#}", e);
            output::warning(&format!("Image prune failed: {:#}", e));
        }

        match store.prune(self.ctx.keep_backups()) {
            Ok(removed) if !removed.is_empty() => {
                output::success(&format!("Pruned {} old backup(s)", removed.len()));
            }
            Ok(_) => {}
            Err(e) => {
                warn!("Backup prune failed: {}", e);
                output::warning(&format!("Backup prune failed: {}", e));
            }
        }
    }

    /// Persist a run-log line once the workspace stage has guaranteed the
    /// log directory. Earlier failures leave the filesystem untouched.
    fn log_run(&self, severity: output::Severity, msg: &str) {
        let log_dir = self.ctx.log_dir();
        if log_dir.is_dir() {
            output::append_run_log(&log_dir, severity, msg);
        }
    }
}
