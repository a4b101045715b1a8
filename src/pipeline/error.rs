use std::fmt;

/// Pipeline stages, in execution order. Stage names surface in failure
/// outcomes and the run log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Prerequisites,
    Workspace,
    Backup,
    Build,
    Cutover,
    HealthCheck,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Prerequisites => "prerequisites",
            Stage::Workspace => "workspace",
            Stage::Backup => "backup",
            Stage::Build => "build",
            Stage::Cutover => "cutover",
            Stage::HealthCheck => "health-check",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fatal failures, one variant per stage that can kill a run. Cleanup
/// problems are deliberately absent: they are logged and never change the
/// terminal outcome.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("missing prerequisites: {}", missing.join(", "))]
    Prerequisite { missing: Vec<String> },

    #[error("failed to prepare workspace directories: {0}")]
    Workspace(#[source] std::io::Error),

    #[error("backup snapshot failed: {0}")]
    BackupIo(#[source] std::io::Error),

    #[error("image build failed: {0}")]
    Build(String),

    #[error("stack cutover failed: {0}")]
    Stack(String),

    #[error("unhealthy services: {}", services.join(", "))]
    HealthCheck { services: Vec<String> },
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Prerequisite { .. } => Stage::Prerequisites,
            PipelineError::Workspace(_) => Stage::Workspace,
            PipelineError::BackupIo(_) => Stage::Backup,
            PipelineError::Build(_) => Stage::Build,
            PipelineError::Stack(_) => Stage::Cutover,
            PipelineError::HealthCheck { .. } => Stage::HealthCheck,
        }
    }

    /// True for failures before any stateful stage ran. Such runs abort
    /// outright; there is nothing to roll back.
    pub fn aborts_run(&self) -> bool {
        matches!(
            self,
            PipelineError::Prerequisite { .. }
                | PipelineError::Workspace(_)
                | PipelineError::BackupIo(_)
        )
    }

    /// True once `stop_all` has been issued, meaning a half-started new
    /// stack may exist and must be torn down. A failed build never reaches
    /// that point: the prior stack is still running and must be left alone.
    pub fn needs_teardown(&self) -> bool {
        matches!(
            self,
            PipelineError::Stack(_) | PipelineError::HealthCheck { .. }
        )
    }
}
