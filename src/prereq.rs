use std::fs::File;
use std::path::{Path, PathBuf};

/// Outcome of the pre-deploy gate: which tools and config artifacts exist.
///
/// Read-only probe. A single missing entry blocks the run before any
/// stateful stage executes.
#[derive(Debug)]
pub struct PrerequisiteResult {
    pub tools: Vec<(String, bool)>,
    pub artifacts: Vec<(PathBuf, bool)>,
}

impl PrerequisiteResult {
    pub fn ok(&self) -> bool {
        self.tools.iter().all(|(_, present)| *present)
            && self.artifacts.iter().all(|(_, present)| *present)
    }

    /// Names of every missing tool and artifact, in probe order.
    pub fn missing(&self) -> Vec<String> {
        let mut missing: Vec<String> = self
            .tools
            .iter()
            .filter(|(_, present)| !present)
            .map(|(name, _)| name.clone())
            .collect();
        missing.extend(
            self.artifacts
                .iter()
                .filter(|(_, present)| !present)
                .map(|(path, _)| path.display().to_string()),
        );
        missing
    }
}

pub fn check(tools: &[String], artifacts: &[PathBuf]) -> PrerequisiteResult {
    let tools = tools
        .iter()
        .map(|name| (name.clone(), which::which(name).is_ok()))
        .collect();

    let artifacts = artifacts
        .iter()
        .map(|path| (path.clone(), readable_file(path)))
        .collect();

    PrerequisiteResult { tools, artifacts }
}

fn readable_file(path: &Path) -> bool {
    path.is_file() && File::open(path).is_ok()
}
