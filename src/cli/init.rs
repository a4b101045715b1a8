use anyhow::{bail, Context, Result};
use std::path::Path;

use deckhand::output;

pub fn run(project_root: &Path) -> Result<()> {
    let config_path = project_root.join("deckhand.toml");
    if config_path.exists() {
        bail!("deckhand.toml already exists in this directory");
    }

    let app_name = project_root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "myapp".to_string());

    let content = format!(
        r#"[app]
name = "{app_name}"

[deploy]
backup_dir = "backups"
log_dir = "logs"
cert_dir = "certs"
keep_backups = 5
settle_seconds = 10
required_tools = ["docker"]

[environments.staging]
compose_file = "docker-compose.yml"
env_file = ".env.staging"

[environments.production]
compose_file = "docker-compose.prod.yml"
env_file = ".env.production"

[[health_checks]]
service = "main-api"
url = "http://localhost:8000/health/ready"

[[health_checks]]
service = "secondary-api"
url = "http://localhost:8001/health"

[[health_checks]]
service = "frontend"
url = "http://localhost:3000/health"
"#
    );

    std::fs::write(&config_path, content).context("Failed to write deckhand.toml")?;

    output::success("Created deckhand.toml");
    output::info("Edit the file to match your compose files and health endpoints.");

    Ok(())
}
