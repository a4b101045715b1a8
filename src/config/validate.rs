use anyhow::{bail, Result};
use std::collections::HashSet;

use super::DeckhandConfig;

pub fn validate(config: &DeckhandConfig) -> Result<()> {
    if config.app.name.is_empty() {
        bail!("app.name cannot be empty");
    }

    if config.environments.is_empty() {
        bail!("No environments defined. Add at least [environments.staging]");
    }

    for (env, ec) in &config.environments {
        if ec.compose_file.as_os_str().is_empty() {
            bail!("Environment '{}' has an empty compose_file", env);
        }
        if ec.env_file.as_os_str().is_empty() {
            bail!("Environment '{}' has an empty env_file", env);
        }
    }

    // Health reports key on the service name, so duplicates would collapse
    // into one entry and overwrite each other's probe result.
    let mut seen_services = HashSet::new();
    for check in &config.health_checks {
        if check.service.is_empty() {
            bail!("A health check entry has an empty service name");
        }
        if !seen_services.insert(check.service.as_str()) {
            bail!(
                "Duplicate health check for service '{}'. Service names must be unique",
                check.service
            );
        }
        if !check.url.starts_with("http://") && !check.url.starts_with("https://") {
            bail!(
                "Health check '{}' has invalid url '{}'. Expected http:// or https://",
                check.service,
                check.url
            );
        }
        if check.timeout_seconds == 0 {
            bail!(
                "Health check '{}' has timeout_seconds = 0. Probes need a positive timeout",
                check.service
            );
        }
    }

    if config.deploy.required_tools.iter().any(|t| t.is_empty()) {
        bail!("deploy.required_tools contains an empty tool name");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::config::DeckhandConfig;

    fn parse(s: &str) -> anyhow::Result<DeckhandConfig> {
        let config: DeckhandConfig = toml::from_str(s)?;
        super::validate(&config)?;
        Ok(config)
    }

    #[test]
    fn rejects_missing_environments() {
        let err = parse("[app]\nname = \"lexapi\"").unwrap_err();
        assert!(err.to_string().contains("No environments"));
    }

    #[test]
    fn rejects_duplicate_health_check_services() {
        let err = parse(
            r#"
            [app]
            name = "lexapi"

            [environments.staging]
            compose_file = "docker-compose.yml"
            env_file = ".env.staging"

            [[health_checks]]
            service = "main-api"
            url = "http://localhost:8000/health/ready"

            [[health_checks]]
            service = "main-api"
            url = "http://localhost:8001/health"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Duplicate health check"));
    }

    #[test]
    fn rejects_non_http_health_url() {
        let err = parse(
            r#"
            [app]
            name = "lexapi"

            [environments.staging]
            compose_file = "docker-compose.yml"
            env_file = ".env.staging"

            [[health_checks]]
            service = "main-api"
            url = "ftp://localhost/health"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid url"));
    }
}
