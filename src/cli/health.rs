use anyhow::Result;

use deckhand::config::{DeckhandConfig, Environment};
use deckhand::health::{HealthVerifier, HttpProbe, ServiceHealthCheck};
use deckhand::output;

/// Standalone health pass against the configured endpoints. Returns the
/// overall verdict without touching the stack.
pub async fn run(config: DeckhandConfig, environment: Environment) -> Result<bool> {
    // Fails early if the environment is not configured.
    config.environment(environment)?;

    output::header(&format!(
        "Health of {} ({})",
        config.app.name, environment
    ));

    let checks: Vec<ServiceHealthCheck> = config
        .health_checks
        .iter()
        .map(ServiceHealthCheck::from)
        .collect();

    if checks.is_empty() {
        output::warning("No health checks configured");
        return Ok(true);
    }

    let verifier = HealthVerifier::new(HttpProbe::new());
    let report = verifier.verify(&checks).await;

    for (service, entry) in report.entries() {
        if entry.healthy {
            output::success(&format!("{} healthy", service));
        } else {
            output::error(&format!("{} unhealthy", service));
        }
    }

    Ok(report.all_healthy())
}
