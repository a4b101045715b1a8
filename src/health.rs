use async_trait::async_trait;
use chrono::{DateTime, Local};
use futures::future::join_all;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

use crate::config::HealthCheckConfig;

/// One HTTP probe target. Static configuration, never persisted.
#[derive(Debug, Clone)]
pub struct ServiceHealthCheck {
    pub service: String,
    pub url: String,
    pub timeout: Duration,
    /// Exact status to require; any 2xx passes when unset.
    pub expect_status: Option<u16>,
}

impl From<&HealthCheckConfig> for ServiceHealthCheck {
    fn from(config: &HealthCheckConfig) -> Self {
        Self {
            service: config.service.clone(),
            url: config.url.clone(),
            timeout: config.timeout(),
            expect_status: config.expect_status,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HealthEntry {
    pub healthy: bool,
    pub checked_at: DateTime<Local>,
}

/// Per-service results for one verification pass. The overall verdict is
/// the AND over all entries; there is no partial-success state.
#[derive(Debug, Default)]
pub struct HealthReport {
    entries: BTreeMap<String, HealthEntry>,
}

impl HealthReport {
    pub fn record(&mut self, service: &str, healthy: bool) {
        self.entries.insert(
            service.to_string(),
            HealthEntry {
                healthy,
                checked_at: Local::now(),
            },
        );
    }

    pub fn all_healthy(&self) -> bool {
        self.entries.values().all(|e| e.healthy)
    }

    /// Every failing service, so the outcome can name them all rather than
    /// just the first.
    pub fn unhealthy_services(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, e)| !e.healthy)
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn entries(&self) -> &BTreeMap<String, HealthEntry> {
        &self.entries
    }
}

/// Issues a single probe against one endpoint.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn probe(&self, check: &ServiceHealthCheck) -> bool;
}

/// Probe over plain HTTP GET with a per-check timeout. A non-matching
/// status, connection failure, or timeout all count as unhealthy.
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HealthProbe for HttpProbe {
    async fn probe(&self, check: &ServiceHealthCheck) -> bool {
        let response = self
            .client
            .get(&check.url)
            .timeout(check.timeout)
            .send()
            .await;

        match response {
            Ok(resp) => match check.expect_status {
                Some(expected) => resp.status().as_u16() == expected,
                None => resp.status().is_success(),
            },
            Err(e) => {
                debug!("Probe of {} failed: {}", check.url, e);
                false
            }
        }
    }
}

/// Probe attempts are capped at 3 with linear backoff. More would mask a
/// flaky endpoint behind retries and silently stretch deploy latency.
const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_STEP: Duration = Duration::from_secs(2);

pub struct HealthVerifier<P: HealthProbe> {
    probe: P,
    backoff_step: Duration,
}

impl<P: HealthProbe> HealthVerifier<P> {
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            backoff_step: BACKOFF_STEP,
        }
    }

    /// Override the backoff step, mainly so tests do not wait out real
    /// backoff sleeps. The attempt cap is not configurable.
    pub fn with_backoff_step(probe: P, backoff_step: Duration) -> Self {
        Self {
            probe,
            backoff_step,
        }
    }

    /// Probe every check and build the full report. Probes run
    /// concurrently (each writes only its own entry); verification
    /// continues past individual failures so the report enumerates every
    /// unhealthy service.
    pub async fn verify(&self, checks: &[ServiceHealthCheck]) -> HealthReport {
        let results = join_all(checks.iter().map(|check| self.probe_with_retries(check))).await;

        let mut report = HealthReport::default();
        for (check, healthy) in checks.iter().zip(results) {
            report.record(&check.service, healthy);
        }
        report
    }

    async fn probe_with_retries(&self, check: &ServiceHealthCheck) -> bool {
        for attempt in 1..=MAX_ATTEMPTS {
            if self.probe.probe(check).await {
                debug!(
                    "{} healthy (attempt {}/{})",
                    check.service, attempt, MAX_ATTEMPTS
                );
                return true;
            }

            if attempt < MAX_ATTEMPTS {
                tokio::time::sleep(self.backoff_step * attempt).await;
            }
        }

        false
    }
}
