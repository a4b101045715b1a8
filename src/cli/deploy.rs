use anyhow::Result;
use std::path::PathBuf;

use deckhand::compose::ComposeStack;
use deckhand::config::{DeckhandConfig, Environment};
use deckhand::health::{HealthVerifier, HttpProbe};
use deckhand::pipeline::{DeployContext, DeploymentOutcome, Pipeline};

pub async fn run(
    config: DeckhandConfig,
    environment: Environment,
    project_root: PathBuf,
) -> Result<DeploymentOutcome> {
    let env = config.environment(environment)?.clone();

    let ctx = DeployContext::new(config, environment, env, project_root);
    let runtime = ComposeStack::new(ctx.compose_file(), ctx.env_file());
    let verifier = HealthVerifier::new(HttpProbe::new());

    let pipeline = Pipeline::new(&ctx, &runtime, verifier);
    Ok(pipeline.run().await)
}
