use std::sync::Arc;

use anyhow::{Context, Result};

use postcraft::{
    ai_gateway::{
        credentials::EnvCredentialProvider,
        gateway::AIGateway,
        telemetry::{
            NoopTelemetrySink, TelemetrySink, TracingTelemetrySink, ai_gateway_debug_enabled,
        },
    },
    cli::config_path_from_args,
    clipboard::SystemClipboard,
    config::Config,
    logging::init_tracing,
    post::{AIGatewayCaptionGenerator, AIGatewaySentimentClassifier, PostGenerator},
    server::{self, ServiceContext},
};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = config_path_from_args()?;
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;
    let logging_guard = init_tracing(&config.logging)?;

    let gateway_debug_enabled = ai_gateway_debug_enabled();
    let gateway_telemetry: Arc<dyn TelemetrySink> = if gateway_debug_enabled {
        Arc::new(TracingTelemetrySink)
    } else {
        Arc::new(NoopTelemetrySink)
    };
    if gateway_debug_enabled {
        eprintln!(
            "[ai_gateway] verbose debug logging enabled (set POSTCRAFT_DEBUG_AI_GATEWAY=0/false to disable)"
        );
    }

    let gateway = Arc::new(
        AIGateway::new(
            config.ai_gateway.clone(),
            Arc::new(EnvCredentialProvider),
            gateway_telemetry,
        )
        .context("failed to construct ai gateway")?,
    );

    let generation = &config.post.generation;
    let caption_port = Arc::new(AIGatewayCaptionGenerator::new(
        Arc::clone(&gateway),
        generation.route.clone(),
        generation.instructions.clone(),
    ));
    let classifier_port = Arc::new(AIGatewaySentimentClassifier::new(
        Arc::clone(&gateway),
        config.post.classification.route.clone(),
    ));
    let generator = Arc::new(PostGenerator::new(
        caption_port,
        classifier_port,
        generation.options.clone(),
    ));

    tracing::info!(
        target: "server",
        run_id = logging_guard.run_id(),
        config_path = %config_path.display(),
        "postcraft_starting"
    );

    server::run(
        &config.server,
        ServiceContext {
            generator,
            clipboard: Arc::new(SystemClipboard::default()),
        },
    )
    .await
}
