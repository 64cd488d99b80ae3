use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};

use deckwright_agent::pipeline::{PipelineOrchestrator, PipelineRequest};
use deckwright_agent::render::MarkdownRenderer;
use deckwright_agent::HttpGenerator;
use deckwright_core::config::{AppConfig, LoadOptions, LogFormat};

pub async fn run(request_path: Option<PathBuf>, pretty: bool) -> Result<String> {
    let config = AppConfig::load(LoadOptions::default()).context("loading configuration")?;
    init_logging(&config);

    let raw_request = match request_path {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading request file `{}`", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("reading request from stdin")?;
            buffer
        }
    };
    let request: PipelineRequest =
        serde_json::from_str(&raw_request).context("parsing request JSON")?;

    let generator = HttpGenerator::from_config(&config.generator)
        .context("building the content generation client")?;
    let orchestrator =
        PipelineOrchestrator::new(generator, MarkdownRenderer::new(), config.pipeline.clone());

    let envelope = orchestrator.process(request).await;

    let output = if pretty {
        serde_json::to_string_pretty(&envelope)
    } else {
        serde_json::to_string(&envelope)
    }
    .context("serializing response envelope")?;
    Ok(output)
}

fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    let result = match config.logging.format {
        LogFormat::Compact => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .compact()
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .pretty()
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .json()
            .try_init(),
    };
    // a second init in the same process is harmless
    let _ = result;
}
