use anyhow::{Context, Result};

use deckwright_core::config::{AppConfig, LoadOptions};

pub fn run() -> Result<String> {
    let config = AppConfig::load(LoadOptions::default()).context("loading configuration")?;

    let lines = vec![
        "effective config (source precedence: env > file > default):".to_string(),
        format!("pipeline.min_sections = {}", config.pipeline.min_sections),
        format!("pipeline.max_sections = {}", config.pipeline.max_sections),
        format!("pipeline.default_sections = {}", config.pipeline.default_sections),
        format!("pipeline.session_prefix = {}", config.pipeline.session_prefix),
        format!("pipeline.preview_chars = {}", config.pipeline.preview_chars),
        format!(
            "generator.base_url = {}",
            config.generator.base_url.as_deref().unwrap_or("[unset]")
        ),
        format!(
            "generator.api_key = {}",
            if config.generator.api_key.is_some() { "[redacted]" } else { "[unset]" }
        ),
        format!("generator.model = {}", config.generator.model),
        format!("generator.timeout_secs = {}", config.generator.timeout_secs),
        format!("generator.max_retries = {}", config.generator.max_retries),
        format!("logging.level = {}", config.logging.level),
        format!("logging.format = {:?}", config.logging.format),
    ];

    Ok(lines.join("\n"))
}
