use std::env;
use std::fs;
use std::path::PathBuf;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::plan::SectionBounds;

const ENV_CONFIG_PATH: &str = "DECKWRIGHT_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "deckwright.toml";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub generator: GeneratorConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub min_sections: usize,
    pub max_sections: usize,
    pub default_sections: usize,
    pub session_prefix: String,
    pub preview_chars: usize,
}

impl PipelineConfig {
    pub fn bounds(&self) -> SectionBounds {
        SectionBounds { min: self.min_sections, max: self.max_sections }
    }
}

#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub base_url: Option<String>,
    pub api_key: Option<SecretString>,
    pub model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub generator_base_url: Option<String>,
    pub generator_model: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    pipeline: FilePipeline,
    #[serde(default)]
    generator: FileGenerator,
    #[serde(default)]
    logging: FileLogging,
}

#[derive(Debug, Default, Deserialize)]
struct FilePipeline {
    min_sections: Option<usize>,
    max_sections: Option<usize>,
    default_sections: Option<usize>,
    session_prefix: Option<String>,
    preview_chars: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct FileGenerator {
    base_url: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
    max_retries: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct FileLogging {
    level: Option<String>,
    format: Option<LogFormat>,
}

impl AppConfig {
    /// Effective precedence: explicit overrides > environment > config file
    /// > built-in defaults. A missing file is only an error when
    /// `require_file` is set.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let path = options
            .config_path
            .or_else(|| env::var(ENV_CONFIG_PATH).ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let file = match fs::read_to_string(&path) {
            Ok(raw) => toml::from_str::<FileConfig>(&raw)
                .map_err(|source| ConfigError::ParseFile { path: path.clone(), source })?,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                if options.require_file {
                    return Err(ConfigError::MissingConfigFile(path));
                }
                FileConfig::default()
            }
            Err(source) => return Err(ConfigError::ReadFile { path, source }),
        };

        let pipeline = PipelineConfig {
            min_sections: env_or("DECKWRIGHT_PIPELINE_MIN_SECTIONS", file.pipeline.min_sections, 5)?,
            max_sections: env_or(
                "DECKWRIGHT_PIPELINE_MAX_SECTIONS",
                file.pipeline.max_sections,
                15,
            )?,
            default_sections: env_or(
                "DECKWRIGHT_PIPELINE_DEFAULT_SECTIONS",
                file.pipeline.default_sections,
                12,
            )?,
            session_prefix: env::var("DECKWRIGHT_PIPELINE_SESSION_PREFIX")
                .ok()
                .or(file.pipeline.session_prefix)
                .unwrap_or_else(|| "DOC".to_string()),
            preview_chars: env_or(
                "DECKWRIGHT_PIPELINE_PREVIEW_CHARS",
                file.pipeline.preview_chars,
                800,
            )?,
        };

        let generator = GeneratorConfig {
            base_url: options
                .overrides
                .generator_base_url
                .or_else(|| env::var("DECKWRIGHT_GENERATOR_BASE_URL").ok())
                .or(file.generator.base_url),
            api_key: env::var("DECKWRIGHT_GENERATOR_API_KEY")
                .ok()
                .or(file.generator.api_key)
                .map(SecretString::from),
            model: options
                .overrides
                .generator_model
                .or_else(|| env::var("DECKWRIGHT_GENERATOR_MODEL").ok())
                .or(file.generator.model)
                .unwrap_or_else(|| "business-writer-1".to_string()),
            timeout_secs: env_or(
                "DECKWRIGHT_GENERATOR_TIMEOUT_SECS",
                file.generator.timeout_secs,
                30,
            )?,
            max_retries: env_or("DECKWRIGHT_GENERATOR_MAX_RETRIES", file.generator.max_retries, 2)?,
        };

        let logging = LoggingConfig {
            level: options
                .overrides
                .log_level
                .or_else(|| env::var("DECKWRIGHT_LOG_LEVEL").ok())
                .or(file.logging.level)
                .unwrap_or_else(|| "info".to_string()),
            format: match env::var("DECKWRIGHT_LOG_FORMAT") {
                Ok(raw) => parse_log_format(&raw)?,
                Err(_) => file.logging.format.unwrap_or(LogFormat::Compact),
            },
        };

        let config = Self { pipeline, generator, logging };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.pipeline.min_sections == 0 {
            return Err(ConfigError::Validation(
                "pipeline.min_sections must be at least 1".to_string(),
            ));
        }
        if self.pipeline.min_sections > self.pipeline.max_sections {
            return Err(ConfigError::Validation(format!(
                "pipeline.min_sections ({}) exceeds pipeline.max_sections ({})",
                self.pipeline.min_sections, self.pipeline.max_sections
            )));
        }
        if self.pipeline.default_sections < self.pipeline.min_sections
            || self.pipeline.default_sections > self.pipeline.max_sections
        {
            return Err(ConfigError::Validation(format!(
                "pipeline.default_sections ({}) outside [{}, {}]",
                self.pipeline.default_sections,
                self.pipeline.min_sections,
                self.pipeline.max_sections
            )));
        }
        if self.pipeline.preview_chars == 0 {
            return Err(ConfigError::Validation(
                "pipeline.preview_chars must be at least 1".to_string(),
            ));
        }
        if self.generator.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "generator.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_or<T>(key: &str, file_value: Option<T>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidEnvOverride { key: key.to_string(), value: raw }),
        Err(_) => Ok(file_value.unwrap_or(default)),
    }
}

fn parse_log_format(raw: &str) -> Result<LogFormat, ConfigError> {
    match raw.to_lowercase().as_str() {
        "compact" => Ok(LogFormat::Compact),
        "pretty" => Ok(LogFormat::Pretty),
        "json" => Ok(LogFormat::Json),
        _ => Err(ConfigError::InvalidEnvOverride {
            key: "DECKWRIGHT_LOG_FORMAT".to_string(),
            value: raw.to_string(),
        }),
    }
}
