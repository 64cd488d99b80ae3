use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use deckwright_core::config::GeneratorConfig;

use crate::collaborator::{
    CollaboratorReply, ContentGenerator, GeneratorContext, GeneratorError, GeneratorResponse,
    GeneratorRole,
};

/// HTTP client for a remote content-generation service. One POST per stage
/// call; retries are sequential with no backoff fan-out, matching the
/// pipeline's one-call-at-a-time suspension model.
pub struct HttpGenerator {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<SecretString>,
    model: String,
    timeout_secs: u64,
    max_retries: u32,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    role: GeneratorRole,
    model: &'a str,
    input: &'a str,
    context: &'a GeneratorContext,
}

impl HttpGenerator {
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, GeneratorError> {
        let base_url = config
            .base_url
            .as_deref()
            .ok_or_else(|| {
                GeneratorError::Transport("generator.base_url is not configured".to_string())
            })?
            .trim_end_matches('/')
            .to_string();

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| GeneratorError::Transport(error.to_string()))?;

        Ok(Self {
            http,
            endpoint: format!("{base_url}/v1/generate"),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
            max_retries: config.max_retries,
        })
    }

    async fn call_once(
        &self,
        role: GeneratorRole,
        input: &str,
        context: &GeneratorContext,
    ) -> Result<CollaboratorReply, GeneratorError> {
        let mut request = self.http.post(&self.endpoint).json(&GenerateRequest {
            role,
            model: &self.model,
            input,
            context,
        });
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        let response = request.send().await.map_err(|error| {
            if error.is_timeout() {
                GeneratorError::Timeout(self.timeout_secs)
            } else {
                GeneratorError::Transport(error.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeneratorError::Status { status: status.as_u16() });
        }

        let body: GeneratorResponse = response
            .json()
            .await
            .map_err(|error| GeneratorError::Malformed(error.to_string()))?;
        Ok(body.normalize())
    }
}

#[async_trait]
impl ContentGenerator for HttpGenerator {
    async fn generate(
        &self,
        role: GeneratorRole,
        input: &str,
        context: &GeneratorContext,
    ) -> Result<CollaboratorReply, GeneratorError> {
        let mut last_error = None;
        for attempt in 0..=self.max_retries {
            match self.call_once(role, input, context).await {
                Ok(reply) => return Ok(reply),
                Err(error) => {
                    tracing::warn!(
                        event_name = "generator.attempt_failed",
                        stage = role.stage_name(),
                        attempt,
                        error = %error,
                        "content generation attempt failed"
                    );
                    last_error = Some(error);
                }
            }
        }
        Err(last_error
            .unwrap_or_else(|| GeneratorError::Transport("no attempts were made".to_string())))
    }
}

#[cfg(test)]
mod tests {
    use deckwright_core::config::GeneratorConfig;

    use super::HttpGenerator;

    fn config(base_url: Option<&str>) -> GeneratorConfig {
        GeneratorConfig {
            base_url: base_url.map(str::to_string),
            api_key: None,
            model: "business-writer-1".to_string(),
            timeout_secs: 5,
            max_retries: 1,
        }
    }

    #[test]
    fn missing_base_url_is_rejected_at_construction() {
        assert!(HttpGenerator::from_config(&config(None)).is_err());
    }

    #[test]
    fn endpoint_is_normalized_without_trailing_slash() {
        let client =
            HttpGenerator::from_config(&config(Some("http://localhost:9000/"))).expect("client");
        assert_eq!(client.endpoint, "http://localhost:9000/v1/generate");
    }
}
