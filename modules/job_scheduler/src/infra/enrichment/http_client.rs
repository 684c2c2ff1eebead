use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use crate::config::EnrichmentConfig;
use crate::contract::model::JobSpecs;
use crate::domain::ports::{EnrichmentError, EnrichmentPort, NotesSummary};
use crate::infra::enrichment::prompts;

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [RequestMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Enrichment adapter over the Anthropic Messages API.
pub struct AnthropicEnrichmentClient {
    client: reqwest::Client,
    endpoint: Url,
    model: String,
    max_tokens: u32,
}

impl AnthropicEnrichmentClient {
    pub fn new(cfg: &EnrichmentConfig, api_key: SecretString) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut key = HeaderValue::from_str(api_key.expose_secret())
            .map_err(|_| anyhow::anyhow!("API key contains invalid header characters"))?;
        key.set_sensitive(true);
        headers.insert("x-api-key", key);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(cfg.timeout_secs.max(1)))
            .build()?;

        let endpoint = Url::parse(&cfg.base_url)?.join("v1/messages")?;

        Ok(Self {
            client,
            endpoint,
            model: cfg.model.clone(),
            max_tokens: cfg.max_tokens,
        })
    }

    /// Send one user message and return the first text block of the reply.
    async fn complete(&self, prompt: &str) -> Result<String, EnrichmentError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: [RequestMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| EnrichmentError::Http(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| EnrichmentError::Http(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(EnrichmentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MessagesResponse = serde_json::from_str(&body).map_err(|e| {
            EnrichmentError::Api {
                status: status.as_u16(),
                message: format!("unexpected response body: {e}"),
            }
        })?;

        parsed
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .find_map(|block| block.text)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(EnrichmentError::EmptyResponse)
    }
}

#[async_trait]
impl EnrichmentPort for AnthropicEnrichmentClient {
    #[instrument(
        name = "job_scheduler.http.enrichment.estimate_duration",
        skip_all,
        fields(endpoint = %self.endpoint, model = %self.model)
    )]
    async fn estimate_duration(&self, specs: &JobSpecs) -> Result<String, EnrichmentError> {
        let estimate = self.complete(&prompts::estimate_prompt(specs)).await?;
        debug!(%estimate, "Received duration estimate");
        Ok(estimate)
    }

    #[instrument(
        name = "job_scheduler.http.enrichment.enhance_notes",
        skip_all,
        fields(endpoint = %self.endpoint, model = %self.model)
    )]
    async fn enhance_notes(
        &self,
        notes: &str,
        summary: &NotesSummary,
    ) -> Result<String, EnrichmentError> {
        self.complete(&prompts::enhance_notes_prompt(notes, summary))
            .await
    }
}
