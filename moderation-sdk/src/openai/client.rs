use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;

use crate::{
    client::ModerationClient,
    error::ModerationError,
    openai::types::{
        OpenAIErrorResponse, OpenAIModerationRequest, OpenAIModerationResponse,
        DEFAULT_MODERATION_MODEL,
    },
    types::ModerationVerdict,
};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// OpenAI moderation client
pub struct OpenAIModerationClient {
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
    http_client: reqwest::Client,
}

impl OpenAIModerationClient {
    /// Create a new OpenAI moderation client with the given API key
    pub fn new(api_key: impl Into<String>) -> Result<Self, ModerationError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(ModerationError::authentication("API key cannot be empty"));
        }

        let timeout = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            api_key,
            base_url: "https://api.openai.com".to_string(),
            model: DEFAULT_MODERATION_MODEL.to_string(),
            timeout,
            http_client: build_http_client(timeout)?,
        })
    }

    /// Set a custom base URL for the API
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use a different moderation model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Replace the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ModerationError> {
        self.http_client = build_http_client(timeout)?;
        self.timeout = timeout;
        Ok(self)
    }

    /// Call `POST /v1/moderations` with a single input
    pub async fn create_moderation(
        &self,
        request: OpenAIModerationRequest,
    ) -> Result<OpenAIModerationResponse, ModerationError> {
        let url = format!("{}/v1/moderations", self.base_url);

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|_| ModerationError::authentication("Invalid API key format"))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = self
            .http_client
            .post(&url)
            .headers(headers)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.network_error(e))?;

        let status = response.status();

        if status.is_success() {
            let body = response.text().await.map_err(|e| self.network_error(e))?;
            let moderation: OpenAIModerationResponse = serde_json::from_str(&body)?;
            return Ok(moderation);
        }

        // Extract retry-after header before consuming the response
        let retry_after = if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            response
                .headers()
                .get("retry-after")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
        } else {
            None
        };

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let message = serde_json::from_str::<OpenAIErrorResponse>(&error_text)
            .map(|e| e.error.message)
            .unwrap_or(error_text);

        Err(match status {
            reqwest::StatusCode::BAD_REQUEST => ModerationError::invalid_request(message),
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                ModerationError::authentication(message)
            }
            reqwest::StatusCode::PAYLOAD_TOO_LARGE => {
                ModerationError::invalid_request("Request too large")
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => {
                ModerationError::rate_limit(message, retry_after)
            }
            _ => ModerationError::api_error(status.as_u16(), message),
        })
    }

    fn network_error(&self, source: reqwest::Error) -> ModerationError {
        if source.is_timeout() {
            ModerationError::timeout(self.timeout.as_secs())
        } else {
            ModerationError::Network { source }
        }
    }
}

fn build_http_client(timeout: Duration) -> Result<reqwest::Client, ModerationError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ModerationError::Network { source: e })
}

#[async_trait]
impl ModerationClient for OpenAIModerationClient {
    async fn moderate(&self, input: &str) -> Result<ModerationVerdict, ModerationError> {
        let response = self
            .create_moderation(OpenAIModerationRequest {
                model: self.model.clone(),
                input: input.to_string(),
            })
            .await?;

        // No result at all is treated as not flagged
        let verdict = match response.results.first() {
            Some(result) if result.flagged => {
                ModerationVerdict::flagged(result.flagged_categories())
            }
            _ => ModerationVerdict::allowed(),
        };

        tracing::debug!(
            model = %response.model,
            flagged = verdict.flagged,
            "Moderation verdict received"
        );

        Ok(verdict)
    }

    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
