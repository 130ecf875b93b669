//! Gemini ranking oracle.
//!
//! Sends the ranking prompt and candidate payload to the Gemini
//! `generateContent` endpoint in JSON response mode and returns the reply
//! text untouched. Requests are throttled with a token bucket and transient
//! failures are retried with exponential backoff.

use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::domain::models::OracleConfig;
use crate::domain::ports::{OracleError, RankingOracle, RankingRequest};

const MAX_BACKOFF_MS: u64 = 5_000;

/// HTTP client for the Gemini API.
pub struct GeminiOracle {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout_secs: u64,
    max_retries: u32,
    initial_backoff: Duration,
    limiter: DefaultDirectRateLimiter,
}

impl GeminiOracle {
    pub fn new(config: &OracleConfig, api_key: String) -> Result<Self, OracleError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| OracleError::Unavailable(format!("failed to build HTTP client: {e}")))?;

        let rps = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);

        Ok(Self {
            http_client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms.max(1)),
            limiter: RateLimiter::direct(Quota::per_second(rps)),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    async fn send_once(&self, body: &GenerateContentRequest) -> Result<String, OracleError> {
        self.limiter.until_ready().await;

        let response = self
            .http_client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OracleError::Timeout(self.timeout_secs)
                } else {
                    OracleError::Unavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(OracleError::RateLimited);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error response".to_string());
            return Err(OracleError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| OracleError::Unavailable(format!("failed to read Gemini response: {e}")))?;
        let parsed: GenerateContentResponse = serde_json::from_slice(&bytes)
            .map_err(|e| OracleError::MalformedResponse(format!("malformed Gemini envelope: {e}")))?;

        let text = parsed.text();
        if text.trim().is_empty() {
            return Err(OracleError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl RankingOracle for GeminiOracle {
    fn name(&self) -> &'static str {
        "gemini"
    }

    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn rank(&self, request: &RankingRequest) -> Result<String, OracleError> {
        let body = GenerateContentRequest::new(request);

        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_backoff)
            .with_max_interval(Duration::from_millis(MAX_BACKOFF_MS))
            .with_max_elapsed_time(None)
            .build();

        let max_retries = self.max_retries;
        let mut attempt: u32 = 0;

        backoff::future::retry(policy, || {
            attempt += 1;
            let current = attempt;
            let body = &body;
            async move {
                match self.send_once(body).await {
                    Ok(text) => {
                        debug!(attempt = current, bytes = text.len(), "oracle replied");
                        Ok(text)
                    }
                    Err(e) if e.is_transient() && current <= max_retries => {
                        warn!(attempt = current, error = %e, "transient oracle failure, retrying");
                        Err(backoff::Error::transient(e))
                    }
                    Err(e) => Err(backoff::Error::permanent(e)),
                }
            }
        })
        .await
    }
}

/// Oracle used when no provider is configured. Every call fails, which
/// routes suggestions to the fallback selector.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledOracle;

#[async_trait]
impl RankingOracle for DisabledOracle {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn rank(&self, _request: &RankingRequest) -> Result<String, OracleError> {
        Err(OracleError::Unavailable("ranking oracle is disabled".to_string()))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    fn new(request: &RankingRequest) -> Self {
        let text = format!("{}\n\nINPUT:\n{}", request.prompt, request.payload);
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part { text: Some(text) }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize, Default)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .map(|c| c.content.parts.iter().filter_map(|p| p.text.as_deref()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let request = RankingRequest {
            prompt: "pick".to_string(),
            payload: serde_json::json!({"budget": 10}),
        };
        let body = serde_json::to_value(GenerateContentRequest::new(&request)).unwrap();
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        let text = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("pick"));
        assert!(text.contains("\"budget\":10"));
    }

    #[test]
    fn test_response_text_joins_parts() {
        let parsed: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"selection\":"},{"text":"[]}"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.text(), r#"{"selection":[]}"#);
    }

    #[test]
    fn test_response_without_candidates() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.text(), "");
    }

    #[tokio::test]
    async fn test_disabled_oracle_fails() {
        let request = RankingRequest {
            prompt: String::new(),
            payload: serde_json::Value::Null,
        };
        assert!(matches!(
            DisabledOracle.rank(&request).await,
            Err(OracleError::Unavailable(_))
        ));
    }
}
