//! HTTP client for the generation service, with retry logic.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::time::sleep;
use tracing::{debug, warn};

use super::{GenerationRequest, TextGenerator};
use crate::error::{Error, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Response body of the generation endpoint.
#[derive(Debug, Deserialize)]
struct GenerationResponse {
    text: String,
}

/// Generation client speaking the service's JSON protocol.
///
/// Sends `{"prompt": …, "model": …, …params}` with bearer auth and reads the
/// `text` field of the response. Transient failures (rate limits, timeouts,
/// connection drops) are retried with exponential backoff; everything else
/// fails immediately.
pub struct HttpGenerator {
    client: Client,
    api_url: String,
    api_key: String,
    max_retries: u32,
    retry_delay_ms: u64,
}

impl HttpGenerator {
    /// Create a new client. `api_url` and `api_key` come from configuration;
    /// this type never reads ambient process state.
    pub fn new(
        api_url: String,
        api_key: String,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<Self> {
        if api_url.is_empty() {
            return Err(Error::Config(
                "generation API URL is not set; set ONO_API_URL or the api_url config key"
                    .to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url,
            api_key,
            max_retries,
            retry_delay_ms,
        })
    }

    async fn make_request(&self, request: &GenerationRequest) -> Result<String> {
        let mut body = Map::new();
        body.insert("prompt".to_string(), Value::String(request.prompt.clone()));
        if let Some(model) = &request.model {
            body.insert("model".to_string(), Value::String(model.clone()));
        }
        for (key, value) in &request.params {
            body.insert(key.clone(), value.clone());
        }

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&Value::Object(body))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Generation("request timed out".to_string())
                } else if e.is_connect() {
                    Error::Generation(format!("failed to connect: {e}"))
                } else {
                    Error::Generation(format!("request failed: {e}"))
                }
            })?;

        match response.status() {
            StatusCode::OK => {
                let parsed: GenerationResponse = response
                    .json()
                    .await
                    .map_err(|e| Error::Generation(format!("malformed response body: {e}")))?;
                Ok(parsed.text)
            }
            StatusCode::TOO_MANY_REQUESTS => {
                Err(Error::Generation("rate limit exceeded".to_string()))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::Generation(
                "invalid API credential; check ONO_API_KEY".to_string(),
            )),
            status => {
                let detail = response.text().await.unwrap_or_default();
                Err(Error::Generation(format!("API error {status}: {detail}")))
            }
        }
    }

    fn is_retryable(&self, error: &Error) -> bool {
        match error {
            Error::Generation(msg) => {
                msg.contains("rate limit") || msg.contains("timed out") || msg.contains("connect")
            }
            _ => false,
        }
    }

    fn backoff(&self, retry_count: u32) -> u64 {
        self.retry_delay_ms * 2u64.pow(retry_count - 1)
    }
}

#[async_trait]
impl TextGenerator for HttpGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        let mut retry_count = 0;
        loop {
            match self.make_request(&request).await {
                Ok(text) => {
                    debug!(chars = text.len(), "generation succeeded");
                    return Ok(text);
                }
                Err(e) => {
                    if retry_count >= self.max_retries || !self.is_retryable(&e) {
                        return Err(e);
                    }
                    retry_count += 1;
                    let delay = self.backoff(retry_count);
                    warn!(retry = retry_count, delay_ms = delay, "retrying generation: {e}");
                    sleep(Duration::from_millis(delay)).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_missing_url() {
        let result = HttpGenerator::new(String::new(), "key".to_string(), 3, 100);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_retryable_classification() {
        let client =
            HttpGenerator::new("http://localhost:9".to_string(), String::new(), 3, 100).unwrap();

        assert!(client.is_retryable(&Error::Generation("rate limit exceeded".into())));
        assert!(client.is_retryable(&Error::Generation("request timed out".into())));
        assert!(client.is_retryable(&Error::Generation(
            "failed to connect: error sending request".into()
        )));
        assert!(!client.is_retryable(&Error::Generation("API error 400: bad request".into())));
        assert!(!client.is_retryable(&Error::Config("no url".into())));
    }

    #[test]
    fn test_backoff_is_exponential() {
        let client =
            HttpGenerator::new("http://localhost:9".to_string(), String::new(), 3, 100).unwrap();
        assert_eq!(client.backoff(1), 100);
        assert_eq!(client.backoff(2), 200);
        assert_eq!(client.backoff(3), 400);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_surfaces_generation_error() {
        // Reserved port with nothing listening; connection fails fast.
        let client = HttpGenerator::new(
            "http://127.0.0.1:1/generate".to_string(),
            "key".to_string(),
            0,
            1,
        )
        .unwrap();

        let err = client
            .generate(GenerationRequest::new("hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }
}
