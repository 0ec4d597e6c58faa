//! OpenAI-compatible completion client.
//!
//! Posts to `{base_url}/chat/completions` with bearer authentication taken
//! from the credential passed on each call. Failure variants come from the
//! HTTP status: 401 is an authentication failure, 429 a rate limit (with
//! `retry-after` honoured when present), anything else a provider error.

pub mod config;
pub mod types;

use secrecy::ExposeSecret;

use antigravity_core::credential::pool::Credential;
use antigravity_core::llm::provider::LlmProvider;
use antigravity_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};

use self::config::OpenAiCompatConfig;
use self::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

/// Provider for any endpoint speaking the OpenAI chat completions protocol.
///
/// Holds no secret itself; the bearer token is exposed only while building
/// each request.
pub struct OpenAiCompatibleProvider {
    client: reqwest::Client,
    provider_name: String,
    base_url: String,
    timeout_ms: u64,
}

impl OpenAiCompatibleProvider {
    pub fn new(config: OpenAiCompatConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Provider {
                status: None,
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            provider_name: config.provider_name,
            base_url: config.base_url,
            timeout_ms: u64::try_from(config.timeout.as_millis()).unwrap_or(u64::MAX),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    async fn complete(
        &self,
        credential: &Credential,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        let body = ChatCompletionRequest {
            model: &request.model,
            messages: request
                .messages
                .iter()
                .map(|m| ChatMessage {
                    role: m.role.to_string(),
                    content: &m.content,
                })
                .collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        tracing::debug!(
            provider = %self.provider_name,
            credential = credential.index(),
            model = %request.model,
            "sending completion request"
        );

        let response = self
            .client
            .post(self.url())
            .bearer_auth(credential.secret().expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout {
                        after_ms: self.timeout_ms,
                    }
                } else {
                    LlmError::Provider {
                        status: None,
                        message: format!("HTTP request failed: {e}"),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after_ms = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(|secs| secs.saturating_mul(1000));
            let error_body = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status(status.as_u16(), error_body, retry_after_ms));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Deserialization("response contained no choices".to_string()))?;

        Ok(CompletionResponse {
            content: choice.message.content.unwrap_or_default(),
            model: parsed.model.unwrap_or_else(|| request.model.clone()),
            usage: parsed.usage.map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::Json;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::{IntoResponse, Response};
    use axum::routing::post;
    use secrecy::SecretString;
    use serde_json::json;

    use antigravity_core::credential::pool::CredentialPool;
    use antigravity_types::llm::{FailureKind, GenerationSettings, Message};

    use super::*;

    async fn fake_endpoint(headers: HeaderMap, Json(body): Json<serde_json::Value>) -> Response {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        match auth.as_str() {
            "Bearer bad" => (StatusCode::UNAUTHORIZED, "invalid key").into_response(),
            "Bearer busy" => (
                StatusCode::TOO_MANY_REQUESTS,
                [("retry-after", "2")],
                "slow down",
            )
                .into_response(),
            "Bearer flood" => (
                StatusCode::TOO_MANY_REQUESTS,
                [("retry-after", "18446744073709551615")],
                "slow down",
            )
                .into_response(),
            "Bearer boom" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
            "Bearer empty" => Json(json!({ "choices": [] })).into_response(),
            "Bearer sleepy" => {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({ "choices": [] })).into_response()
            }
            _ => {
                let model = body["model"].clone();
                let content = format!(
                    "temp={} max={} roles={}",
                    body["temperature"],
                    body["max_tokens"],
                    body["messages"].as_array().map(|m| m.len()).unwrap_or(0),
                );
                Json(json!({
                    "model": model,
                    "choices": [{ "message": { "role": "assistant", "content": content } }],
                    "usage": { "prompt_tokens": 12, "completion_tokens": 3 }
                }))
                .into_response()
            }
        }
    }

    async fn spawn_endpoint() -> String {
        let app = axum::Router::new().route("/v1/chat/completions", post(fake_endpoint));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v1")
    }

    fn provider(base_url: String, timeout: Duration) -> OpenAiCompatibleProvider {
        OpenAiCompatibleProvider::new(OpenAiCompatConfig {
            provider_name: "test".into(),
            base_url,
            timeout,
        })
        .unwrap()
    }

    fn credential(key: &str) -> Arc<Credential> {
        CredentialPool::new(vec![SecretString::from(key.to_string())])
            .current()
            .unwrap()
    }

    fn request() -> CompletionRequest {
        let settings = GenerationSettings::default();
        CompletionRequest {
            model: settings.model,
            messages: vec![Message::system("persona"), Message::user("hi")],
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        }
    }

    #[tokio::test]
    async fn successful_completion() {
        let provider = provider(spawn_endpoint().await, Duration::from_secs(5));
        let response = provider.complete(&credential("good"), &request()).await.unwrap();

        assert_eq!(response.content, "temp=0.9 max=800 roles=2");
        assert_eq!(response.model, "qwen-3-32b");
        assert_eq!(response.usage.unwrap().input_tokens, 12);
    }

    #[tokio::test]
    async fn status_codes_classify_failures() {
        let provider = provider(spawn_endpoint().await, Duration::from_secs(5));

        let err = provider.complete(&credential("bad"), &request()).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Authentication);

        let err = provider.complete(&credential("busy"), &request()).await.unwrap_err();
        assert!(matches!(err, LlmError::RateLimited { retry_after_ms: Some(2000) }));

        let err = provider.complete(&credential("boom"), &request()).await.unwrap_err();
        assert!(matches!(err, LlmError::Provider { status: Some(500), .. }));
        assert_eq!(err.kind(), FailureKind::Other);
    }

    #[tokio::test]
    async fn huge_retry_after_saturates() {
        let provider = provider(spawn_endpoint().await, Duration::from_secs(5));
        let err = provider.complete(&credential("flood"), &request()).await.unwrap_err();
        assert!(matches!(err, LlmError::RateLimited { retry_after_ms: Some(u64::MAX) }));
    }

    #[tokio::test]
    async fn empty_choices_is_a_deserialization_error() {
        let provider = provider(spawn_endpoint().await, Duration::from_secs(5));
        let err = provider.complete(&credential("empty"), &request()).await.unwrap_err();
        assert!(matches!(err, LlmError::Deserialization(_)));
    }

    #[tokio::test]
    async fn transport_timeout_is_timeout_kind() {
        let provider = provider(spawn_endpoint().await, Duration::from_millis(100));
        let err = provider.complete(&credential("sleepy"), &request()).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Timeout);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_provider_error() {
        let provider = provider("http://127.0.0.1:9/v1".into(), Duration::from_secs(2));
        let err = provider.complete(&credential("good"), &request()).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Other);
    }
}
