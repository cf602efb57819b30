//! Completion-API client used for coach remarks and chat.
//!
//! The server only needs "send a system and a user message, get text back",
//! so the external API sits behind the [`Advisor`] trait and handlers never
//! see HTTP details. [`OpenRouterAdvisor`] speaks the OpenAI-compatible
//! chat-completions format.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One prompt for the completion API.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Persona / instructions.
    pub system: String,
    /// The actual question.
    pub user: String,
    /// Upper bound on reply length.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

/// Completion failures.
#[derive(Debug, Error)]
pub enum AdvisorError {
    /// Transport failure, timeout, or a body that did not decode.
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("completion API returned {status}: {body}")]
    Status {
        /// HTTP status.
        status: reqwest::StatusCode,
        /// Response body, for the log.
        body: String,
    },
}

/// Something that can complete a prompt.
#[async_trait]
pub trait Advisor: Send + Sync {
    /// Return the trimmed reply text. An empty string means the API had
    /// nothing to say.
    async fn complete(&self, request: CompletionRequest) -> Result<String, AdvisorError>;
}

/// Connection settings for [`OpenRouterAdvisor`].
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisorSettings {
    /// Chat-completions URL.
    pub endpoint: String,
    /// Model name sent with every request.
    pub model: String,
    /// Bearer token.
    pub api_key: String,
    /// Whole-request timeout.
    pub timeout: Duration,
}

/// Client for OpenRouter (or any OpenAI-compatible endpoint).
#[derive(Debug, Clone)]
pub struct OpenRouterAdvisor {
    client: reqwest::Client,
    settings: AdvisorSettings,
}

impl OpenRouterAdvisor {
    /// Build a client with the configured timeout.
    pub fn new(settings: AdvisorSettings) -> Result<Self, AdvisorError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;
        Ok(Self { client, settings })
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

impl<'a> ChatCompletionBody<'a> {
    fn new(model: &'a str, request: &'a CompletionRequest) -> Self {
        Self {
            model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ReplyMessage>,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletion {
    fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Advisor for OpenRouterAdvisor {
    async fn complete(&self, request: CompletionRequest) -> Result<String, AdvisorError> {
        let body = ChatCompletionBody::new(&self.settings.model, &request);
        let response = self
            .client
            .post(&self.settings.endpoint)
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<response body unavailable>".to_string());
            return Err(AdvisorError::Status { status, body });
        }

        let completion: ChatCompletion = response.json().await?;
        let text = completion.into_text();
        tracing::debug!(model = %self.settings.model, chars = text.len(), "Completion received");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> CompletionRequest {
        CompletionRequest {
            system: "be brief".into(),
            user: "hello".into(),
            max_tokens: 80,
            temperature: 0.8,
        }
    }

    #[test]
    fn test_request_body_is_openai_shaped() {
        let req = request();
        let body = serde_json::to_value(ChatCompletionBody::new("gpt-4o-mini", &req)).unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["max_tokens"], 80);
        assert_eq!(body["messages"][0], json!({"role": "system", "content": "be brief"}));
        assert_eq!(body["messages"][1], json!({"role": "user", "content": "hello"}));
    }

    #[test]
    fn test_reply_text_is_trimmed() {
        let completion: ChatCompletion = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": "  Park the bus.\n"}}]
        }))
        .unwrap();
        assert_eq!(completion.into_text(), "Park the bus.");
    }

    #[test]
    fn test_missing_choices_mean_empty_reply() {
        let completion: ChatCompletion = serde_json::from_value(json!({"id": "x"})).unwrap();
        assert_eq!(completion.into_text(), "");
        let completion: ChatCompletion =
            serde_json::from_value(json!({"choices": [{"message": {"content": null}}]})).unwrap();
        assert_eq!(completion.into_text(), "");
    }

    // -------------------------------------------------------------------------
    // Against a local HTTP stub
    // -------------------------------------------------------------------------

    const STUB_PATH: &str = "/v1/chat/completions";

    async fn serve_stub(router: axum::Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}{STUB_PATH}")
    }

    fn advisor_at(endpoint: String) -> OpenRouterAdvisor {
        OpenRouterAdvisor::new(AdvisorSettings {
            endpoint,
            model: "test-model".into(),
            api_key: "sk-test".into(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_reply_carries_bearer_and_model() {
        let router = axum::Router::new().route(
            STUB_PATH,
            axum::routing::post(
                |headers: axum::http::HeaderMap, axum::Json(body): axum::Json<serde_json::Value>| async move {
                    let auth = headers
                        .get(axum::http::header::AUTHORIZATION)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    let model = body["model"].as_str().unwrap_or_default().to_string();
                    axum::Json(json!({
                        "choices": [{"message": {"content": format!("  {auth} {model}\n")}}]
                    }))
                },
            ),
        );
        let advisor = advisor_at(serve_stub(router).await);

        let text = advisor.complete(request()).await.unwrap();
        assert_eq!(text, "Bearer sk-test test-model");
    }

    #[tokio::test]
    async fn test_error_status_is_reported_with_body() {
        let router = axum::Router::new().route(
            STUB_PATH,
            axum::routing::post(|| async {
                (axum::http::StatusCode::BAD_GATEWAY, "upstream down")
            }),
        );
        let advisor = advisor_at(serve_stub(router).await);

        match advisor.complete(request()).await {
            Err(AdvisorError::Status { status, body }) => {
                assert_eq!(status, reqwest::StatusCode::BAD_GATEWAY);
                assert_eq!(body, "upstream down");
            }
            other => panic!("expected a status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_undecodable_body_is_a_request_error() {
        let router = axum::Router::new()
            .route(STUB_PATH, axum::routing::post(|| async { "definitely not json" }));
        let advisor = advisor_at(serve_stub(router).await);

        let err = advisor.complete(request()).await.unwrap_err();
        assert!(matches!(err, AdvisorError::Request(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_a_request_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let advisor = advisor_at(format!("http://{addr}{STUB_PATH}"));

        let err = advisor.complete(request()).await.unwrap_err();
        assert!(matches!(err, AdvisorError::Request(_)), "got {err:?}");
    }
}
