//! DeepSeek-compatible chat-completions client.
//!
//! Streaming mode reads the API's SSE byte stream, keeping a line buffer
//! across network chunks so a `data:` frame split over two reads is still
//! parsed whole.

use std::time::Duration;

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::builder::ProgressFn;

use super::{LlmConfig, LlmError};

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: Delta,
}

#[derive(Debug, Deserialize)]
struct Delta {
    content: Option<String>,
}

/// Client for a DeepSeek-compatible `/chat/completions` endpoint.
#[derive(Debug)]
pub struct DeepSeekClient {
    config: LlmConfig,
    client: reqwest::Client,
}

impl DeepSeekClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey);
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn request_body<'a>(&'a self, system: &'a str, user: &'a str, stream: bool) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            stream,
        }
    }

    /// Buffered completion: send the prompt pair, return the full text.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&self.request_body(system, user, false))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Malformed(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::Malformed("response contained no choices".to_string()))
    }

    /// Streaming completion: invoke `on_chunk` per content delta and
    /// return the accumulated text.
    pub async fn stream(
        &self,
        system: &str,
        user: &str,
        on_chunk: Option<&ProgressFn>,
    ) -> Result<String, LlmError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&self.request_body(system, user, true))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let mut byte_stream = response.bytes_stream();
        let mut line_buf = String::new();
        let mut accumulated = String::new();

        'read: while let Some(chunk) = byte_stream.next().await {
            let chunk = chunk?;
            line_buf.push_str(&String::from_utf8_lossy(&chunk));

            // Drain complete lines; the tail may be a partial frame.
            while let Some(newline) = line_buf.find('\n') {
                let line: String = line_buf.drain(..=newline).collect();
                let Some(data) = line.trim().strip_prefix("data:") else {
                    continue;
                };
                let data = data.trim();
                if data == "[DONE]" {
                    break 'read;
                }
                match serde_json::from_str::<StreamChunk>(data) {
                    Ok(parsed) => {
                        for choice in &parsed.choices {
                            if let Some(delta) = choice.delta.content.as_deref() {
                                accumulated.push_str(delta);
                                if let Some(on_chunk) = on_chunk {
                                    on_chunk(delta);
                                }
                            }
                        }
                    }
                    Err(e) => {
                        debug!(error = %e, "skipping unparseable stream frame");
                    }
                }
            }
        }

        Ok(accumulated)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn test_client(server: &MockServer) -> DeepSeekClient {
        DeepSeekClient::new(LlmConfig::new("test-key").with_base_url(server.uri())).unwrap()
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let err = DeepSeekClient::new(LlmConfig::new("  ")).unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }

    #[tokio::test]
    async fn complete_returns_first_choice_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "Hello there."}}]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let out = client.complete("system", "user").await.unwrap();
        assert_eq!(out, "Hello there.");
    }

    #[tokio::test]
    async fn complete_surfaces_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client.complete("system", "user").await.unwrap_err();
        match err {
            LlmError::Api { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn stream_invokes_callback_per_delta_and_accumulates() {
        let sse_body = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"Buy \"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"now\"}}]}\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\".\"}}]}\n\n",
            "data: [DONE]\n\n",
        );

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(sse_body, "text/event-stream"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback = move |chunk: &str| sink.lock().unwrap().push(chunk.to_string());
        let callback: &ProgressFn = &callback;

        let out = client.stream("system", "user", Some(callback)).await.unwrap();
        assert_eq!(out, "Buy now.");
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["Buy ".to_string(), "now".to_string(), ".".to_string()]
        );
    }

    #[tokio::test]
    async fn stream_skips_malformed_frames() {
        let sse_body = concat!(
            "data: not-json\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\n\n",
            "data: [DONE]\n\n",
        );

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(sse_body, "text/event-stream"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let out = client.stream("system", "user", None).await.unwrap();
        assert_eq!(out, "ok");
    }
}
