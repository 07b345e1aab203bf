//! `ChatProvider` over an OpenAI-compatible streaming chat completions endpoint.

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;

use cv_domain::error::{Error, Result};
use cv_domain::ports::{ChatMessage, ChatProvider, ChatRole, StreamToken};

/// Connection details for an OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone)]
pub struct HttpChatConfig {
    /// Base URL, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    /// Bearer token sent as `Authorization: Bearer <api_key>`.
    pub api_key: String,
    /// Request timeout for establishing the stream.
    pub timeout: Duration,
}

/// Streams chat completions over HTTP, via Server-Sent Events.
pub struct HttpChatProvider {
    client: reqwest::Client,
    config: HttpChatConfig,
    model: String,
}

impl HttpChatProvider {
    /// Builds a provider for `model`, failing only if the HTTP client
    /// itself can't be constructed.
    pub fn new(config: HttpChatConfig, model: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::provider_with_source("failed to build HTTP client", e))?;
        Ok(Self {
            client,
            config,
            model: model.into(),
        })
    }
}

fn role_str(role: ChatRole) -> &'static str {
    match role {
        ChatRole::System => "system",
        ChatRole::User => "user",
        ChatRole::Assistant => "assistant",
    }
}

#[derive(Deserialize)]
struct ChunkChoice {
    delta: ChunkDelta,
}

#[derive(Deserialize, Default)]
struct ChunkDelta {
    content: Option<String>,
}

#[derive(Deserialize)]
struct StreamChunk {
    choices: Vec<ChunkChoice>,
}

#[async_trait]
impl ChatProvider for HttpChatProvider {
    async fn chat_stream(
        &self,
        messages: Vec<ChatMessage>,
        token: CancellationToken,
    ) -> Result<BoxStream<'static, Result<StreamToken>>> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let payload = json!({
            "model": self.model,
            "stream": true,
            "messages": messages
                .iter()
                .map(|m| json!({"role": role_str(m.role), "content": m.content}))
                .collect::<Vec<_>>(),
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::provider_with_source("chat request failed", e))?;

        if !response.status().is_success() {
            return Err(Error::provider(format!("chat endpoint returned {}", response.status())));
        }

        let byte_stream = response.bytes_stream();
        let stream = async_stream::try_stream! {
            let mut byte_stream = Box::pin(byte_stream);
            let mut buffer = String::new();
            let mut assembled = String::new();

            loop {
                if token.is_cancelled() {
                    Err(Error::Cancelled)?;
                }

                let Some(chunk) = byte_stream.next().await else { break };
                let chunk = chunk.map_err(|e| Error::provider_with_source("chat stream read failed", e))?;
                buffer.push_str(&String::from_utf8_lossy(&chunk));

                while let Some(line_end) = buffer.find('\n') {
                    let line = buffer[..line_end].trim().to_string();
                    buffer.drain(..=line_end);

                    let Some(data) = line.strip_prefix("data: ") else { continue };
                    if data == "[DONE]" {
                        yield StreamToken::Complete(assembled.clone());
                        return;
                    }

                    let parsed: StreamChunk = match serde_json::from_str(data) {
                        Ok(p) => p,
                        Err(_) => continue,
                    };
                    if let Some(content) = parsed.choices.first().and_then(|c| c.delta.content.clone()) {
                        assembled.push_str(&content);
                        yield StreamToken::Token(content);
                    }
                }
            }

            yield StreamToken::Complete(assembled.clone());
        };

        Ok(stream.boxed())
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn set_model(&mut self, model: String) {
        self.model = model;
    }
}
