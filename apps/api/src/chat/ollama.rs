//! Client for the local model runtime's `/api/chat` endpoint (non-streaming).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::chat::ChatError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Sends the full history and returns the assistant's reply text.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat(&self, model: &str, history: &[ChatMessage]) -> Result<String, ChatError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct RuntimeError {
    error: String,
}

#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    endpoint: String,
}

impl OllamaClient {
    pub fn new(base_url: &str) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl ChatBackend for OllamaClient {
    async fn chat(&self, model: &str, history: &[ChatMessage]) -> Result<String, ChatError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest {
                model,
                messages: history,
                stream: false,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<RuntimeError>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(ChatError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        Ok(parsed.message.content)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Replies "echo: <last message>" and records the history length of each call.
    #[derive(Default)]
    pub struct EchoBackend {
        pub seen: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl ChatBackend for EchoBackend {
        async fn chat(&self, _model: &str, history: &[ChatMessage]) -> Result<String, ChatError> {
            self.seen.lock().unwrap().push(history.len());
            let last = history.last().map(|m| m.content.as_str()).unwrap_or("");
            Ok(format!("echo: {last}"))
        }
    }

    pub struct DownBackend;

    #[async_trait]
    impl ChatBackend for DownBackend {
        async fn chat(&self, _model: &str, _history: &[ChatMessage]) -> Result<String, ChatError> {
            Err(ChatError::Api {
                status: 503,
                message: "runtime unavailable".to_string(),
            })
        }
    }
}
