// Chat front-end over a local model runtime.
// Flow: append user message → chat call with full history → append reply.

pub mod handlers;
pub mod ollama;
pub mod session;

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use ollama::{ChatBackend, ChatMessage};
use session::{ChatSession, TurnOutcome};

/// Models offered for selection.
pub const AVAILABLE_MODELS: [&str; 4] = ["llama3.2", "gpt-oss:20b", "mistral", "gemma"];
pub const DEFAULT_MODEL: &str = "llama3.2";

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("runtime error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct TurnResponse {
    pub outcome: TurnOutcome,
    pub display: String,
    pub session: ChatSession,
}

/// In-memory chat sessions. A session and its history live until it is
/// closed or the process exits.
pub struct ChatHub {
    backend: Arc<dyn ChatBackend>,
    sessions: RwLock<HashMap<Uuid, Arc<Mutex<ChatSession>>>>,
}

impl ChatHub {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn create(&self, model: Option<&str>) -> Result<ChatSession, AppError> {
        let model = model.unwrap_or(DEFAULT_MODEL);
        if !AVAILABLE_MODELS.contains(&model) {
            return Err(AppError::Validation(format!(
                "Unknown model {model}; choose one of {}",
                AVAILABLE_MODELS.join(", ")
            )));
        }
        let session = ChatSession::new(model);
        info!("Chat session {} started with {model}", session.id);
        self.sessions
            .write()
            .await
            .insert(session.id, Arc::new(Mutex::new(session.clone())));
        Ok(session)
    }

    pub async fn transcript(&self, id: Uuid) -> Result<ChatSession, AppError> {
        Ok(self.session(id).await?.lock().await.clone())
    }

    /// Turns on one session run one at a time.
    pub async fn send(&self, id: Uuid, message: &str) -> Result<TurnResponse, AppError> {
        let session = self.session(id).await?;
        let mut session = session.lock().await;
        let outcome = session.turn(self.backend.as_ref(), message).await;
        Ok(TurnResponse {
            display: outcome.display(),
            outcome,
            session: session.clone(),
        })
    }

    pub async fn clear(&self, id: Uuid) -> Result<ChatSession, AppError> {
        let session = self.session(id).await?;
        let mut session = session.lock().await;
        session.clear();
        Ok(session.clone())
    }

    /// Drops the session. Later calls with this id are not found.
    pub async fn close(&self, id: Uuid) -> Result<(), AppError> {
        if self.sessions.write().await.remove(&id).is_none() {
            return Err(AppError::NotFound(format!("Chat session {id} not found")));
        }
        info!("Chat session {id} closed");
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn session(&self, id: Uuid) -> Result<Arc<Mutex<ChatSession>>, AppError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Chat session {id} not found")))
    }
}

/// Transcript lines as shown to the user.
pub fn render_transcript(history: &[ChatMessage]) -> Vec<String> {
    history
        .iter()
        .map(|m| match m.role {
            ollama::Role::User => format!("You: {}", m.content),
            ollama::Role::Assistant => format!("AI: {}", m.content),
        })
        .collect()
}
