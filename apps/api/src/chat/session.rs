//! One conversation: an ordered, role-tagged history replayed on every turn.

use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::chat::ollama::{ChatBackend, ChatMessage};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "content", rename_all = "snake_case")]
pub enum TurnOutcome {
    Reply(String),
    Failed(String),
}

impl TurnOutcome {
    /// Text shown to the user for this turn.
    pub fn display(&self) -> String {
        match self {
            TurnOutcome::Reply(reply) => reply.clone(),
            TurnOutcome::Failed(e) => format!("Error: {e}"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub model: String,
    pub history: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            model: model.into(),
            history: Vec::new(),
        }
    }

    /// Appends the user message, then the reply if the call succeeds.
    /// A failed call leaves the user message in place without a reply.
    pub async fn turn(&mut self, backend: &dyn ChatBackend, input: &str) -> TurnOutcome {
        self.history.push(ChatMessage::user(input));
        match backend.chat(&self.model, &self.history).await {
            Ok(reply) => {
                self.history.push(ChatMessage::assistant(reply.clone()));
                TurnOutcome::Reply(reply)
            }
            Err(e) => {
                warn!("Chat call to {} failed: {e}", self.model);
                TurnOutcome::Failed(e.to_string())
            }
        }
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ollama::testing::{DownBackend, EchoBackend};
    use crate::chat::ollama::Role;

    #[tokio::test]
    async fn test_each_turn_replays_full_history() {
        let backend = EchoBackend::default();
        let mut session = ChatSession::new("llama3.2");

        assert_eq!(
            session.turn(&backend, "Hi").await,
            TurnOutcome::Reply("echo: Hi".to_string())
        );
        session.turn(&backend, "Again").await;

        assert_eq!(*backend.seen.lock().unwrap(), vec![1, 3]);
        let roles: Vec<Role> = session.history.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
        );
    }

    #[tokio::test]
    async fn test_failed_turn_keeps_user_message_only() {
        let mut session = ChatSession::new("gemma");
        let outcome = session.turn(&DownBackend, "Hello?").await;

        assert_eq!(
            outcome.display(),
            "Error: runtime error (status 503): runtime unavailable"
        );
        assert_eq!(session.history, vec![ChatMessage::user("Hello?")]);
    }

    #[tokio::test]
    async fn test_clear_empties_history() {
        let mut session = ChatSession::new("mistral");
        session.turn(&EchoBackend::default(), "Hi").await;
        session.clear();
        assert!(session.history.is_empty());
        assert_eq!(session.model, "mistral");
    }
}
