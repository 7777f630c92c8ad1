//! Axum route handlers for the chat front-end.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::session::ChatSession;
use crate::chat::{render_transcript, TurnResponse, AVAILABLE_MODELS, DEFAULT_MODEL};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ModelsResponse {
    pub models: [&'static str; 4],
    pub default: &'static str,
}

#[derive(Deserialize, Default)]
pub struct CreateSessionRequest {
    pub model: Option<String>,
}

#[derive(Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct TranscriptResponse {
    #[serde(flatten)]
    pub session: ChatSession,
    pub transcript: Vec<String>,
}

impl From<ChatSession> for TranscriptResponse {
    fn from(session: ChatSession) -> Self {
        Self {
            transcript: render_transcript(&session.history),
            session,
        }
    }
}

/// GET /api/v1/chat/models
pub async fn handle_models() -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: AVAILABLE_MODELS,
        default: DEFAULT_MODEL,
    })
}

/// POST /api/v1/chat/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
    body: Option<Json<CreateSessionRequest>>,
) -> Result<(StatusCode, Json<TranscriptResponse>), AppError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let session = state.chat.create(req.model.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

/// GET /api/v1/chat/sessions/:id
pub async fn handle_transcript(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TranscriptResponse>, AppError> {
    Ok(Json(state.chat.transcript(id).await?.into()))
}

/// POST /api/v1/chat/sessions/:id/messages
pub async fn handle_send(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<TurnResponse>, AppError> {
    if req.message.trim().is_empty() {
        return Err(AppError::Validation("Please enter a message.".to_string()));
    }
    Ok(Json(state.chat.send(id, &req.message).await?))
}

/// DELETE /api/v1/chat/sessions/:id/messages
pub async fn handle_clear(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TranscriptResponse>, AppError> {
    Ok(Json(state.chat.clear(id).await?.into()))
}

/// DELETE /api/v1/chat/sessions/:id
pub async fn handle_close(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.chat.close(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
