//! Axum route handlers for the recruiting assistant.

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::recruit::ingest::IngestReport;
use crate::recruit::mailer::EmailOutcome;
use crate::recruit::CvView;
use crate::state::AppState;

#[derive(Serialize)]
pub struct UploadResponse {
    pub stored: Vec<String>,
    pub message: String,
}

#[derive(Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub file_names: Vec<String>,
}

#[derive(Deserialize)]
pub struct AskRequest {
    pub query: String,
}

#[derive(Serialize)]
pub struct TextResponse {
    pub file_name: String,
    pub response: String,
}

#[derive(Deserialize)]
pub struct EmailRequest {
    pub subject: String,
    pub body: String,
}

#[derive(Serialize)]
pub struct EmailResponse {
    pub outcome: EmailOutcome,
    pub message: String,
}

fn non_empty<'a>(text: &'a str, warning: &str) -> Result<&'a str, AppError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(warning.to_string()));
    }
    Ok(trimmed)
}

/// POST /api/v1/recruit/cvs (multipart, one part per file)
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut stored = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        let Some(raw_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
        stored.push(state.recruit.upload(&raw_name, &bytes).await?);
    }
    if stored.is_empty() {
        return Err(AppError::Validation(
            "Upload one or more CVs (.pdf or .docx)".to_string(),
        ));
    }

    let message = format!("{} file(s) successfully uploaded!", stored.len());
    Ok(Json(UploadResponse { stored, message }))
}

/// POST /api/v1/recruit/embed
pub async fn handle_embed(State(state): State<AppState>) -> Result<Json<IngestReport>, AppError> {
    Ok(Json(state.recruit.embed().await?))
}

/// POST /api/v1/recruit/search
pub async fn handle_search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = non_empty(&req.query, "Please enter a query.")?;
    let file_names = state.recruit.search(query).await?;
    Ok(Json(SearchResponse { file_names }))
}

/// GET /api/v1/recruit/cvs/:file_name
pub async fn handle_view(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<Json<CvView>, AppError> {
    Ok(Json(state.recruit.view(&file_name).await?))
}

/// GET /api/v1/recruit/cvs/:file_name/download
pub async fn handle_download(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let cv = state.recruit.download(&file_name).await?;
    let headers = [
        (
            header::CONTENT_TYPE,
            cv.kind.download_content_type().to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", cv.file_name.replace('"', "")),
        ),
    ];
    Ok((headers, cv.bytes))
}

/// POST /api/v1/recruit/cvs/:file_name/summary
pub async fn handle_summary(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<Json<TextResponse>, AppError> {
    let response = state.recruit.summarize(&file_name).await?;
    Ok(Json(TextResponse {
        file_name,
        response,
    }))
}

/// POST /api/v1/recruit/cvs/:file_name/ask
pub async fn handle_ask(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
    Json(req): Json<AskRequest>,
) -> Result<Json<TextResponse>, AppError> {
    let query = non_empty(&req.query, "Please enter a query.")?;
    let response = state.recruit.ask(&file_name, query).await?;
    Ok(Json(TextResponse {
        file_name,
        response,
    }))
}

/// POST /api/v1/recruit/cvs/:file_name/email
pub async fn handle_email(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
    Json(req): Json<EmailRequest>,
) -> Result<Json<EmailResponse>, AppError> {
    const WARNING: &str = "Please fill in both the subject and body of the email.";
    if req.subject.trim().is_empty() || req.body.trim().is_empty() {
        return Err(AppError::Validation(WARNING.to_string()));
    }
    let outcome = state
        .recruit
        .email(&file_name, &req.subject, &req.body)
        .await?;
    Ok(Json(EmailResponse {
        message: outcome.message(),
        outcome,
    }))
}
