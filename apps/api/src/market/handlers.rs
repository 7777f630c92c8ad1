//! Axum route handlers for the market-query assistant.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::market::intent::Intent;
use crate::market::QueryResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

fn validated(request: &QueryRequest) -> Result<&str, AppError> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("Please enter a query.".to_string()));
    }
    Ok(query)
}

/// POST /api/v1/market/query
pub async fn handle_query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, AppError> {
    let query = validated(&request)?;
    Ok(Json(state.market.answer(query).await?))
}

/// POST /api/v1/market/classify
pub async fn handle_classify(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<Intent>, AppError> {
    let query = validated(&request)?;
    Ok(Json(state.market.classify(query).await?))
}
