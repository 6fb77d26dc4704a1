//! Fact API endpoints
//!
//! - GET /api/facts - List facts (public)
//! - GET /api/facts/{id} - Get a fact (public)
//! - POST/PUT/DELETE - Admin writes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::StatusMessage;
use crate::models::Fact;

/// Response for the fact list
#[derive(Debug, Serialize)]
pub struct FactListResponse {
    pub success: bool,
    pub count: usize,
    pub facts: Vec<Fact>,
}

/// Response for a single fact
#[derive(Debug, Serialize)]
pub struct SingleFactResponse {
    pub success: bool,
    pub fact: Fact,
}

/// Response after create/update
#[derive(Debug, Serialize)]
pub struct FactMutationResponse {
    pub success: bool,
    pub message: String,
    pub fact: Fact,
}

/// Request body for creating a fact
#[derive(Debug, Deserialize)]
pub struct CreateFactRequest {
    pub content_en: String,
    pub content_fr: String,
}

/// Request body for updating a fact
#[derive(Debug, Deserialize)]
pub struct UpdateFactRequest {
    pub content_en: Option<String>,
    pub content_fr: Option<String>,
}

/// GET /api/facts - List all facts
pub async fn list_facts(State(state): State<AppState>) -> Result<Json<FactListResponse>, ApiError> {
    let facts = state
        .fact_repo
        .list()
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(Json(FactListResponse {
        success: true,
        count: facts.len(),
        facts,
    }))
}

/// GET /api/facts/{id} - Get a fact by ID
pub async fn get_fact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SingleFactResponse>, ApiError> {
    let fact = state
        .fact_repo
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Fact not found"))?;

    Ok(Json(SingleFactResponse {
        success: true,
        fact,
    }))
}

/// POST /api/facts - Create a fact (admin)
pub async fn create_fact(
    State(state): State<AppState>,
    Json(body): Json<CreateFactRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.content_en.trim().is_empty() || body.content_fr.trim().is_empty() {
        return Err(ApiError::validation_error(
            "Content is required in both languages",
        ));
    }

    let fact = state
        .fact_repo
        .create(&Fact {
            id: 0,
            content_en: body.content_en,
            content_fr: body.content_fr,
            posted_on: chrono::Utc::now(),
        })
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(FactMutationResponse {
            success: true,
            message: "Fact created successfully".to_string(),
            fact,
        }),
    ))
}

/// PUT /api/facts/{id} - Update a fact (admin)
pub async fn update_fact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateFactRequest>,
) -> Result<Json<FactMutationResponse>, ApiError> {
    let mut fact = state
        .fact_repo
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Fact not found"))?;

    if let Some(content_en) = body.content_en {
        fact.content_en = content_en;
    }
    if let Some(content_fr) = body.content_fr {
        fact.content_fr = content_fr;
    }

    let fact = state
        .fact_repo
        .update(&fact)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(Json(FactMutationResponse {
        success: true,
        message: "Fact updated successfully".to_string(),
        fact,
    }))
}

/// DELETE /api/facts/{id} - Delete a fact (admin)
pub async fn delete_fact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StatusMessage>, ApiError> {
    state
        .fact_repo
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Fact not found"))?;

    state
        .fact_repo
        .delete(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(Json(StatusMessage::ok("Fact deleted successfully")))
}
