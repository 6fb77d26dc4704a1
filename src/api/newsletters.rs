//! Newsletter API endpoints
//!
//! - GET /api/newsletters - List issues (public, paginated)
//! - GET /api/newsletters/search?q= - Search titles/bodies (public)
//! - GET /api/newsletters/{id} - Get an issue (public)
//! - POST/PUT/DELETE - Admin writes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{ListMeta, StatusMessage};
use crate::models::{ListParams, Newsletter, PagedResult};

/// Query parameters for listing newsletters
#[derive(Debug, Deserialize)]
pub struct ListNewslettersQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

/// Query parameters for searching newsletters
#[derive(Debug, Deserialize)]
pub struct SearchNewslettersQuery {
    pub q: String,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

/// Response for the newsletter list
#[derive(Debug, Serialize)]
pub struct NewsletterListResponse {
    #[serde(flatten)]
    pub meta: ListMeta,
    pub newsletters: Vec<Newsletter>,
}

/// Response for a single newsletter
#[derive(Debug, Serialize)]
pub struct SingleNewsletterResponse {
    pub success: bool,
    pub newsletter: Newsletter,
}

/// Response after create/update
#[derive(Debug, Serialize)]
pub struct NewsletterMutationResponse {
    pub success: bool,
    pub message: String,
    pub newsletter: Newsletter,
}

/// Request body for creating a newsletter
#[derive(Debug, Deserialize)]
pub struct CreateNewsletterRequest {
    pub title_en: Option<String>,
    pub title_fr: Option<String>,
    pub content_en: Option<String>,
    pub content_fr: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Request body for updating a newsletter
#[derive(Debug, Deserialize)]
pub struct UpdateNewsletterRequest {
    pub title_en: Option<String>,
    pub title_fr: Option<String>,
    pub content_en: Option<String>,
    pub content_fr: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

/// GET /api/newsletters - List newsletters
pub async fn list_newsletters(
    State(state): State<AppState>,
    Query(query): Query<ListNewslettersQuery>,
) -> Result<Json<NewsletterListResponse>, ApiError> {
    let params = ListParams::new(query.page, query.limit);

    let (items, total) = state
        .newsletter_repo
        .list(&params)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    let result = PagedResult::new(items, total, &params);
    Ok(Json(NewsletterListResponse {
        meta: ListMeta::from_result(&result),
        newsletters: result.items,
    }))
}

/// GET /api/newsletters/search?q= - Search newsletters
pub async fn search_newsletters(
    State(state): State<AppState>,
    Query(query): Query<SearchNewslettersQuery>,
) -> Result<Json<NewsletterListResponse>, ApiError> {
    if query.q.trim().is_empty() {
        return Err(ApiError::validation_error("Search query is required"));
    }

    let params = ListParams::new(query.page, query.limit);

    let (items, total) = state
        .newsletter_repo
        .search(query.q.trim(), &params)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    let result = PagedResult::new(items, total, &params);
    Ok(Json(NewsletterListResponse {
        meta: ListMeta::from_result(&result),
        newsletters: result.items,
    }))
}

/// GET /api/newsletters/{id} - Get a newsletter by ID
pub async fn get_newsletter(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SingleNewsletterResponse>, ApiError> {
    let newsletter = state
        .newsletter_repo
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Newsletter not found"))?;

    Ok(Json(SingleNewsletterResponse {
        success: true,
        newsletter,
    }))
}

/// POST /api/newsletters - Create a newsletter (admin)
pub async fn create_newsletter(
    State(state): State<AppState>,
    Json(body): Json<CreateNewsletterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let now = Utc::now();
    let newsletter = state
        .newsletter_repo
        .create(&Newsletter {
            id: 0,
            title_en: body.title_en,
            title_fr: body.title_fr,
            content_en: body.content_en,
            content_fr: body.content_fr,
            published_at: body.published_at,
            created_at: now,
            updated_at: now,
        })
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(NewsletterMutationResponse {
            success: true,
            message: "Newsletter created successfully".to_string(),
            newsletter,
        }),
    ))
}

/// PUT /api/newsletters/{id} - Update a newsletter (admin)
pub async fn update_newsletter(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateNewsletterRequest>,
) -> Result<Json<NewsletterMutationResponse>, ApiError> {
    let mut newsletter = state
        .newsletter_repo
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Newsletter not found"))?;

    if body.title_en.is_some() {
        newsletter.title_en = body.title_en;
    }
    if body.title_fr.is_some() {
        newsletter.title_fr = body.title_fr;
    }
    if body.content_en.is_some() {
        newsletter.content_en = body.content_en;
    }
    if body.content_fr.is_some() {
        newsletter.content_fr = body.content_fr;
    }
    if body.published_at.is_some() {
        newsletter.published_at = body.published_at;
    }

    let newsletter = state
        .newsletter_repo
        .update(&newsletter)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(Json(NewsletterMutationResponse {
        success: true,
        message: "Newsletter updated successfully".to_string(),
        newsletter,
    }))
}

/// DELETE /api/newsletters/{id} - Delete a newsletter (admin)
pub async fn delete_newsletter(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StatusMessage>, ApiError> {
    state
        .newsletter_repo
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Newsletter not found"))?;

    state
        .newsletter_repo
        .delete(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(Json(StatusMessage::ok("Newsletter deleted successfully")))
}
