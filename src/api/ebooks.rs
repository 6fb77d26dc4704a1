//! E-book API endpoints
//!
//! - GET /api/ebooks - List e-books (public, paginated)
//! - GET /api/ebooks/search?query=&lang= - Search titles/authors (public)
//! - GET /api/ebooks/{id} - Get an e-book (public)
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
use crate::models::{Ebook, Lang, ListParams, PagedResult};

/// Query parameters for listing e-books
#[derive(Debug, Deserialize)]
pub struct ListEbooksQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

/// Query parameters for searching e-books
#[derive(Debug, Deserialize)]
pub struct SearchEbooksQuery {
    pub query: String,
    #[serde(default)]
    pub lang: Lang,
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

/// Response for the e-book list
#[derive(Debug, Serialize)]
pub struct EbookListResponse {
    #[serde(flatten)]
    pub meta: ListMeta,
    pub ebooks: Vec<Ebook>,
}

/// Response for a single e-book
#[derive(Debug, Serialize)]
pub struct SingleEbookResponse {
    pub success: bool,
    pub ebook: Ebook,
}

/// Response after create/update
#[derive(Debug, Serialize)]
pub struct EbookMutationResponse {
    pub success: bool,
    pub message: String,
    pub ebook: Ebook,
}

/// Request body for creating an e-book
#[derive(Debug, Deserialize)]
pub struct CreateEbookRequest {
    pub title_en: String,
    pub title_fr: String,
    pub description_en: Option<String>,
    pub description_fr: Option<String>,
    pub author_en: Option<String>,
    pub author_fr: Option<String>,
    pub cover_url: Option<String>,
    pub file_url: String,
    pub file_size: Option<i64>,
    pub pages: Option<i32>,
    pub published_date: Option<DateTime<Utc>>,
}

/// Request body for updating an e-book
#[derive(Debug, Deserialize)]
pub struct UpdateEbookRequest {
    pub title_en: Option<String>,
    pub title_fr: Option<String>,
    pub description_en: Option<String>,
    pub description_fr: Option<String>,
    pub author_en: Option<String>,
    pub author_fr: Option<String>,
    pub cover_url: Option<String>,
    pub file_url: Option<String>,
    pub file_size: Option<i64>,
    pub pages: Option<i32>,
    pub published_date: Option<DateTime<Utc>>,
}

/// GET /api/ebooks - List e-books
pub async fn list_ebooks(
    State(state): State<AppState>,
    Query(query): Query<ListEbooksQuery>,
) -> Result<Json<EbookListResponse>, ApiError> {
    let params = ListParams::new(query.page, query.limit);

    let (items, total) = state
        .ebook_repo
        .list(&params)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    let result = PagedResult::new(items, total, &params);
    Ok(Json(EbookListResponse {
        meta: ListMeta::from_result(&result),
        ebooks: result.items,
    }))
}

/// GET /api/ebooks/search?query=&lang= - Search e-books
pub async fn search_ebooks(
    State(state): State<AppState>,
    Query(query): Query<SearchEbooksQuery>,
) -> Result<Json<EbookListResponse>, ApiError> {
    if query.query.trim().is_empty() {
        return Err(ApiError::validation_error("Search query is required"));
    }

    let params = ListParams::new(query.page, query.limit);

    let (items, total) = state
        .ebook_repo
        .search(query.query.trim(), query.lang, &params)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    let result = PagedResult::new(items, total, &params);
    Ok(Json(EbookListResponse {
        meta: ListMeta::from_result(&result),
        ebooks: result.items,
    }))
}

/// GET /api/ebooks/{id} - Get an e-book by ID
pub async fn get_ebook(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SingleEbookResponse>, ApiError> {
    let ebook = state
        .ebook_repo
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Ebook not found"))?;

    Ok(Json(SingleEbookResponse {
        success: true,
        ebook,
    }))
}

/// POST /api/ebooks - Create an e-book (admin)
pub async fn create_ebook(
    State(state): State<AppState>,
    Json(body): Json<CreateEbookRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.title_en.trim().is_empty() || body.title_fr.trim().is_empty() {
        return Err(ApiError::validation_error("Both titles are required"));
    }
    if body.file_url.trim().is_empty() {
        return Err(ApiError::validation_error("A file URL is required"));
    }

    let ebook = state
        .ebook_repo
        .create(&Ebook {
            id: 0,
            title_en: body.title_en,
            title_fr: body.title_fr,
            description_en: body.description_en,
            description_fr: body.description_fr,
            author_en: body.author_en,
            author_fr: body.author_fr,
            cover_url: body.cover_url,
            file_url: body.file_url,
            file_size: body.file_size,
            pages: body.pages,
            published_date: body.published_date,
            added_on: Utc::now(),
        })
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(EbookMutationResponse {
            success: true,
            message: "Ebook created successfully".to_string(),
            ebook,
        }),
    ))
}

/// PUT /api/ebooks/{id} - Update an e-book (admin)
pub async fn update_ebook(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateEbookRequest>,
) -> Result<Json<EbookMutationResponse>, ApiError> {
    let mut ebook = state
        .ebook_repo
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Ebook not found"))?;

    if let Some(title_en) = body.title_en {
        ebook.title_en = title_en;
    }
    if let Some(title_fr) = body.title_fr {
        ebook.title_fr = title_fr;
    }
    if body.description_en.is_some() {
        ebook.description_en = body.description_en;
    }
    if body.description_fr.is_some() {
        ebook.description_fr = body.description_fr;
    }
    if body.author_en.is_some() {
        ebook.author_en = body.author_en;
    }
    if body.author_fr.is_some() {
        ebook.author_fr = body.author_fr;
    }
    if body.cover_url.is_some() {
        ebook.cover_url = body.cover_url;
    }
    if let Some(file_url) = body.file_url {
        ebook.file_url = file_url;
    }
    if body.file_size.is_some() {
        ebook.file_size = body.file_size;
    }
    if body.pages.is_some() {
        ebook.pages = body.pages;
    }
    if body.published_date.is_some() {
        ebook.published_date = body.published_date;
    }

    let ebook = state
        .ebook_repo
        .update(&ebook)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(Json(EbookMutationResponse {
        success: true,
        message: "Ebook updated successfully".to_string(),
        ebook,
    }))
}

/// DELETE /api/ebooks/{id} - Delete an e-book (admin)
pub async fn delete_ebook(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StatusMessage>, ApiError> {
    state
        .ebook_repo
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Ebook not found"))?;

    state
        .ebook_repo
        .delete(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(Json(StatusMessage::ok("Ebook deleted successfully")))
}
