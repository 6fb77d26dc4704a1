//! Category API endpoints
//!
//! - GET /api/categories - List categories (public)
//! - GET /api/categories/{id} - Get a category (public)
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
use crate::models::{Category, CreateCategoryInput, UpdateCategoryInput};
use crate::services::CategoryServiceError;

/// Response for the category list
#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    pub success: bool,
    pub count: usize,
    pub categories: Vec<Category>,
}

/// Response for a single category
#[derive(Debug, Serialize)]
pub struct SingleCategoryResponse {
    pub success: bool,
    pub category: Category,
}

/// Response after create/update
#[derive(Debug, Serialize)]
pub struct CategoryMutationResponse {
    pub success: bool,
    pub message: String,
    pub category: Category,
}

/// Request body for creating a category
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name_en: String,
    pub name_fr: String,
}

/// Request body for updating a category
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name_en: Option<String>,
    pub name_fr: Option<String>,
}

/// GET /api/categories - List all categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoryListResponse>, ApiError> {
    let categories = state
        .category_service
        .list()
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(Json(CategoryListResponse {
        success: true,
        count: categories.len(),
        categories,
    }))
}

/// GET /api/categories/{id} - Get a category by ID
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SingleCategoryResponse>, ApiError> {
    let category = state
        .category_service
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;

    Ok(Json(SingleCategoryResponse {
        success: true,
        category,
    }))
}

/// POST /api/categories - Create a category (admin)
pub async fn create_category(
    State(state): State<AppState>,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .category_service
        .create(CreateCategoryInput {
            name_en: body.name_en,
            name_fr: body.name_fr,
        })
        .await
        .map_err(map_category_error)?;

    Ok((
        StatusCode::CREATED,
        Json(CategoryMutationResponse {
            success: true,
            message: "Category created successfully".to_string(),
            category,
        }),
    ))
}

/// PUT /api/categories/{id} - Update a category (admin)
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateCategoryRequest>,
) -> Result<Json<CategoryMutationResponse>, ApiError> {
    let category = state
        .category_service
        .update(
            id,
            UpdateCategoryInput {
                name_en: body.name_en,
                name_fr: body.name_fr,
            },
        )
        .await
        .map_err(map_category_error)?;

    Ok(Json(CategoryMutationResponse {
        success: true,
        message: "Category updated successfully".to_string(),
        category,
    }))
}

/// DELETE /api/categories/{id} - Delete a category (admin)
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StatusMessage>, ApiError> {
    state
        .category_service
        .delete(id)
        .await
        .map_err(map_category_error)?;

    Ok(Json(StatusMessage::ok("Category deleted successfully")))
}

fn map_category_error(e: CategoryServiceError) -> ApiError {
    match e {
        CategoryServiceError::NotFound => ApiError::not_found("Category not found"),
        CategoryServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        CategoryServiceError::HasArticles(count) => ApiError::conflict(format!(
            "Category has {} article(s) and cannot be deleted",
            count
        )),
        CategoryServiceError::InternalError(e) => ApiError::internal_error(e.to_string()),
    }
}
