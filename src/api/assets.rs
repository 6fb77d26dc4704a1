//! Asset API endpoints
//!
//! - GET /api/assets - List assets (public, paginated)
//! - GET /api/assets/search?query=&lang= - Search titles/descriptions
//! - GET /api/assets/{id} - Get an asset (public)
//! - POST/PUT/DELETE - Admin writes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{ListMeta, StatusMessage};
use crate::models::{Asset, Lang, ListParams, PagedResult};

/// Query parameters for listing assets
#[derive(Debug, Deserialize)]
pub struct ListAssetsQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

/// Query parameters for searching assets
#[derive(Debug, Deserialize)]
pub struct SearchAssetsQuery {
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
    20
}

/// Response for the asset list
#[derive(Debug, Serialize)]
pub struct AssetListResponse {
    #[serde(flatten)]
    pub meta: ListMeta,
    pub assets: Vec<Asset>,
}

/// Response for a single asset
#[derive(Debug, Serialize)]
pub struct SingleAssetResponse {
    pub success: bool,
    pub asset: Asset,
}

/// Response after create/update
#[derive(Debug, Serialize)]
pub struct AssetMutationResponse {
    pub success: bool,
    pub message: String,
    pub asset: Asset,
}

/// Request body for creating an asset
#[derive(Debug, Deserialize)]
pub struct CreateAssetRequest {
    pub title_en: String,
    pub title_fr: String,
    pub description_en: Option<String>,
    pub description_fr: Option<String>,
    pub file_url: String,
    pub file_type: String,
    pub file_size: Option<i64>,
}

/// Request body for updating an asset
#[derive(Debug, Deserialize)]
pub struct UpdateAssetRequest {
    pub title_en: Option<String>,
    pub title_fr: Option<String>,
    pub description_en: Option<String>,
    pub description_fr: Option<String>,
    pub file_url: Option<String>,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
}

/// GET /api/assets - List assets
pub async fn list_assets(
    State(state): State<AppState>,
    Query(query): Query<ListAssetsQuery>,
) -> Result<Json<AssetListResponse>, ApiError> {
    let params = ListParams::new(query.page, query.limit);

    let (items, total) = state
        .asset_repo
        .list(&params)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    let result = PagedResult::new(items, total, &params);
    Ok(Json(AssetListResponse {
        meta: ListMeta::from_result(&result),
        assets: result.items,
    }))
}

/// GET /api/assets/search?query=&lang= - Search assets
pub async fn search_assets(
    State(state): State<AppState>,
    Query(query): Query<SearchAssetsQuery>,
) -> Result<Json<AssetListResponse>, ApiError> {
    if query.query.trim().is_empty() {
        return Err(ApiError::validation_error("Search query is required"));
    }

    let params = ListParams::new(query.page, query.limit);

    let (items, total) = state
        .asset_repo
        .search(query.query.trim(), query.lang, &params)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    let result = PagedResult::new(items, total, &params);
    Ok(Json(AssetListResponse {
        meta: ListMeta::from_result(&result),
        assets: result.items,
    }))
}

/// GET /api/assets/{id} - Get an asset by ID
pub async fn get_asset(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SingleAssetResponse>, ApiError> {
    let asset = state
        .asset_repo
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Asset not found"))?;

    Ok(Json(SingleAssetResponse {
        success: true,
        asset,
    }))
}

/// POST /api/assets - Create an asset (admin)
pub async fn create_asset(
    State(state): State<AppState>,
    Json(body): Json<CreateAssetRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.title_en.trim().is_empty() || body.title_fr.trim().is_empty() {
        return Err(ApiError::validation_error("Both titles are required"));
    }
    if body.file_url.trim().is_empty() || body.file_type.trim().is_empty() {
        return Err(ApiError::validation_error(
            "A file URL and file type are required",
        ));
    }

    let asset = state
        .asset_repo
        .create(&Asset {
            id: 0,
            title_en: body.title_en,
            title_fr: body.title_fr,
            description_en: body.description_en,
            description_fr: body.description_fr,
            file_url: body.file_url,
            file_type: body.file_type,
            file_size: body.file_size,
            uploaded_on: chrono::Utc::now(),
        })
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(AssetMutationResponse {
            success: true,
            message: "Asset created successfully".to_string(),
            asset,
        }),
    ))
}

/// PUT /api/assets/{id} - Update an asset (admin)
pub async fn update_asset(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateAssetRequest>,
) -> Result<Json<AssetMutationResponse>, ApiError> {
    let mut asset = state
        .asset_repo
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Asset not found"))?;

    if let Some(title_en) = body.title_en {
        asset.title_en = title_en;
    }
    if let Some(title_fr) = body.title_fr {
        asset.title_fr = title_fr;
    }
    if body.description_en.is_some() {
        asset.description_en = body.description_en;
    }
    if body.description_fr.is_some() {
        asset.description_fr = body.description_fr;
    }
    if let Some(file_url) = body.file_url {
        asset.file_url = file_url;
    }
    if let Some(file_type) = body.file_type {
        asset.file_type = file_type;
    }
    if body.file_size.is_some() {
        asset.file_size = body.file_size;
    }

    let asset = state
        .asset_repo
        .update(&asset)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(Json(AssetMutationResponse {
        success: true,
        message: "Asset updated successfully".to_string(),
        asset,
    }))
}

/// DELETE /api/assets/{id} - Delete an asset (admin)
pub async fn delete_asset(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StatusMessage>, ApiError> {
    state
        .asset_repo
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Asset not found"))?;

    state
        .asset_repo
        .delete(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(Json(StatusMessage::ok("Asset deleted successfully")))
}
