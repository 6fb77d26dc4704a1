//! Partner API endpoints
//!
//! - GET /api/partners - List partners (public)
//! - GET /api/partners/{id} - Get a partner (public)
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
use crate::models::Partner;

/// Response for the partner list
#[derive(Debug, Serialize)]
pub struct PartnerListResponse {
    pub success: bool,
    pub count: usize,
    pub partners: Vec<Partner>,
}

/// Response for a single partner
#[derive(Debug, Serialize)]
pub struct SinglePartnerResponse {
    pub success: bool,
    pub partner: Partner,
}

/// Response after create/update
#[derive(Debug, Serialize)]
pub struct PartnerMutationResponse {
    pub success: bool,
    pub message: String,
    pub partner: Partner,
}

/// Request body for creating a partner
#[derive(Debug, Deserialize)]
pub struct CreatePartnerRequest {
    pub name_en: String,
    pub name_fr: String,
    pub description_en: Option<String>,
    pub description_fr: Option<String>,
    pub logo_url: String,
    pub website: Option<String>,
}

/// Request body for updating a partner
#[derive(Debug, Deserialize)]
pub struct UpdatePartnerRequest {
    pub name_en: Option<String>,
    pub name_fr: Option<String>,
    pub description_en: Option<String>,
    pub description_fr: Option<String>,
    pub logo_url: Option<String>,
    pub website: Option<String>,
}

/// GET /api/partners - List all partners
pub async fn list_partners(
    State(state): State<AppState>,
) -> Result<Json<PartnerListResponse>, ApiError> {
    let partners = state
        .partner_repo
        .list()
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(Json(PartnerListResponse {
        success: true,
        count: partners.len(),
        partners,
    }))
}

/// GET /api/partners/{id} - Get a partner by ID
pub async fn get_partner(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SinglePartnerResponse>, ApiError> {
    let partner = state
        .partner_repo
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Partner not found"))?;

    Ok(Json(SinglePartnerResponse {
        success: true,
        partner,
    }))
}

/// POST /api/partners - Create a partner (admin)
pub async fn create_partner(
    State(state): State<AppState>,
    Json(body): Json<CreatePartnerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.name_en.trim().is_empty() || body.name_fr.trim().is_empty() {
        return Err(ApiError::validation_error("Both names are required"));
    }
    if body.logo_url.trim().is_empty() {
        return Err(ApiError::validation_error("A logo URL is required"));
    }

    let partner = state
        .partner_repo
        .create(&Partner {
            id: 0,
            name_en: body.name_en,
            name_fr: body.name_fr,
            description_en: body.description_en,
            description_fr: body.description_fr,
            logo_url: body.logo_url,
            website: body.website,
            added_on: chrono::Utc::now(),
        })
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(PartnerMutationResponse {
            success: true,
            message: "Partner created successfully".to_string(),
            partner,
        }),
    ))
}

/// PUT /api/partners/{id} - Update a partner (admin)
pub async fn update_partner(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdatePartnerRequest>,
) -> Result<Json<PartnerMutationResponse>, ApiError> {
    let mut partner = state
        .partner_repo
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Partner not found"))?;

    if let Some(name_en) = body.name_en {
        partner.name_en = name_en;
    }
    if let Some(name_fr) = body.name_fr {
        partner.name_fr = name_fr;
    }
    if let Some(description_en) = body.description_en {
        partner.description_en = Some(description_en);
    }
    if let Some(description_fr) = body.description_fr {
        partner.description_fr = Some(description_fr);
    }
    if let Some(logo_url) = body.logo_url {
        partner.logo_url = logo_url;
    }
    if let Some(website) = body.website {
        partner.website = Some(website);
    }

    let partner = state
        .partner_repo
        .update(&partner)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(Json(PartnerMutationResponse {
        success: true,
        message: "Partner updated successfully".to_string(),
        partner,
    }))
}

/// DELETE /api/partners/{id} - Delete a partner (admin)
pub async fn delete_partner(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StatusMessage>, ApiError> {
    state
        .partner_repo
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Partner not found"))?;

    state
        .partner_repo
        .delete(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(Json(StatusMessage::ok("Partner deleted successfully")))
}
