//! Staff API endpoints
//!
//! - GET /api/staffs - List staff (public, paginated, ?department= filter)
//! - GET /api/staffs/{id} - Get a staff member (public)
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
use crate::models::{ListParams, PagedResult, Staff};

/// Query parameters for listing staff
#[derive(Debug, Deserialize)]
pub struct ListStaffQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Matches the department in either language
    pub department: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

/// Response for the staff list
#[derive(Debug, Serialize)]
pub struct StaffListResponse {
    #[serde(flatten)]
    pub meta: ListMeta,
    pub staff: Vec<Staff>,
}

/// Response for a single staff member
#[derive(Debug, Serialize)]
pub struct SingleStaffResponse {
    pub success: bool,
    pub staff: Staff,
}

/// Response after create/update
#[derive(Debug, Serialize)]
pub struct StaffMutationResponse {
    pub success: bool,
    pub message: String,
    pub staff: Staff,
}

/// Request body for creating a staff member
#[derive(Debug, Deserialize)]
pub struct CreateStaffRequest {
    pub name_en: String,
    pub name_fr: String,
    pub position_en: String,
    pub position_fr: String,
    pub department_en: Option<String>,
    pub department_fr: Option<String>,
    pub bio_en: Option<String>,
    pub bio_fr: Option<String>,
    pub photo_url: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Request body for updating a staff member
#[derive(Debug, Deserialize)]
pub struct UpdateStaffRequest {
    pub name_en: Option<String>,
    pub name_fr: Option<String>,
    pub position_en: Option<String>,
    pub position_fr: Option<String>,
    pub department_en: Option<String>,
    pub department_fr: Option<String>,
    pub bio_en: Option<String>,
    pub bio_fr: Option<String>,
    pub photo_url: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// GET /api/staffs - List staff members
pub async fn list_staff(
    State(state): State<AppState>,
    Query(query): Query<ListStaffQuery>,
) -> Result<Json<StaffListResponse>, ApiError> {
    let params = ListParams::new(query.page, query.limit);

    let (items, total) = state
        .staff_repo
        .list(query.department.as_deref(), &params)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    let result = PagedResult::new(items, total, &params);
    Ok(Json(StaffListResponse {
        meta: ListMeta::from_result(&result),
        staff: result.items,
    }))
}

/// GET /api/staffs/{id} - Get a staff member by ID
pub async fn get_staff(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SingleStaffResponse>, ApiError> {
    let staff = state
        .staff_repo
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Staff member not found"))?;

    Ok(Json(SingleStaffResponse {
        success: true,
        staff,
    }))
}

/// POST /api/staffs - Create a staff member (admin)
pub async fn create_staff(
    State(state): State<AppState>,
    Json(body): Json<CreateStaffRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if body.name_en.trim().is_empty()
        || body.name_fr.trim().is_empty()
        || body.position_en.trim().is_empty()
        || body.position_fr.trim().is_empty()
    {
        return Err(ApiError::validation_error(
            "Names and positions are required in both languages",
        ));
    }

    let now = chrono::Utc::now();
    let staff = state
        .staff_repo
        .create(&Staff {
            id: 0,
            name_en: body.name_en,
            name_fr: body.name_fr,
            position_en: body.position_en,
            position_fr: body.position_fr,
            department_en: body.department_en,
            department_fr: body.department_fr,
            bio_en: body.bio_en,
            bio_fr: body.bio_fr,
            photo_url: body.photo_url,
            email: body.email,
            phone: body.phone,
            created_at: now,
            updated_at: now,
        })
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(StaffMutationResponse {
            success: true,
            message: "Staff member created successfully".to_string(),
            staff,
        }),
    ))
}

/// PUT /api/staffs/{id} - Update a staff member (admin)
pub async fn update_staff(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateStaffRequest>,
) -> Result<Json<StaffMutationResponse>, ApiError> {
    let mut staff = state
        .staff_repo
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Staff member not found"))?;

    if let Some(name_en) = body.name_en {
        staff.name_en = name_en;
    }
    if let Some(name_fr) = body.name_fr {
        staff.name_fr = name_fr;
    }
    if let Some(position_en) = body.position_en {
        staff.position_en = position_en;
    }
    if let Some(position_fr) = body.position_fr {
        staff.position_fr = position_fr;
    }
    if let Some(department_en) = body.department_en {
        staff.department_en = Some(department_en);
    }
    if let Some(department_fr) = body.department_fr {
        staff.department_fr = Some(department_fr);
    }
    if let Some(bio_en) = body.bio_en {
        staff.bio_en = Some(bio_en);
    }
    if let Some(bio_fr) = body.bio_fr {
        staff.bio_fr = Some(bio_fr);
    }
    if let Some(photo_url) = body.photo_url {
        staff.photo_url = Some(photo_url);
    }
    if let Some(email) = body.email {
        staff.email = Some(email);
    }
    if let Some(phone) = body.phone {
        staff.phone = Some(phone);
    }

    let staff = state
        .staff_repo
        .update(&staff)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(Json(StaffMutationResponse {
        success: true,
        message: "Staff member updated successfully".to_string(),
        staff,
    }))
}

/// DELETE /api/staffs/{id} - Delete a staff member (admin)
pub async fn delete_staff(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StatusMessage>, ApiError> {
    state
        .staff_repo
        .get_by_id(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?
        .ok_or_else(|| ApiError::not_found("Staff member not found"))?;

    state
        .staff_repo
        .delete(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(Json(StatusMessage::ok("Staff member deleted successfully")))
}
