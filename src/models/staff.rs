//! Staff model
//!
//! Staff members listed on the public team pages. Position and department
//! are bilingual; contact details are optional.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Staff member entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    /// Unique identifier
    pub id: i64,
    /// English name
    pub name_en: String,
    /// French name
    pub name_fr: String,
    /// English position title
    pub position_en: String,
    /// French position title
    pub position_fr: String,
    /// English department
    pub department_en: Option<String>,
    /// French department
    pub department_fr: Option<String>,
    /// English biography
    pub bio_en: Option<String>,
    /// French biography
    pub bio_fr: Option<String>,
    /// Portrait photo URL
    pub photo_url: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Contact phone
    pub phone: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}
