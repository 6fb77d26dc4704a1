//! Project model
//!
//! Institutional projects showcased on the public site.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Project entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier
    pub id: i64,
    /// English title
    pub title_en: String,
    /// French title
    pub title_fr: String,
    /// English description
    pub description_en: Option<String>,
    /// French description
    pub description_fr: Option<String>,
    /// External link
    pub link: Option<String>,
    /// Illustration image URL
    pub image_url: Option<String>,
    /// Publication timestamp
    pub posted_on: DateTime<Utc>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}
