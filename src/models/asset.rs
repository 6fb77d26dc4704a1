//! Asset model
//!
//! Generic downloadable documents (reports, forms, decrees) with a
//! bilingual title and description.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Asset entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
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
    /// File URL
    pub file_url: String,
    /// File type label (pdf, docx, ...)
    pub file_type: String,
    /// File size in bytes
    pub file_size: Option<i64>,
    /// When the asset was uploaded
    pub uploaded_on: DateTime<Utc>,
}
