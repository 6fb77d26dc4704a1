//! E-book model
//!
//! Downloadable publications. The file itself lives in the uploads tree;
//! `file_url` points at it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// E-book entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ebook {
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
    /// Author name as printed on the English edition
    pub author_en: Option<String>,
    /// Author name as printed on the French edition
    pub author_fr: Option<String>,
    /// Cover image URL
    pub cover_url: Option<String>,
    /// Document file URL
    pub file_url: String,
    /// File size in bytes
    pub file_size: Option<i64>,
    /// Page count
    pub pages: Option<i32>,
    /// Original publication date
    pub published_date: Option<DateTime<Utc>>,
    /// When the e-book was added
    pub added_on: DateTime<Utc>,
}
