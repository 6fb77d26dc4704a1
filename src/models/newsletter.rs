//! Newsletter model
//!
//! Newsletter issues published on the site. All fields are optional so
//! drafts can be saved incrementally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Newsletter issue entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Newsletter {
    /// Unique identifier
    pub id: i64,
    /// English title
    pub title_en: Option<String>,
    /// French title
    pub title_fr: Option<String>,
    /// English body
    pub content_en: Option<String>,
    /// French body
    pub content_fr: Option<String>,
    /// Publication timestamp
    pub published_at: Option<DateTime<Utc>>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}
