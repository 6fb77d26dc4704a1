//! Category model
//!
//! Categories classify news articles. Names are bilingual; there is no
//! hierarchy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Article category entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: i64,
    /// English name
    pub name_en: String,
    /// French name
    pub name_fr: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a category
#[derive(Debug, Clone)]
pub struct CreateCategoryInput {
    pub name_en: String,
    pub name_fr: String,
}

/// Input for updating a category
#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryInput {
    pub name_en: Option<String>,
    pub name_fr: Option<String>,
}

impl UpdateCategoryInput {
    /// Check if any field is set
    pub fn has_changes(&self) -> bool {
        self.name_en.is_some() || self.name_fr.is_some()
    }
}
