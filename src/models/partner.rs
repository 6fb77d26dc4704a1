//! Partner model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Partner organization entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partner {
    /// Unique identifier
    pub id: i64,
    /// English name
    pub name_en: String,
    /// French name
    pub name_fr: String,
    /// English description
    pub description_en: Option<String>,
    /// French description
    pub description_fr: Option<String>,
    /// Logo image URL
    pub logo_url: String,
    /// Partner website
    pub website: Option<String>,
    /// When the partner was added
    pub added_on: DateTime<Utc>,
}
