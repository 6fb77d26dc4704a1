//! Fact model
//!
//! Short bilingual "did you know" blurbs rotated on the front page.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fact entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fact {
    /// Unique identifier
    pub id: i64,
    /// English text
    pub content_en: String,
    /// French text
    pub content_fr: String,
    /// Publication timestamp
    pub posted_on: DateTime<Utc>,
}
