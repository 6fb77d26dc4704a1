//! Leadership message models
//!
//! Two editorial messages are published on the site: a word from the
//! director and a word from the finance minister. Both keep a history of
//! revisions; the most recently created row is the one displayed ("active").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message from the institution's director
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectorMessage {
    /// Unique identifier
    pub id: i64,
    /// Director's name
    pub director_name: Option<String>,
    /// English title
    pub title_en: Option<String>,
    /// French title
    pub title_fr: Option<String>,
    /// English excerpt
    pub excerpt_en: Option<String>,
    /// French excerpt
    pub excerpt_fr: Option<String>,
    /// English body
    pub content_en: Option<String>,
    /// French body
    pub content_fr: Option<String>,
    /// Portrait image URL
    pub image_url: Option<String>,
    /// X (Twitter) profile
    pub x: Option<String>,
    /// LinkedIn profile
    pub linkedin: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or updating a director message
#[derive(Debug, Clone, Default)]
pub struct DirectorMessageInput {
    pub director_name: Option<String>,
    pub title_en: Option<String>,
    pub title_fr: Option<String>,
    pub excerpt_en: Option<String>,
    pub excerpt_fr: Option<String>,
    pub content_en: Option<String>,
    pub content_fr: Option<String>,
    pub image_url: Option<String>,
    pub x: Option<String>,
    pub linkedin: Option<String>,
    pub email: Option<String>,
}

/// Message from the finance minister
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinisterMessage {
    /// Unique identifier
    pub id: i64,
    /// Minister's name
    pub minister_name: Option<String>,
    /// English body
    pub content_en: Option<String>,
    /// French body
    pub content_fr: Option<String>,
    /// Portrait image URL
    pub image_url: Option<String>,
    /// Contact phone
    pub telephone: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Ministry website
    pub website: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or updating a minister message
#[derive(Debug, Clone, Default)]
pub struct MinisterMessageInput {
    pub minister_name: Option<String>,
    pub content_en: Option<String>,
    pub content_fr: Option<String>,
    pub image_url: Option<String>,
    pub telephone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}
