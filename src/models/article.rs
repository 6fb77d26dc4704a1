//! News article model
//!
//! This module provides:
//! - `Article` entity representing a bilingual news article
//! - Input types for creating and updating articles
//! - `ArticleFilter` for list queries
//!
//! Articles carry paired English/French titles, slugs, excerpts and bodies.
//! Slugs are generated from the titles and must be unique per language.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// News article entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Unique identifier
    pub id: i64,
    /// Category ID
    pub category_id: i64,
    /// Author user ID
    pub author_id: i64,
    /// English title
    pub title_en: String,
    /// French title
    pub title_fr: String,
    /// URL-friendly English slug (unique)
    pub slug_en: String,
    /// URL-friendly French slug (unique)
    pub slug_fr: String,
    /// English excerpt
    pub excerpt_en: Option<String>,
    /// French excerpt
    pub excerpt_fr: Option<String>,
    /// English body
    pub content_en: String,
    /// French body
    pub content_fr: String,
    /// Cover image URL
    pub image_url: Option<String>,
    /// Whether the article is featured on the front page
    #[serde(default)]
    pub is_featured: bool,
    /// Publication timestamp
    pub published_at: DateTime<Utc>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new article
#[derive(Debug, Clone)]
pub struct CreateArticleInput {
    pub category_id: i64,
    pub author_id: i64,
    pub title_en: String,
    pub title_fr: String,
    pub excerpt_en: Option<String>,
    pub excerpt_fr: Option<String>,
    pub content_en: String,
    pub content_fr: String,
    pub image_url: Option<String>,
    pub is_featured: bool,
}

/// Input for updating an existing article.
///
/// Only set fields are written; updating a title regenerates the matching
/// slug.
#[derive(Debug, Clone, Default)]
pub struct UpdateArticleInput {
    pub category_id: Option<i64>,
    pub title_en: Option<String>,
    pub title_fr: Option<String>,
    pub excerpt_en: Option<String>,
    pub excerpt_fr: Option<String>,
    pub content_en: Option<String>,
    pub content_fr: Option<String>,
    pub image_url: Option<String>,
    pub is_featured: Option<bool>,
}

impl UpdateArticleInput {
    /// Check if any field is set
    pub fn has_changes(&self) -> bool {
        self.category_id.is_some()
            || self.title_en.is_some()
            || self.title_fr.is_some()
            || self.excerpt_en.is_some()
            || self.excerpt_fr.is_some()
            || self.content_en.is_some()
            || self.content_fr.is_some()
            || self.image_url.is_some()
            || self.is_featured.is_some()
    }
}

/// Filters for article list queries
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    /// Restrict to a category
    pub category_id: Option<i64>,
    /// Restrict to featured / non-featured articles
    pub is_featured: Option<bool>,
    /// Restrict to an author
    pub author_id: Option<i64>,
}

impl ArticleFilter {
    /// Check if no filter is applied
    pub fn is_empty(&self) -> bool {
        self.category_id.is_none() && self.is_featured.is_none() && self.author_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_input_has_changes() {
        assert!(!UpdateArticleInput::default().has_changes());

        let input = UpdateArticleInput {
            title_en: Some("New title".to_string()),
            ..Default::default()
        };
        assert!(input.has_changes());

        let input = UpdateArticleInput {
            is_featured: Some(true),
            ..Default::default()
        };
        assert!(input.has_changes());
    }

    #[test]
    fn test_filter_is_empty() {
        assert!(ArticleFilter::default().is_empty());
        let filter = ArticleFilter {
            category_id: Some(1),
            ..Default::default()
        };
        assert!(!filter.is_empty());
    }
}
