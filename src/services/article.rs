//! Article service
//!
//! Implements business logic for news articles:
//! - Validation of required bilingual fields
//! - Slug generation from both titles, with uniqueness checks
//! - Category existence checks on create and re-categorization

use crate::db::repositories::{ArticleRepository, CategoryRepository};
use crate::models::{
    Article, ArticleFilter, CreateArticleInput, Lang, ListParams, PagedResult, UpdateArticleInput,
};
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;

/// Error types for article service operations
#[derive(Debug, thiserror::Error)]
pub enum ArticleServiceError {
    /// Article not found
    #[error("Article not found")]
    NotFound,

    /// Referenced category does not exist
    #[error("Category not found")]
    CategoryNotFound,

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// An article with a colliding slug already exists
    #[error("An article with a similar title already exists")]
    DuplicateSlug,

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Article service
pub struct ArticleService {
    repo: Arc<dyn ArticleRepository>,
    category_repo: Arc<dyn CategoryRepository>,
}

impl ArticleService {
    /// Create a new article service
    pub fn new(repo: Arc<dyn ArticleRepository>, category_repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo, category_repo }
    }

    /// Create a new article.
    ///
    /// Slugs are generated from both titles. Creation fails when the
    /// category does not exist or either slug is already taken.
    pub async fn create(&self, input: CreateArticleInput) -> Result<Article, ArticleServiceError> {
        self.validate_create_input(&input)?;

        if self
            .category_repo
            .get_by_id(input.category_id)
            .await
            .context("Failed to check category")?
            .is_none()
        {
            return Err(ArticleServiceError::CategoryNotFound);
        }

        let slug_en = generate_slug(&input.title_en);
        let slug_fr = generate_slug(&input.title_fr);

        if self
            .repo
            .exists_by_slug(&slug_en, &slug_fr)
            .await
            .context("Failed to check slug uniqueness")?
        {
            return Err(ArticleServiceError::DuplicateSlug);
        }

        let now = Utc::now();
        let article = Article {
            id: 0,
            category_id: input.category_id,
            author_id: input.author_id,
            title_en: input.title_en,
            title_fr: input.title_fr,
            slug_en,
            slug_fr,
            excerpt_en: input.excerpt_en,
            excerpt_fr: input.excerpt_fr,
            content_en: input.content_en,
            content_fr: input.content_fr,
            image_url: input.image_url,
            is_featured: input.is_featured,
            published_at: now,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .repo
            .create(&article)
            .await
            .context("Failed to create article")?;

        tracing::info!("Article created by user {}: {}", created.author_id, created.id);

        Ok(created)
    }

    /// Get an article by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Article>, ArticleServiceError> {
        Ok(self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get article")?)
    }

    /// Get an article by slug in the given language
    pub async fn get_by_slug(
        &self,
        slug: &str,
        lang: Lang,
    ) -> Result<Option<Article>, ArticleServiceError> {
        Ok(self
            .repo
            .get_by_slug(slug, lang)
            .await
            .context("Failed to get article by slug")?)
    }

    /// List articles with filters and pagination
    pub async fn list(
        &self,
        filter: &ArticleFilter,
        params: &ListParams,
    ) -> Result<PagedResult<Article>, ArticleServiceError> {
        let (items, total) = self
            .repo
            .list(filter, params)
            .await
            .context("Failed to list articles")?;

        Ok(PagedResult::new(items, total, params))
    }

    /// Update an article.
    ///
    /// A changed title regenerates the matching slug; the new slug must not
    /// collide with another article. Re-categorization verifies the target
    /// category exists.
    pub async fn update(
        &self,
        id: i64,
        input: UpdateArticleInput,
    ) -> Result<Article, ArticleServiceError> {
        if !input.has_changes() {
            return Err(ArticleServiceError::ValidationError(
                "No fields to update".to_string(),
            ));
        }

        let mut article = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get article")?
            .ok_or(ArticleServiceError::NotFound)?;

        if let Some(category_id) = input.category_id {
            if category_id != article.category_id
                && self
                    .category_repo
                    .get_by_id(category_id)
                    .await
                    .context("Failed to check category")?
                    .is_none()
            {
                return Err(ArticleServiceError::CategoryNotFound);
            }
            article.category_id = category_id;
        }

        let mut slug_changed = false;
        if let Some(title_en) = input.title_en {
            if title_en.trim().is_empty() {
                return Err(ArticleServiceError::ValidationError(
                    "English title must not be empty".to_string(),
                ));
            }
            let new_slug = generate_slug(&title_en);
            slug_changed |= new_slug != article.slug_en;
            article.title_en = title_en;
            article.slug_en = new_slug;
        }
        if let Some(title_fr) = input.title_fr {
            if title_fr.trim().is_empty() {
                return Err(ArticleServiceError::ValidationError(
                    "French title must not be empty".to_string(),
                ));
            }
            let new_slug = generate_slug(&title_fr);
            slug_changed |= new_slug != article.slug_fr;
            article.title_fr = title_fr;
            article.slug_fr = new_slug;
        }

        if slug_changed {
            // The uniqueness check must not trip over the article itself
            if let Some(existing) = self
                .repo
                .get_by_slug(&article.slug_en, Lang::En)
                .await
                .context("Failed to check slug uniqueness")?
            {
                if existing.id != id {
                    return Err(ArticleServiceError::DuplicateSlug);
                }
            }
            if let Some(existing) = self
                .repo
                .get_by_slug(&article.slug_fr, Lang::Fr)
                .await
                .context("Failed to check slug uniqueness")?
            {
                if existing.id != id {
                    return Err(ArticleServiceError::DuplicateSlug);
                }
            }
        }

        if let Some(excerpt_en) = input.excerpt_en {
            article.excerpt_en = Some(excerpt_en);
        }
        if let Some(excerpt_fr) = input.excerpt_fr {
            article.excerpt_fr = Some(excerpt_fr);
        }
        if let Some(content_en) = input.content_en {
            article.content_en = content_en;
        }
        if let Some(content_fr) = input.content_fr {
            article.content_fr = content_fr;
        }
        if let Some(image_url) = input.image_url {
            article.image_url = Some(image_url);
        }
        if let Some(is_featured) = input.is_featured {
            article.is_featured = is_featured;
        }

        let updated = self
            .repo
            .update(&article)
            .await
            .context("Failed to update article")?;

        Ok(updated)
    }

    /// Delete an article
    pub async fn delete(&self, id: i64) -> Result<(), ArticleServiceError> {
        if self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get article")?
            .is_none()
        {
            return Err(ArticleServiceError::NotFound);
        }

        self.repo
            .delete(id)
            .await
            .context("Failed to delete article")?;

        Ok(())
    }

    fn validate_create_input(&self, input: &CreateArticleInput) -> Result<(), ArticleServiceError> {
        if input.title_en.trim().is_empty() || input.title_fr.trim().is_empty() {
            return Err(ArticleServiceError::ValidationError(
                "Both titles are required".to_string(),
            ));
        }
        if input.content_en.trim().is_empty() || input.content_fr.trim().is_empty() {
            return Err(ArticleServiceError::ValidationError(
                "Both content bodies are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Generate a URL-friendly slug from a title.
///
/// Lowercases, transliterates common accented Latin characters to ASCII,
/// collapses everything else to single hyphens.
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut prev_hyphen = true; // Suppress leading hyphens

    for c in title.to_lowercase().chars() {
        let mapped = match c {
            'a'..='z' | '0'..='9' => Some(c),
            'à' | 'â' | 'ä' | 'á' | 'ã' => Some('a'),
            'é' | 'è' | 'ê' | 'ë' => Some('e'),
            'î' | 'ï' | 'í' => Some('i'),
            'ô' | 'ö' | 'ó' | 'õ' => Some('o'),
            'ù' | 'û' | 'ü' | 'ú' => Some('u'),
            'ç' => Some('c'),
            'ñ' => Some('n'),
            'œ' => {
                slug.push('o');
                Some('e')
            }
            'æ' => {
                slug.push('a');
                Some('e')
            }
            _ => None,
        };

        match mapped {
            Some(c) => {
                slug.push(c);
                prev_hyphen = false;
            }
            None => {
                if !prev_hyphen {
                    slug.push('-');
                    prev_hyphen = true;
                }
            }
        }
    }

    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{
        CategoryRepository, SqlxArticleRepository, SqlxCategoryRepository, SqlxUserRepository,
        UserRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::models::{Category, User, UserRole, UserStatus};

    async fn setup() -> (ArticleService, i64, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let user = SqlxUserRepository::new(pool.clone())
            .create(&User::new(
                "author".to_string(),
                "author@example.com".to_string(),
                "Author".to_string(),
                "hash".to_string(),
                UserRole::Author,
                UserStatus::Active,
            ))
            .await
            .unwrap();

        let category_repo = SqlxCategoryRepository::new(pool.clone());
        let now = Utc::now();
        let category = category_repo
            .create(&Category {
                id: 0,
                name_en: "News".to_string(),
                name_fr: "Actualités".to_string(),
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        let service = ArticleService::new(
            SqlxArticleRepository::boxed(pool.clone()),
            SqlxCategoryRepository::boxed(pool),
        );

        (service, category.id, user.id)
    }

    fn make_input(category_id: i64, author_id: i64, title_en: &str, title_fr: &str) -> CreateArticleInput {
        CreateArticleInput {
            category_id,
            author_id,
            title_en: title_en.to_string(),
            title_fr: title_fr.to_string(),
            excerpt_en: None,
            excerpt_fr: None,
            content_en: "Body".to_string(),
            content_fr: "Corps".to_string(),
            image_url: None,
            is_featured: false,
        }
    }

    #[tokio::test]
    async fn test_create_generates_slugs() {
        let (service, category_id, author_id) = setup().await;

        let article = service
            .create(make_input(category_id, author_id, "Budget Review 2026", "Revue du Budget 2026"))
            .await
            .unwrap();

        assert_eq!(article.slug_en, "budget-review-2026");
        assert_eq!(article.slug_fr, "revue-du-budget-2026");
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_category() {
        let (service, _, author_id) = setup().await;
        let result = service
            .create(make_input(999, author_id, "Title", "Titre"))
            .await;
        assert!(matches!(result, Err(ArticleServiceError::CategoryNotFound)));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_title() {
        let (service, category_id, author_id) = setup().await;
        service
            .create(make_input(category_id, author_id, "Same Title", "Même Titre"))
            .await
            .unwrap();

        let result = service
            .create(make_input(category_id, author_id, "Same Title", "Autre Titre"))
            .await;
        assert!(matches!(result, Err(ArticleServiceError::DuplicateSlug)));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_fields() {
        let (service, category_id, author_id) = setup().await;

        let mut input = make_input(category_id, author_id, "", "Titre");
        let result = service.create(input.clone()).await;
        assert!(matches!(result, Err(ArticleServiceError::ValidationError(_))));

        input.title_en = "Title".to_string();
        input.content_fr = "  ".to_string();
        let result = service.create(input).await;
        assert!(matches!(result, Err(ArticleServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_update_title_regenerates_slug() {
        let (service, category_id, author_id) = setup().await;
        let article = service
            .create(make_input(category_id, author_id, "Original Title", "Titre Original"))
            .await
            .unwrap();

        let updated = service
            .update(
                article.id,
                UpdateArticleInput {
                    title_en: Some("Fresh Title".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.slug_en, "fresh-title");
        assert_eq!(updated.slug_fr, "titre-original");
    }

    #[tokio::test]
    async fn test_update_same_title_does_not_conflict_with_self() {
        let (service, category_id, author_id) = setup().await;
        let article = service
            .create(make_input(category_id, author_id, "Stable Title", "Titre Stable"))
            .await
            .unwrap();

        // Re-saving the same title must not report a duplicate slug
        let result = service
            .update(
                article.id,
                UpdateArticleInput {
                    title_en: Some("Stable Title".to_string()),
                    content_en: Some("New body".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_update_to_conflicting_title_fails() {
        let (service, category_id, author_id) = setup().await;
        service
            .create(make_input(category_id, author_id, "First", "Premier"))
            .await
            .unwrap();
        let second = service
            .create(make_input(category_id, author_id, "Second", "Deuxième"))
            .await
            .unwrap();

        let result = service
            .update(
                second.id,
                UpdateArticleInput {
                    title_en: Some("First".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(ArticleServiceError::DuplicateSlug)));
    }

    #[tokio::test]
    async fn test_delete_missing_article() {
        let (service, _, _) = setup().await;
        let result = service.delete(12345).await;
        assert!(matches!(result, Err(ArticleServiceError::NotFound)));
    }

    #[test]
    fn test_generate_slug_basic() {
        assert_eq!(generate_slug("Hello World"), "hello-world");
        assert_eq!(generate_slug("  Multiple   Spaces  "), "multiple-spaces");
        assert_eq!(generate_slug("Already-Hyphenated"), "already-hyphenated");
    }

    #[test]
    fn test_generate_slug_french_accents() {
        assert_eq!(generate_slug("Événements à venir"), "evenements-a-venir");
        assert_eq!(generate_slug("Ça c'est très intéressant"), "ca-c-est-tres-interessant");
        assert_eq!(generate_slug("Cœur de l'œuvre"), "coeur-de-l-oeuvre");
    }

    #[test]
    fn test_generate_slug_strips_punctuation() {
        assert_eq!(generate_slug("What's New? (2026 edition)"), "what-s-new-2026-edition");
        assert_eq!(generate_slug("100% Success!!!"), "100-success");
    }

    #[test]
    fn test_generate_slug_edge_cases() {
        assert_eq!(generate_slug(""), "");
        assert_eq!(generate_slug("???"), "");
        assert_eq!(generate_slug("---"), "");
    }

    #[cfg(test)]
    mod slug_properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(50))]

            #[test]
            fn slug_is_always_url_safe(title in ".{0,80}") {
                let slug = generate_slug(&title);
                prop_assert!(slug
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            }

            #[test]
            fn slug_has_no_hyphen_runs_or_edges(title in ".{0,80}") {
                let slug = generate_slug(&title);
                prop_assert!(!slug.contains("--"));
                prop_assert!(!slug.starts_with('-'));
                prop_assert!(!slug.ends_with('-'));
            }

            #[test]
            fn slug_is_idempotent(title in ".{0,80}") {
                let slug = generate_slug(&title);
                prop_assert_eq!(generate_slug(&slug), slug);
            }
        }
    }
}
