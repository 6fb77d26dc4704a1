//! Category service
//!
//! Categories are tiny and read on every article listing, so the full
//! list is cached. A category with articles cannot be deleted.

use crate::cache::{CacheLayer, MemoryCache};
use crate::db::repositories::{ArticleRepository, CategoryRepository};
use crate::models::{Category, CreateCategoryInput, UpdateCategoryInput};
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

/// Cache key for the category list
const CACHE_KEY_LIST: &str = "categories:list";

/// Cache TTL for the category list (10 minutes)
const CATEGORY_CACHE_TTL_SECS: u64 = 600;

/// Error types for category service operations
#[derive(Debug, thiserror::Error)]
pub enum CategoryServiceError {
    /// Category not found
    #[error("Category not found")]
    NotFound,

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Category still referenced by articles
    #[error("Category has {0} article(s) and cannot be deleted")]
    HasArticles(i64),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Category service
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
    article_repo: Arc<dyn ArticleRepository>,
    cache: Arc<MemoryCache>,
}

impl CategoryService {
    /// Create a new category service
    pub fn new(
        repo: Arc<dyn CategoryRepository>,
        article_repo: Arc<dyn ArticleRepository>,
        cache: Arc<MemoryCache>,
    ) -> Self {
        Self {
            repo,
            article_repo,
            cache,
        }
    }

    /// List all categories (cached)
    pub async fn list(&self) -> Result<Vec<Category>, CategoryServiceError> {
        if let Ok(Some(cached)) = self.cache.get::<Vec<Category>>(CACHE_KEY_LIST).await {
            return Ok(cached);
        }

        let categories = self
            .repo
            .list()
            .await
            .context("Failed to list categories")?;

        if let Err(e) = self
            .cache
            .set(
                CACHE_KEY_LIST,
                &categories,
                Duration::from_secs(CATEGORY_CACHE_TTL_SECS),
            )
            .await
        {
            tracing::warn!("Failed to cache category list: {}", e);
        }

        Ok(categories)
    }

    /// Get a category by ID
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Category>, CategoryServiceError> {
        Ok(self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get category")?)
    }

    /// Create a new category
    pub async fn create(&self, input: CreateCategoryInput) -> Result<Category, CategoryServiceError> {
        if input.name_en.trim().is_empty() || input.name_fr.trim().is_empty() {
            return Err(CategoryServiceError::ValidationError(
                "Both names are required".to_string(),
            ));
        }

        let now = Utc::now();
        let category = Category {
            id: 0,
            name_en: input.name_en,
            name_fr: input.name_fr,
            created_at: now,
            updated_at: now,
        };

        let created = self
            .repo
            .create(&category)
            .await
            .context("Failed to create category")?;

        self.invalidate_cache().await;

        Ok(created)
    }

    /// Update a category
    pub async fn update(
        &self,
        id: i64,
        input: UpdateCategoryInput,
    ) -> Result<Category, CategoryServiceError> {
        if !input.has_changes() {
            return Err(CategoryServiceError::ValidationError(
                "No fields to update".to_string(),
            ));
        }

        let mut category = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get category")?
            .ok_or(CategoryServiceError::NotFound)?;

        if let Some(name_en) = input.name_en {
            if name_en.trim().is_empty() {
                return Err(CategoryServiceError::ValidationError(
                    "English name must not be empty".to_string(),
                ));
            }
            category.name_en = name_en;
        }
        if let Some(name_fr) = input.name_fr {
            if name_fr.trim().is_empty() {
                return Err(CategoryServiceError::ValidationError(
                    "French name must not be empty".to_string(),
                ));
            }
            category.name_fr = name_fr;
        }

        let updated = self
            .repo
            .update(&category)
            .await
            .context("Failed to update category")?;

        self.invalidate_cache().await;

        Ok(updated)
    }

    /// Delete a category.
    ///
    /// Fails when any article still references it.
    pub async fn delete(&self, id: i64) -> Result<(), CategoryServiceError> {
        if self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get category")?
            .is_none()
        {
            return Err(CategoryServiceError::NotFound);
        }

        let article_count = self
            .article_repo
            .count_by_category(id)
            .await
            .context("Failed to count articles in category")?;

        if article_count > 0 {
            return Err(CategoryServiceError::HasArticles(article_count));
        }

        self.repo
            .delete(id)
            .await
            .context("Failed to delete category")?;

        self.invalidate_cache().await;

        Ok(())
    }

    async fn invalidate_cache(&self) {
        if let Err(e) = self.cache.delete(CACHE_KEY_LIST).await {
            tracing::warn!("Failed to invalidate category cache: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{ArticleRepository, SqlxArticleRepository, SqlxCategoryRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::Article;

    async fn setup() -> (CategoryService, crate::db::DynDatabasePool) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let service = CategoryService::new(
            SqlxCategoryRepository::boxed(pool.clone()),
            SqlxArticleRepository::boxed(pool.clone()),
            Arc::new(MemoryCache::new()),
        );
        (service, pool)
    }

    fn input(name_en: &str, name_fr: &str) -> CreateCategoryInput {
        CreateCategoryInput {
            name_en: name_en.to_string(),
            name_fr: name_fr.to_string(),
        }
    }

    #[tokio::test]
    async fn test_category_create_and_list() {
        let (service, _pool) = setup().await;

        service.create(input("News", "Actualités")).await.unwrap();
        service.create(input("Events", "Événements")).await.unwrap();

        let all = service.list().await.unwrap();
        assert_eq!(all.len(), 2);

        // Second call is served from cache and still correct
        let cached = service.list().await.unwrap();
        assert_eq!(cached.len(), 2);
    }

    #[tokio::test]
    async fn test_category_create_validation() {
        let (service, _pool) = setup().await;
        let result = service.create(input("", "Actualités")).await;
        assert!(matches!(result, Err(CategoryServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_category_update_invalidates_cache() {
        let (service, _pool) = setup().await;
        let created = service.create(input("News", "Actualités")).await.unwrap();

        // Warm the cache
        service.list().await.unwrap();

        service
            .update(
                created.id,
                UpdateCategoryInput {
                    name_en: Some("Latest News".to_string()),
                    name_fr: None,
                },
            )
            .await
            .unwrap();

        let all = service.list().await.unwrap();
        assert_eq!(all[0].name_en, "Latest News");
    }

    #[tokio::test]
    async fn test_category_update_missing() {
        let (service, _pool) = setup().await;
        let result = service
            .update(
                999,
                UpdateCategoryInput {
                    name_en: Some("X".to_string()),
                    name_fr: None,
                },
            )
            .await;
        assert!(matches!(result, Err(CategoryServiceError::NotFound)));
    }

    #[tokio::test]
    async fn test_category_delete_blocked_by_articles() {
        let (service, pool) = setup().await;
        let category = service.create(input("News", "Actualités")).await.unwrap();

        // Put an article in the category
        let user = crate::db::repositories::SqlxUserRepository::new(pool.clone());
        use crate::db::repositories::UserRepository;
        let author = user
            .create(&crate::models::User::new(
                "author".to_string(),
                "author@example.com".to_string(),
                "Author".to_string(),
                "hash".to_string(),
                crate::models::UserRole::Author,
                crate::models::UserStatus::Active,
            ))
            .await
            .unwrap();

        let now = Utc::now();
        let article_repo = SqlxArticleRepository::new(pool);
        article_repo
            .create(&Article {
                id: 0,
                category_id: category.id,
                author_id: author.id,
                title_en: "T".to_string(),
                title_fr: "T fr".to_string(),
                slug_en: "t".to_string(),
                slug_fr: "t-fr".to_string(),
                excerpt_en: None,
                excerpt_fr: None,
                content_en: "c".to_string(),
                content_fr: "c".to_string(),
                image_url: None,
                is_featured: false,
                published_at: now,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        let result = service.delete(category.id).await;
        assert!(matches!(result, Err(CategoryServiceError::HasArticles(1))));
    }

    #[tokio::test]
    async fn test_category_delete_empty() {
        let (service, _pool) = setup().await;
        let category = service.create(input("News", "Actualités")).await.unwrap();
        service.delete(category.id).await.unwrap();
        assert!(service.get_by_id(category.id).await.unwrap().is_none());
    }
}
