//! Article repository
//!
//! Database operations for news articles, including filtered, paginated
//! listings and per-language slug lookups.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Article, ArticleFilter, Lang, ListParams};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Article repository trait
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Create a new article
    async fn create(&self, article: &Article) -> Result<Article>;

    /// Get article by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Article>>;

    /// Get article by slug in the given language
    async fn get_by_slug(&self, slug: &str, lang: Lang) -> Result<Option<Article>>;

    /// Check whether either slug is already taken
    async fn exists_by_slug(&self, slug_en: &str, slug_fr: &str) -> Result<bool>;

    /// List articles matching the filter, most recently published first
    async fn list(&self, filter: &ArticleFilter, params: &ListParams) -> Result<(Vec<Article>, i64)>;

    /// Update an article (full row)
    async fn update(&self, article: &Article) -> Result<Article>;

    /// Delete an article
    async fn delete(&self, id: i64) -> Result<()>;

    /// Count articles in a category
    async fn count_by_category(&self, category_id: i64) -> Result<i64>;
}

/// SQLx-based article repository implementation
pub struct SqlxArticleRepository {
    pool: DynDatabasePool,
}

impl SqlxArticleRepository {
    /// Create a new SQLx article repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ArticleRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ArticleRepository for SqlxArticleRepository {
    async fn create(&self, article: &Article) -> Result<Article> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_sqlite(self.pool.as_sqlite().unwrap(), article).await,
            DatabaseDriver::Mysql => create_mysql(self.pool.as_mysql().unwrap(), article).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Article>> {
        let sql = format!("SELECT {} FROM articles WHERE id = ?", ARTICLE_COLUMNS);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to get article by ID")?;
                row.map(|r| row_to_article_sqlite(&r)).transpose()
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to get article by ID")?;
                row.map(|r| row_to_article_mysql(&r)).transpose()
            }
        }
    }

    async fn get_by_slug(&self, slug: &str, lang: Lang) -> Result<Option<Article>> {
        let slug_column = match lang {
            Lang::En => "slug_en",
            Lang::Fr => "slug_fr",
        };
        let sql = format!(
            "SELECT {} FROM articles WHERE {} = ?",
            ARTICLE_COLUMNS, slug_column
        );
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(slug)
                    .fetch_optional(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to get article by slug")?;
                row.map(|r| row_to_article_sqlite(&r)).transpose()
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(slug)
                    .fetch_optional(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to get article by slug")?;
                row.map(|r| row_to_article_mysql(&r)).transpose()
            }
        }
    }

    async fn exists_by_slug(&self, slug_en: &str, slug_fr: &str) -> Result<bool> {
        let sql = "SELECT COUNT(*) as count FROM articles WHERE slug_en = ? OR slug_fr = ?";
        let count: i64 = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(sql)
                .bind(slug_en)
                .bind(slug_fr)
                .fetch_one(self.pool.as_sqlite().unwrap())
                .await
                .context("Failed to check slug uniqueness")?
                .get("count"),
            DatabaseDriver::Mysql => sqlx::query(sql)
                .bind(slug_en)
                .bind(slug_fr)
                .fetch_one(self.pool.as_mysql().unwrap())
                .await
                .context("Failed to check slug uniqueness")?
                .get("count"),
        };
        Ok(count > 0)
    }

    async fn list(&self, filter: &ArticleFilter, params: &ListParams) -> Result<(Vec<Article>, i64)> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_sqlite(self.pool.as_sqlite().unwrap(), filter, params).await,
            DatabaseDriver::Mysql => list_mysql(self.pool.as_mysql().unwrap(), filter, params).await,
        }
    }

    async fn update(&self, article: &Article) -> Result<Article> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => update_sqlite(self.pool.as_sqlite().unwrap(), article).await,
            DatabaseDriver::Mysql => update_mysql(self.pool.as_mysql().unwrap(), article).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let sql = "DELETE FROM articles WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to delete article")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to delete article")?;
            }
        }
        Ok(())
    }

    async fn count_by_category(&self, category_id: i64) -> Result<i64> {
        let sql = "SELECT COUNT(*) as count FROM articles WHERE category_id = ?";
        let count: i64 = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(sql)
                .bind(category_id)
                .fetch_one(self.pool.as_sqlite().unwrap())
                .await
                .context("Failed to count articles by category")?
                .get("count"),
            DatabaseDriver::Mysql => sqlx::query(sql)
                .bind(category_id)
                .fetch_one(self.pool.as_mysql().unwrap())
                .await
                .context("Failed to count articles by category")?
                .get("count"),
        };
        Ok(count)
    }
}

const ARTICLE_COLUMNS: &str = "id, category_id, author_id, title_en, title_fr, slug_en, slug_fr, \
     excerpt_en, excerpt_fr, content_en, content_fr, image_url, is_featured, \
     published_at, created_at, updated_at";

/// Build the WHERE clause for a filter. Bind values in the same order the
/// conditions are pushed.
fn filter_where_clause(filter: &ArticleFilter) -> String {
    let mut conditions = Vec::new();
    if filter.category_id.is_some() {
        conditions.push("category_id = ?");
    }
    if filter.is_featured.is_some() {
        conditions.push("is_featured = ?");
    }
    if filter.author_id.is_some() {
        conditions.push("author_id = ?");
    }
    if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_sqlite(pool: &SqlitePool, article: &Article) -> Result<Article> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO articles (category_id, author_id, title_en, title_fr, slug_en, slug_fr,
                              excerpt_en, excerpt_fr, content_en, content_fr, image_url,
                              is_featured, published_at, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(article.category_id)
    .bind(article.author_id)
    .bind(&article.title_en)
    .bind(&article.title_fr)
    .bind(&article.slug_en)
    .bind(&article.slug_fr)
    .bind(&article.excerpt_en)
    .bind(&article.excerpt_fr)
    .bind(&article.content_en)
    .bind(&article.content_fr)
    .bind(&article.image_url)
    .bind(article.is_featured)
    .bind(article.published_at)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create article")?;

    Ok(Article {
        id: result.last_insert_rowid(),
        created_at: now,
        updated_at: now,
        ..article.clone()
    })
}

async fn list_sqlite(
    pool: &SqlitePool,
    filter: &ArticleFilter,
    params: &ListParams,
) -> Result<(Vec<Article>, i64)> {
    let where_clause = filter_where_clause(filter);

    let count_sql = format!("SELECT COUNT(*) as count FROM articles{}", where_clause);
    let mut count_query = sqlx::query(&count_sql);
    if let Some(category_id) = filter.category_id {
        count_query = count_query.bind(category_id);
    }
    if let Some(is_featured) = filter.is_featured {
        count_query = count_query.bind(is_featured);
    }
    if let Some(author_id) = filter.author_id {
        count_query = count_query.bind(author_id);
    }
    let total: i64 = count_query
        .fetch_one(pool)
        .await
        .context("Failed to count articles")?
        .get("count");

    let list_sql = format!(
        "SELECT {} FROM articles{} ORDER BY published_at DESC LIMIT ? OFFSET ?",
        ARTICLE_COLUMNS, where_clause
    );
    let mut list_query = sqlx::query(&list_sql);
    if let Some(category_id) = filter.category_id {
        list_query = list_query.bind(category_id);
    }
    if let Some(is_featured) = filter.is_featured {
        list_query = list_query.bind(is_featured);
    }
    if let Some(author_id) = filter.author_id {
        list_query = list_query.bind(author_id);
    }
    let rows = list_query
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(pool)
        .await
        .context("Failed to list articles")?;

    let articles = rows
        .iter()
        .map(row_to_article_sqlite)
        .collect::<Result<Vec<_>>>()?;

    Ok((articles, total))
}

async fn update_sqlite(pool: &SqlitePool, article: &Article) -> Result<Article> {
    let now = Utc::now();

    sqlx::query(
        r#"
        UPDATE articles
        SET category_id = ?, title_en = ?, title_fr = ?, slug_en = ?, slug_fr = ?,
            excerpt_en = ?, excerpt_fr = ?, content_en = ?, content_fr = ?,
            image_url = ?, is_featured = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(article.category_id)
    .bind(&article.title_en)
    .bind(&article.title_fr)
    .bind(&article.slug_en)
    .bind(&article.slug_fr)
    .bind(&article.excerpt_en)
    .bind(&article.excerpt_fr)
    .bind(&article.content_en)
    .bind(&article.content_fr)
    .bind(&article.image_url)
    .bind(article.is_featured)
    .bind(now)
    .bind(article.id)
    .execute(pool)
    .await
    .context("Failed to update article")?;

    Ok(Article {
        updated_at: now,
        ..article.clone()
    })
}

fn row_to_article_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Article> {
    Ok(Article {
        id: row.get("id"),
        category_id: row.get("category_id"),
        author_id: row.get("author_id"),
        title_en: row.get("title_en"),
        title_fr: row.get("title_fr"),
        slug_en: row.get("slug_en"),
        slug_fr: row.get("slug_fr"),
        excerpt_en: row.get("excerpt_en"),
        excerpt_fr: row.get("excerpt_fr"),
        content_en: row.get("content_en"),
        content_fr: row.get("content_fr"),
        image_url: row.get("image_url"),
        is_featured: row.get("is_featured"),
        published_at: row.get("published_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_mysql(pool: &MySqlPool, article: &Article) -> Result<Article> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO articles (category_id, author_id, title_en, title_fr, slug_en, slug_fr,
                              excerpt_en, excerpt_fr, content_en, content_fr, image_url,
                              is_featured, published_at, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(article.category_id)
    .bind(article.author_id)
    .bind(&article.title_en)
    .bind(&article.title_fr)
    .bind(&article.slug_en)
    .bind(&article.slug_fr)
    .bind(&article.excerpt_en)
    .bind(&article.excerpt_fr)
    .bind(&article.content_en)
    .bind(&article.content_fr)
    .bind(&article.image_url)
    .bind(article.is_featured)
    .bind(article.published_at)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create article")?;

    Ok(Article {
        id: result.last_insert_id() as i64,
        created_at: now,
        updated_at: now,
        ..article.clone()
    })
}

async fn list_mysql(
    pool: &MySqlPool,
    filter: &ArticleFilter,
    params: &ListParams,
) -> Result<(Vec<Article>, i64)> {
    let where_clause = filter_where_clause(filter);

    let count_sql = format!("SELECT COUNT(*) as count FROM articles{}", where_clause);
    let mut count_query = sqlx::query(&count_sql);
    if let Some(category_id) = filter.category_id {
        count_query = count_query.bind(category_id);
    }
    if let Some(is_featured) = filter.is_featured {
        count_query = count_query.bind(is_featured);
    }
    if let Some(author_id) = filter.author_id {
        count_query = count_query.bind(author_id);
    }
    let total: i64 = count_query
        .fetch_one(pool)
        .await
        .context("Failed to count articles")?
        .get("count");

    let list_sql = format!(
        "SELECT {} FROM articles{} ORDER BY published_at DESC LIMIT ? OFFSET ?",
        ARTICLE_COLUMNS, where_clause
    );
    let mut list_query = sqlx::query(&list_sql);
    if let Some(category_id) = filter.category_id {
        list_query = list_query.bind(category_id);
    }
    if let Some(is_featured) = filter.is_featured {
        list_query = list_query.bind(is_featured);
    }
    if let Some(author_id) = filter.author_id {
        list_query = list_query.bind(author_id);
    }
    let rows = list_query
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(pool)
        .await
        .context("Failed to list articles")?;

    let articles = rows
        .iter()
        .map(row_to_article_mysql)
        .collect::<Result<Vec<_>>>()?;

    Ok((articles, total))
}

async fn update_mysql(pool: &MySqlPool, article: &Article) -> Result<Article> {
    let now = Utc::now();

    sqlx::query(
        r#"
        UPDATE articles
        SET category_id = ?, title_en = ?, title_fr = ?, slug_en = ?, slug_fr = ?,
            excerpt_en = ?, excerpt_fr = ?, content_en = ?, content_fr = ?,
            image_url = ?, is_featured = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(article.category_id)
    .bind(&article.title_en)
    .bind(&article.title_fr)
    .bind(&article.slug_en)
    .bind(&article.slug_fr)
    .bind(&article.excerpt_en)
    .bind(&article.excerpt_fr)
    .bind(&article.content_en)
    .bind(&article.content_fr)
    .bind(&article.image_url)
    .bind(article.is_featured)
    .bind(now)
    .bind(article.id)
    .execute(pool)
    .await
    .context("Failed to update article")?;

    Ok(Article {
        updated_at: now,
        ..article.clone()
    })
}

fn row_to_article_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Article> {
    Ok(Article {
        id: row.get("id"),
        category_id: row.get("category_id"),
        author_id: row.get("author_id"),
        title_en: row.get("title_en"),
        title_fr: row.get("title_fr"),
        slug_en: row.get("slug_en"),
        slug_fr: row.get("slug_fr"),
        excerpt_en: row.get("excerpt_en"),
        excerpt_fr: row.get("excerpt_fr"),
        content_en: row.get("content_en"),
        content_fr: row.get("content_fr"),
        image_url: row.get("image_url"),
        is_featured: row.get("is_featured"),
        published_at: row.get("published_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{CategoryRepository, SqlxCategoryRepository, SqlxUserRepository, UserRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::{Category, User, UserRole, UserStatus};

    async fn setup() -> (SqlxArticleRepository, i64, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let user_repo = SqlxUserRepository::new(pool.clone());
        let user = user_repo
            .create(&User::new(
                "author".to_string(),
                "author@example.com".to_string(),
                "Author".to_string(),
                "hash".to_string(),
                UserRole::Author,
                UserStatus::Active,
            ))
            .await
            .expect("Failed to create author");

        let category_repo = SqlxCategoryRepository::new(pool.clone());
        let category = category_repo
            .create(&Category {
                id: 0,
                name_en: "News".to_string(),
                name_fr: "Actualités".to_string(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await
            .expect("Failed to create category");

        (SqlxArticleRepository::new(pool), category.id, user.id)
    }

    fn make_article(category_id: i64, author_id: i64, n: u32) -> Article {
        let now = Utc::now();
        Article {
            id: 0,
            category_id,
            author_id,
            title_en: format!("Title {}", n),
            title_fr: format!("Titre {}", n),
            slug_en: format!("title-{}", n),
            slug_fr: format!("titre-{}", n),
            excerpt_en: None,
            excerpt_fr: None,
            content_en: "Body".to_string(),
            content_fr: "Corps".to_string(),
            image_url: None,
            is_featured: n % 2 == 0,
            published_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_article() {
        let (repo, category_id, author_id) = setup().await;
        let created = repo
            .create(&make_article(category_id, author_id, 1))
            .await
            .expect("Failed to create article");

        assert!(created.id > 0);

        let found = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.title_en, "Title 1");
        assert_eq!(found.slug_fr, "titre-1");
    }

    #[tokio::test]
    async fn test_get_by_slug_per_language() {
        let (repo, category_id, author_id) = setup().await;
        repo.create(&make_article(category_id, author_id, 1))
            .await
            .unwrap();

        let en = repo.get_by_slug("title-1", Lang::En).await.unwrap();
        assert!(en.is_some());

        let fr = repo.get_by_slug("titre-1", Lang::Fr).await.unwrap();
        assert!(fr.is_some());

        // French slug does not resolve through the English column
        let cross = repo.get_by_slug("titre-1", Lang::En).await.unwrap();
        assert!(cross.is_none());
    }

    #[tokio::test]
    async fn test_exists_by_slug() {
        let (repo, category_id, author_id) = setup().await;
        repo.create(&make_article(category_id, author_id, 1))
            .await
            .unwrap();

        assert!(repo.exists_by_slug("title-1", "other").await.unwrap());
        assert!(repo.exists_by_slug("other", "titre-1").await.unwrap());
        assert!(!repo.exists_by_slug("other", "autre").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_with_filters_and_pagination() {
        let (repo, category_id, author_id) = setup().await;
        for n in 1..=5 {
            repo.create(&make_article(category_id, author_id, n))
                .await
                .unwrap();
        }

        let params = ListParams::new(1, 2);
        let (items, total) = repo.list(&ArticleFilter::default(), &params).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(total, 5);

        let filter = ArticleFilter {
            is_featured: Some(true),
            ..Default::default()
        };
        let (featured, total) = repo.list(&filter, &ListParams::new(1, 10)).await.unwrap();
        assert_eq!(total, 2); // n = 2 and n = 4
        assert!(featured.iter().all(|a| a.is_featured));

        let filter = ArticleFilter {
            author_id: Some(author_id + 999),
            ..Default::default()
        };
        let (_, total) = repo.list(&filter, &ListParams::new(1, 10)).await.unwrap();
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_update_article() {
        let (repo, category_id, author_id) = setup().await;
        let mut created = repo
            .create(&make_article(category_id, author_id, 1))
            .await
            .unwrap();

        created.title_en = "Updated".to_string();
        created.is_featured = true;
        repo.update(&created).await.unwrap();

        let found = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.title_en, "Updated");
        assert!(found.is_featured);
    }

    #[tokio::test]
    async fn test_delete_article_and_count_by_category() {
        let (repo, category_id, author_id) = setup().await;
        let created = repo
            .create(&make_article(category_id, author_id, 1))
            .await
            .unwrap();

        assert_eq!(repo.count_by_category(category_id).await.unwrap(), 1);

        repo.delete(created.id).await.unwrap();
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
        assert_eq!(repo.count_by_category(category_id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected_by_constraint() {
        let (repo, category_id, author_id) = setup().await;
        repo.create(&make_article(category_id, author_id, 1))
            .await
            .unwrap();
        let result = repo.create(&make_article(category_id, author_id, 1)).await;
        assert!(result.is_err(), "Duplicate slugs must violate uniqueness");
    }
}
