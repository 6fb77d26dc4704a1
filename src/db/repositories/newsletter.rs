//! Newsletter repository
//!
//! Includes a free-text search across titles and bodies in both languages.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{ListParams, Newsletter};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::sync::Arc;

/// Newsletter repository trait
#[async_trait]
pub trait NewsletterRepository: Send + Sync {
    /// Create a new newsletter issue
    async fn create(&self, newsletter: &Newsletter) -> Result<Newsletter>;

    /// Get newsletter by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Newsletter>>;

    /// List newsletters, most recent first
    async fn list(&self, params: &ListParams) -> Result<(Vec<Newsletter>, i64)>;

    /// Search newsletters by title or body in either language
    async fn search(&self, query: &str, params: &ListParams) -> Result<(Vec<Newsletter>, i64)>;

    /// Update a newsletter (full row)
    async fn update(&self, newsletter: &Newsletter) -> Result<Newsletter>;

    /// Delete a newsletter
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based newsletter repository implementation
pub struct SqlxNewsletterRepository {
    pool: DynDatabasePool,
}

impl SqlxNewsletterRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn NewsletterRepository> {
        Arc::new(Self::new(pool))
    }
}

const NEWSLETTER_COLUMNS: &str =
    "id, title_en, title_fr, content_en, content_fr, published_at, created_at, updated_at";

const INSERT_SQL: &str = "INSERT INTO newsletters (title_en, title_fr, content_en, content_fr, \
     published_at, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)";

const UPDATE_SQL: &str = "UPDATE newsletters SET title_en = ?, title_fr = ?, content_en = ?, \
     content_fr = ?, published_at = ?, updated_at = ? WHERE id = ?";

const SEARCH_FILTER: &str = " WHERE (title_en LIKE ? OR title_fr LIKE ? OR content_en LIKE ? OR content_fr LIKE ?)";

#[async_trait]
impl NewsletterRepository for SqlxNewsletterRepository {
    async fn create(&self, newsletter: &Newsletter) -> Result<Newsletter> {
        let now = Utc::now();

        let id = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(INSERT_SQL)
                .bind(&newsletter.title_en)
                .bind(&newsletter.title_fr)
                .bind(&newsletter.content_en)
                .bind(&newsletter.content_fr)
                .bind(newsletter.published_at)
                .bind(now)
                .bind(now)
                .execute(self.pool.as_sqlite().unwrap())
                .await
                .context("Failed to create newsletter")?
                .last_insert_rowid(),
            DatabaseDriver::Mysql => sqlx::query(INSERT_SQL)
                .bind(&newsletter.title_en)
                .bind(&newsletter.title_fr)
                .bind(&newsletter.content_en)
                .bind(&newsletter.content_fr)
                .bind(newsletter.published_at)
                .bind(now)
                .bind(now)
                .execute(self.pool.as_mysql().unwrap())
                .await
                .context("Failed to create newsletter")?
                .last_insert_id() as i64,
        };

        Ok(Newsletter {
            id,
            created_at: now,
            updated_at: now,
            ..newsletter.clone()
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Newsletter>> {
        let sql = format!("SELECT {} FROM newsletters WHERE id = ?", NEWSLETTER_COLUMNS);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to get newsletter")?;
                Ok(row.map(|r| row_to_newsletter(&RowRef::Sqlite(&r))))
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to get newsletter")?;
                Ok(row.map(|r| row_to_newsletter(&RowRef::Mysql(&r))))
            }
        }
    }

    async fn list(&self, params: &ListParams) -> Result<(Vec<Newsletter>, i64)> {
        let count_sql = "SELECT COUNT(*) as count FROM newsletters";
        let list_sql = format!(
            "SELECT {} FROM newsletters ORDER BY created_at DESC LIMIT ? OFFSET ?",
            NEWSLETTER_COLUMNS
        );

        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let pool = self.pool.as_sqlite().unwrap();
                let total: i64 = sqlx::query(count_sql)
                    .fetch_one(pool)
                    .await
                    .context("Failed to count newsletters")?
                    .get("count");
                let rows = sqlx::query(&list_sql)
                    .bind(params.limit())
                    .bind(params.offset())
                    .fetch_all(pool)
                    .await
                    .context("Failed to list newsletters")?;
                Ok((
                    rows.iter()
                        .map(|r| row_to_newsletter(&RowRef::Sqlite(r)))
                        .collect(),
                    total,
                ))
            }
            DatabaseDriver::Mysql => {
                let pool = self.pool.as_mysql().unwrap();
                let total: i64 = sqlx::query(count_sql)
                    .fetch_one(pool)
                    .await
                    .context("Failed to count newsletters")?
                    .get("count");
                let rows = sqlx::query(&list_sql)
                    .bind(params.limit())
                    .bind(params.offset())
                    .fetch_all(pool)
                    .await
                    .context("Failed to list newsletters")?;
                Ok((
                    rows.iter()
                        .map(|r| row_to_newsletter(&RowRef::Mysql(r)))
                        .collect(),
                    total,
                ))
            }
        }
    }

    async fn search(&self, query: &str, params: &ListParams) -> Result<(Vec<Newsletter>, i64)> {
        let pattern = format!("%{}%", query);
        let count_sql = format!("SELECT COUNT(*) as count FROM newsletters{}", SEARCH_FILTER);
        let list_sql = format!(
            "SELECT {} FROM newsletters{} ORDER BY created_at DESC LIMIT ? OFFSET ?",
            NEWSLETTER_COLUMNS, SEARCH_FILTER
        );

        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let pool = self.pool.as_sqlite().unwrap();
                let total: i64 = sqlx::query(&count_sql)
                    .bind(&pattern)
                    .bind(&pattern)
                    .bind(&pattern)
                    .bind(&pattern)
                    .fetch_one(pool)
                    .await
                    .context("Failed to count newsletter search results")?
                    .get("count");
                let rows = sqlx::query(&list_sql)
                    .bind(&pattern)
                    .bind(&pattern)
                    .bind(&pattern)
                    .bind(&pattern)
                    .bind(params.limit())
                    .bind(params.offset())
                    .fetch_all(pool)
                    .await
                    .context("Failed to search newsletters")?;
                Ok((
                    rows.iter()
                        .map(|r| row_to_newsletter(&RowRef::Sqlite(r)))
                        .collect(),
                    total,
                ))
            }
            DatabaseDriver::Mysql => {
                let pool = self.pool.as_mysql().unwrap();
                let total: i64 = sqlx::query(&count_sql)
                    .bind(&pattern)
                    .bind(&pattern)
                    .bind(&pattern)
                    .bind(&pattern)
                    .fetch_one(pool)
                    .await
                    .context("Failed to count newsletter search results")?
                    .get("count");
                let rows = sqlx::query(&list_sql)
                    .bind(&pattern)
                    .bind(&pattern)
                    .bind(&pattern)
                    .bind(&pattern)
                    .bind(params.limit())
                    .bind(params.offset())
                    .fetch_all(pool)
                    .await
                    .context("Failed to search newsletters")?;
                Ok((
                    rows.iter()
                        .map(|r| row_to_newsletter(&RowRef::Mysql(r)))
                        .collect(),
                    total,
                ))
            }
        }
    }

    async fn update(&self, newsletter: &Newsletter) -> Result<Newsletter> {
        let now = Utc::now();

        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(UPDATE_SQL)
                    .bind(&newsletter.title_en)
                    .bind(&newsletter.title_fr)
                    .bind(&newsletter.content_en)
                    .bind(&newsletter.content_fr)
                    .bind(newsletter.published_at)
                    .bind(now)
                    .bind(newsletter.id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to update newsletter")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(UPDATE_SQL)
                    .bind(&newsletter.title_en)
                    .bind(&newsletter.title_fr)
                    .bind(&newsletter.content_en)
                    .bind(&newsletter.content_fr)
                    .bind(newsletter.published_at)
                    .bind(now)
                    .bind(newsletter.id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to update newsletter")?;
            }
        }

        Ok(Newsletter {
            updated_at: now,
            ..newsletter.clone()
        })
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let sql = "DELETE FROM newsletters WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to delete newsletter")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to delete newsletter")?;
            }
        }
        Ok(())
    }
}

enum RowRef<'a> {
    Sqlite(&'a sqlx::sqlite::SqliteRow),
    Mysql(&'a sqlx::mysql::MySqlRow),
}

fn row_to_newsletter(row: &RowRef<'_>) -> Newsletter {
    match row {
        RowRef::Sqlite(r) => Newsletter {
            id: r.get("id"),
            title_en: r.get("title_en"),
            title_fr: r.get("title_fr"),
            content_en: r.get("content_en"),
            content_fr: r.get("content_fr"),
            published_at: r.get("published_at"),
            created_at: r.get("created_at"),
            updated_at: r.get("updated_at"),
        },
        RowRef::Mysql(r) => Newsletter {
            id: r.get("id"),
            title_en: r.get("title_en"),
            title_fr: r.get("title_fr"),
            content_en: r.get("content_en"),
            content_fr: r.get("content_fr"),
            published_at: r.get("published_at"),
            created_at: r.get("created_at"),
            updated_at: r.get("updated_at"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> SqlxNewsletterRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxNewsletterRepository::new(pool)
    }

    fn make_newsletter(title_en: &str, content_en: &str) -> Newsletter {
        let now = Utc::now();
        Newsletter {
            id: 0,
            title_en: Some(title_en.to_string()),
            title_fr: Some(format!("{} (fr)", title_en)),
            content_en: Some(content_en.to_string()),
            content_fr: None,
            published_at: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_newsletter_crud_and_list() {
        let repo = setup().await;
        let created = repo
            .create(&make_newsletter("March issue", "Digital transformation news"))
            .await
            .unwrap();
        assert!(created.id > 0);

        let (items, total) = repo.list(&ListParams::new(1, 10)).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].title_en.as_deref(), Some("March issue"));

        repo.delete(created.id).await.unwrap();
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_newsletter_search_matches_title_and_content() {
        let repo = setup().await;
        repo.create(&make_newsletter("March issue", "Digital transformation"))
            .await
            .unwrap();
        repo.create(&make_newsletter("April issue", "Budget report"))
            .await
            .unwrap();

        let (items, total) = repo.search("Digital", &ListParams::new(1, 10)).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(items[0].title_en.as_deref(), Some("March issue"));

        let (_, total) = repo.search("issue", &ListParams::new(1, 10)).await.unwrap();
        assert_eq!(total, 2);

        let (_, total) = repo.search("missing", &ListParams::new(1, 10)).await.unwrap();
        assert_eq!(total, 0);
    }
}
