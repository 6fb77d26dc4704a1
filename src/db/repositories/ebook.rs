//! E-book repository
//!
//! Includes a language-aware search over titles and author names.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Ebook, Lang, ListParams};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::sync::Arc;

/// E-book repository trait
#[async_trait]
pub trait EbookRepository: Send + Sync {
    /// Create a new e-book
    async fn create(&self, ebook: &Ebook) -> Result<Ebook>;

    /// Get e-book by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Ebook>>;

    /// List e-books, most recently added first
    async fn list(&self, params: &ListParams) -> Result<(Vec<Ebook>, i64)>;

    /// Search e-books by title or author in the given language
    async fn search(
        &self,
        query: &str,
        lang: Lang,
        params: &ListParams,
    ) -> Result<(Vec<Ebook>, i64)>;

    /// Update an e-book (full row)
    async fn update(&self, ebook: &Ebook) -> Result<Ebook>;

    /// Delete an e-book
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based e-book repository implementation
pub struct SqlxEbookRepository {
    pool: DynDatabasePool,
}

impl SqlxEbookRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn EbookRepository> {
        Arc::new(Self::new(pool))
    }
}

const EBOOK_COLUMNS: &str = "id, title_en, title_fr, description_en, description_fr, author_en, \
     author_fr, cover_url, file_url, file_size, pages, published_date, added_on";

const INSERT_SQL: &str = "INSERT INTO ebooks (title_en, title_fr, description_en, description_fr, \
     author_en, author_fr, cover_url, file_url, file_size, pages, published_date, added_on) \
     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

const UPDATE_SQL: &str = "UPDATE ebooks SET title_en = ?, title_fr = ?, description_en = ?, \
     description_fr = ?, author_en = ?, author_fr = ?, cover_url = ?, file_url = ?, \
     file_size = ?, pages = ?, published_date = ? WHERE id = ?";

fn search_filter(lang: Lang) -> &'static str {
    match lang {
        Lang::En => " WHERE (title_en LIKE ? OR author_en LIKE ?)",
        Lang::Fr => " WHERE (title_fr LIKE ? OR author_fr LIKE ?)",
    }
}

#[async_trait]
impl EbookRepository for SqlxEbookRepository {
    async fn create(&self, ebook: &Ebook) -> Result<Ebook> {
        let now = Utc::now();

        let id = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(INSERT_SQL)
                .bind(&ebook.title_en)
                .bind(&ebook.title_fr)
                .bind(&ebook.description_en)
                .bind(&ebook.description_fr)
                .bind(&ebook.author_en)
                .bind(&ebook.author_fr)
                .bind(&ebook.cover_url)
                .bind(&ebook.file_url)
                .bind(ebook.file_size)
                .bind(ebook.pages)
                .bind(ebook.published_date)
                .bind(now)
                .execute(self.pool.as_sqlite().unwrap())
                .await
                .context("Failed to create ebook")?
                .last_insert_rowid(),
            DatabaseDriver::Mysql => sqlx::query(INSERT_SQL)
                .bind(&ebook.title_en)
                .bind(&ebook.title_fr)
                .bind(&ebook.description_en)
                .bind(&ebook.description_fr)
                .bind(&ebook.author_en)
                .bind(&ebook.author_fr)
                .bind(&ebook.cover_url)
                .bind(&ebook.file_url)
                .bind(ebook.file_size)
                .bind(ebook.pages)
                .bind(ebook.published_date)
                .bind(now)
                .execute(self.pool.as_mysql().unwrap())
                .await
                .context("Failed to create ebook")?
                .last_insert_id() as i64,
        };

        Ok(Ebook {
            id,
            added_on: now,
            ..ebook.clone()
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Ebook>> {
        let sql = format!("SELECT {} FROM ebooks WHERE id = ?", EBOOK_COLUMNS);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to get ebook")?;
                Ok(row.map(|r| row_to_ebook(&RowRef::Sqlite(&r))))
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to get ebook")?;
                Ok(row.map(|r| row_to_ebook(&RowRef::Mysql(&r))))
            }
        }
    }

    async fn list(&self, params: &ListParams) -> Result<(Vec<Ebook>, i64)> {
        let count_sql = "SELECT COUNT(*) as count FROM ebooks";
        let list_sql = format!(
            "SELECT {} FROM ebooks ORDER BY added_on DESC LIMIT ? OFFSET ?",
            EBOOK_COLUMNS
        );

        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let pool = self.pool.as_sqlite().unwrap();
                let total: i64 = sqlx::query(count_sql)
                    .fetch_one(pool)
                    .await
                    .context("Failed to count ebooks")?
                    .get("count");
                let rows = sqlx::query(&list_sql)
                    .bind(params.limit())
                    .bind(params.offset())
                    .fetch_all(pool)
                    .await
                    .context("Failed to list ebooks")?;
                Ok((
                    rows.iter().map(|r| row_to_ebook(&RowRef::Sqlite(r))).collect(),
                    total,
                ))
            }
            DatabaseDriver::Mysql => {
                let pool = self.pool.as_mysql().unwrap();
                let total: i64 = sqlx::query(count_sql)
                    .fetch_one(pool)
                    .await
                    .context("Failed to count ebooks")?
                    .get("count");
                let rows = sqlx::query(&list_sql)
                    .bind(params.limit())
                    .bind(params.offset())
                    .fetch_all(pool)
                    .await
                    .context("Failed to list ebooks")?;
                Ok((
                    rows.iter().map(|r| row_to_ebook(&RowRef::Mysql(r))).collect(),
                    total,
                ))
            }
        }
    }

    async fn search(
        &self,
        query: &str,
        lang: Lang,
        params: &ListParams,
    ) -> Result<(Vec<Ebook>, i64)> {
        let pattern = format!("%{}%", query);
        let filter = search_filter(lang);
        let count_sql = format!("SELECT COUNT(*) as count FROM ebooks{}", filter);
        let list_sql = format!(
            "SELECT {} FROM ebooks{} ORDER BY added_on DESC LIMIT ? OFFSET ?",
            EBOOK_COLUMNS, filter
        );

        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let pool = self.pool.as_sqlite().unwrap();
                let total: i64 = sqlx::query(&count_sql)
                    .bind(&pattern)
                    .bind(&pattern)
                    .fetch_one(pool)
                    .await
                    .context("Failed to count ebook search results")?
                    .get("count");
                let rows = sqlx::query(&list_sql)
                    .bind(&pattern)
                    .bind(&pattern)
                    .bind(params.limit())
                    .bind(params.offset())
                    .fetch_all(pool)
                    .await
                    .context("Failed to search ebooks")?;
                Ok((
                    rows.iter().map(|r| row_to_ebook(&RowRef::Sqlite(r))).collect(),
                    total,
                ))
            }
            DatabaseDriver::Mysql => {
                let pool = self.pool.as_mysql().unwrap();
                let total: i64 = sqlx::query(&count_sql)
                    .bind(&pattern)
                    .bind(&pattern)
                    .fetch_one(pool)
                    .await
                    .context("Failed to count ebook search results")?
                    .get("count");
                let rows = sqlx::query(&list_sql)
                    .bind(&pattern)
                    .bind(&pattern)
                    .bind(params.limit())
                    .bind(params.offset())
                    .fetch_all(pool)
                    .await
                    .context("Failed to search ebooks")?;
                Ok((
                    rows.iter().map(|r| row_to_ebook(&RowRef::Mysql(r))).collect(),
                    total,
                ))
            }
        }
    }

    async fn update(&self, ebook: &Ebook) -> Result<Ebook> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(UPDATE_SQL)
                    .bind(&ebook.title_en)
                    .bind(&ebook.title_fr)
                    .bind(&ebook.description_en)
                    .bind(&ebook.description_fr)
                    .bind(&ebook.author_en)
                    .bind(&ebook.author_fr)
                    .bind(&ebook.cover_url)
                    .bind(&ebook.file_url)
                    .bind(ebook.file_size)
                    .bind(ebook.pages)
                    .bind(ebook.published_date)
                    .bind(ebook.id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to update ebook")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(UPDATE_SQL)
                    .bind(&ebook.title_en)
                    .bind(&ebook.title_fr)
                    .bind(&ebook.description_en)
                    .bind(&ebook.description_fr)
                    .bind(&ebook.author_en)
                    .bind(&ebook.author_fr)
                    .bind(&ebook.cover_url)
                    .bind(&ebook.file_url)
                    .bind(ebook.file_size)
                    .bind(ebook.pages)
                    .bind(ebook.published_date)
                    .bind(ebook.id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to update ebook")?;
            }
        }
        Ok(ebook.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let sql = "DELETE FROM ebooks WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to delete ebook")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to delete ebook")?;
            }
        }
        Ok(())
    }
}

enum RowRef<'a> {
    Sqlite(&'a sqlx::sqlite::SqliteRow),
    Mysql(&'a sqlx::mysql::MySqlRow),
}

fn row_to_ebook(row: &RowRef<'_>) -> Ebook {
    match row {
        RowRef::Sqlite(r) => Ebook {
            id: r.get("id"),
            title_en: r.get("title_en"),
            title_fr: r.get("title_fr"),
            description_en: r.get("description_en"),
            description_fr: r.get("description_fr"),
            author_en: r.get("author_en"),
            author_fr: r.get("author_fr"),
            cover_url: r.get("cover_url"),
            file_url: r.get("file_url"),
            file_size: r.get("file_size"),
            pages: r.get("pages"),
            published_date: r.get("published_date"),
            added_on: r.get("added_on"),
        },
        RowRef::Mysql(r) => Ebook {
            id: r.get("id"),
            title_en: r.get("title_en"),
            title_fr: r.get("title_fr"),
            description_en: r.get("description_en"),
            description_fr: r.get("description_fr"),
            author_en: r.get("author_en"),
            author_fr: r.get("author_fr"),
            cover_url: r.get("cover_url"),
            file_url: r.get("file_url"),
            file_size: r.get("file_size"),
            pages: r.get("pages"),
            published_date: r.get("published_date"),
            added_on: r.get("added_on"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> SqlxEbookRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxEbookRepository::new(pool)
    }

    fn make_ebook(title_en: &str, title_fr: &str, author_en: Option<&str>) -> Ebook {
        Ebook {
            id: 0,
            title_en: title_en.to_string(),
            title_fr: title_fr.to_string(),
            description_en: None,
            description_fr: None,
            author_en: author_en.map(String::from),
            author_fr: None,
            cover_url: None,
            file_url: "/uploads/ebooks/test.pdf".to_string(),
            file_size: Some(1024),
            pages: Some(42),
            published_date: None,
            added_on: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_ebook_crud() {
        let repo = setup().await;
        let created = repo
            .create(&make_ebook("Annual report", "Rapport annuel", Some("J. Doe")))
            .await
            .unwrap();
        assert!(created.id > 0);

        let found = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.pages, Some(42));
        assert_eq!(found.file_size, Some(1024));

        repo.delete(created.id).await.unwrap();
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ebook_search_per_language() {
        let repo = setup().await;
        repo.create(&make_ebook("Annual report", "Rapport annuel", Some("J. Doe")))
            .await
            .unwrap();
        repo.create(&make_ebook("Guidelines", "Directives", None))
            .await
            .unwrap();

        // English title match
        let (_, total) = repo
            .search("Annual", Lang::En, &ListParams::new(1, 10))
            .await
            .unwrap();
        assert_eq!(total, 1);

        // English author match
        let (_, total) = repo
            .search("Doe", Lang::En, &ListParams::new(1, 10))
            .await
            .unwrap();
        assert_eq!(total, 1);

        // French title match requires lang=fr
        let (_, total) = repo
            .search("Rapport", Lang::En, &ListParams::new(1, 10))
            .await
            .unwrap();
        assert_eq!(total, 0);
        let (_, total) = repo
            .search("Rapport", Lang::Fr, &ListParams::new(1, 10))
            .await
            .unwrap();
        assert_eq!(total, 1);
    }
}
