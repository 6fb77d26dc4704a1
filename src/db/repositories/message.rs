//! Leadership message repositories
//!
//! Director and finance-minister messages are revision histories: every save
//! creates or updates a row, and `latest()` returns the one currently shown
//! on the site.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{DirectorMessage, MinisterMessage};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::sync::Arc;

/// Director message repository trait
#[async_trait]
pub trait DirectorMessageRepository: Send + Sync {
    /// Create a new message revision
    async fn create(&self, message: &DirectorMessage) -> Result<DirectorMessage>;

    /// Get message by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<DirectorMessage>>;

    /// List all revisions, most recent first
    async fn list(&self) -> Result<Vec<DirectorMessage>>;

    /// Get the most recently created revision
    async fn latest(&self) -> Result<Option<DirectorMessage>>;

    /// Update a message (full row)
    async fn update(&self, message: &DirectorMessage) -> Result<DirectorMessage>;

    /// Delete a message
    async fn delete(&self, id: i64) -> Result<()>;
}

/// Finance-minister message repository trait
#[async_trait]
pub trait MinisterMessageRepository: Send + Sync {
    /// Create a new message revision
    async fn create(&self, message: &MinisterMessage) -> Result<MinisterMessage>;

    /// Get message by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<MinisterMessage>>;

    /// List all revisions, most recent first
    async fn list(&self) -> Result<Vec<MinisterMessage>>;

    /// Get the most recently created revision
    async fn latest(&self) -> Result<Option<MinisterMessage>>;

    /// Update a message (full row)
    async fn update(&self, message: &MinisterMessage) -> Result<MinisterMessage>;

    /// Delete a message
    async fn delete(&self, id: i64) -> Result<()>;
}

// ============================================================================
// Director messages
// ============================================================================

/// SQLx-based director message repository
pub struct SqlxDirectorMessageRepository {
    pool: DynDatabasePool,
}

impl SqlxDirectorMessageRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn DirectorMessageRepository> {
        Arc::new(Self::new(pool))
    }
}

const DIRECTOR_COLUMNS: &str = "id, director_name, title_en, title_fr, excerpt_en, excerpt_fr, \
     content_en, content_fr, image_url, x, linkedin, email, created_at, updated_at";

const DIRECTOR_INSERT: &str = "INSERT INTO director_messages (director_name, title_en, title_fr, \
     excerpt_en, excerpt_fr, content_en, content_fr, image_url, x, linkedin, email, \
     created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

const DIRECTOR_UPDATE: &str = "UPDATE director_messages SET director_name = ?, title_en = ?, \
     title_fr = ?, excerpt_en = ?, excerpt_fr = ?, content_en = ?, content_fr = ?, \
     image_url = ?, x = ?, linkedin = ?, email = ?, updated_at = ? WHERE id = ?";

#[async_trait]
impl DirectorMessageRepository for SqlxDirectorMessageRepository {
    async fn create(&self, message: &DirectorMessage) -> Result<DirectorMessage> {
        let now = Utc::now();

        let id = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(DIRECTOR_INSERT)
                .bind(&message.director_name)
                .bind(&message.title_en)
                .bind(&message.title_fr)
                .bind(&message.excerpt_en)
                .bind(&message.excerpt_fr)
                .bind(&message.content_en)
                .bind(&message.content_fr)
                .bind(&message.image_url)
                .bind(&message.x)
                .bind(&message.linkedin)
                .bind(&message.email)
                .bind(now)
                .bind(now)
                .execute(self.pool.as_sqlite().unwrap())
                .await
                .context("Failed to create director message")?
                .last_insert_rowid(),
            DatabaseDriver::Mysql => sqlx::query(DIRECTOR_INSERT)
                .bind(&message.director_name)
                .bind(&message.title_en)
                .bind(&message.title_fr)
                .bind(&message.excerpt_en)
                .bind(&message.excerpt_fr)
                .bind(&message.content_en)
                .bind(&message.content_fr)
                .bind(&message.image_url)
                .bind(&message.x)
                .bind(&message.linkedin)
                .bind(&message.email)
                .bind(now)
                .bind(now)
                .execute(self.pool.as_mysql().unwrap())
                .await
                .context("Failed to create director message")?
                .last_insert_id() as i64,
        };

        Ok(DirectorMessage {
            id,
            created_at: now,
            updated_at: now,
            ..message.clone()
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<DirectorMessage>> {
        let sql = format!(
            "SELECT {} FROM director_messages WHERE id = ?",
            DIRECTOR_COLUMNS
        );
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to get director message")?;
                Ok(row.map(|r| row_to_director(&RowRef::Sqlite(&r))))
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to get director message")?;
                Ok(row.map(|r| row_to_director(&RowRef::Mysql(&r))))
            }
        }
    }

    async fn list(&self) -> Result<Vec<DirectorMessage>> {
        let sql = format!(
            "SELECT {} FROM director_messages ORDER BY created_at DESC",
            DIRECTOR_COLUMNS
        );
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(&sql)
                    .fetch_all(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to list director messages")?;
                Ok(rows.iter().map(|r| row_to_director(&RowRef::Sqlite(r))).collect())
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(&sql)
                    .fetch_all(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to list director messages")?;
                Ok(rows.iter().map(|r| row_to_director(&RowRef::Mysql(r))).collect())
            }
        }
    }

    async fn latest(&self) -> Result<Option<DirectorMessage>> {
        let sql = format!(
            "SELECT {} FROM director_messages ORDER BY created_at DESC LIMIT 1",
            DIRECTOR_COLUMNS
        );
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .fetch_optional(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to get latest director message")?;
                Ok(row.map(|r| row_to_director(&RowRef::Sqlite(&r))))
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .fetch_optional(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to get latest director message")?;
                Ok(row.map(|r| row_to_director(&RowRef::Mysql(&r))))
            }
        }
    }

    async fn update(&self, message: &DirectorMessage) -> Result<DirectorMessage> {
        let now = Utc::now();

        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(DIRECTOR_UPDATE)
                    .bind(&message.director_name)
                    .bind(&message.title_en)
                    .bind(&message.title_fr)
                    .bind(&message.excerpt_en)
                    .bind(&message.excerpt_fr)
                    .bind(&message.content_en)
                    .bind(&message.content_fr)
                    .bind(&message.image_url)
                    .bind(&message.x)
                    .bind(&message.linkedin)
                    .bind(&message.email)
                    .bind(now)
                    .bind(message.id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to update director message")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(DIRECTOR_UPDATE)
                    .bind(&message.director_name)
                    .bind(&message.title_en)
                    .bind(&message.title_fr)
                    .bind(&message.excerpt_en)
                    .bind(&message.excerpt_fr)
                    .bind(&message.content_en)
                    .bind(&message.content_fr)
                    .bind(&message.image_url)
                    .bind(&message.x)
                    .bind(&message.linkedin)
                    .bind(&message.email)
                    .bind(now)
                    .bind(message.id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to update director message")?;
            }
        }

        Ok(DirectorMessage {
            updated_at: now,
            ..message.clone()
        })
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let sql = "DELETE FROM director_messages WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to delete director message")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to delete director message")?;
            }
        }
        Ok(())
    }
}

// ============================================================================
// Finance minister messages
// ============================================================================

/// SQLx-based finance-minister message repository
pub struct SqlxMinisterMessageRepository {
    pool: DynDatabasePool,
}

impl SqlxMinisterMessageRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn MinisterMessageRepository> {
        Arc::new(Self::new(pool))
    }
}

const MINISTER_COLUMNS: &str = "id, minister_name, content_en, content_fr, image_url, telephone, \
     email, website, created_at, updated_at";

const MINISTER_INSERT: &str = "INSERT INTO finance_minister_messages (minister_name, content_en, \
     content_fr, image_url, telephone, email, website, created_at, updated_at) \
     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)";

const MINISTER_UPDATE: &str = "UPDATE finance_minister_messages SET minister_name = ?, \
     content_en = ?, content_fr = ?, image_url = ?, telephone = ?, email = ?, website = ?, \
     updated_at = ? WHERE id = ?";

#[async_trait]
impl MinisterMessageRepository for SqlxMinisterMessageRepository {
    async fn create(&self, message: &MinisterMessage) -> Result<MinisterMessage> {
        let now = Utc::now();

        let id = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(MINISTER_INSERT)
                .bind(&message.minister_name)
                .bind(&message.content_en)
                .bind(&message.content_fr)
                .bind(&message.image_url)
                .bind(&message.telephone)
                .bind(&message.email)
                .bind(&message.website)
                .bind(now)
                .bind(now)
                .execute(self.pool.as_sqlite().unwrap())
                .await
                .context("Failed to create minister message")?
                .last_insert_rowid(),
            DatabaseDriver::Mysql => sqlx::query(MINISTER_INSERT)
                .bind(&message.minister_name)
                .bind(&message.content_en)
                .bind(&message.content_fr)
                .bind(&message.image_url)
                .bind(&message.telephone)
                .bind(&message.email)
                .bind(&message.website)
                .bind(now)
                .bind(now)
                .execute(self.pool.as_mysql().unwrap())
                .await
                .context("Failed to create minister message")?
                .last_insert_id() as i64,
        };

        Ok(MinisterMessage {
            id,
            created_at: now,
            updated_at: now,
            ..message.clone()
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<MinisterMessage>> {
        let sql = format!(
            "SELECT {} FROM finance_minister_messages WHERE id = ?",
            MINISTER_COLUMNS
        );
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to get minister message")?;
                Ok(row.map(|r| row_to_minister(&RowRef::Sqlite(&r))))
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to get minister message")?;
                Ok(row.map(|r| row_to_minister(&RowRef::Mysql(&r))))
            }
        }
    }

    async fn list(&self) -> Result<Vec<MinisterMessage>> {
        let sql = format!(
            "SELECT {} FROM finance_minister_messages ORDER BY created_at DESC",
            MINISTER_COLUMNS
        );
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(&sql)
                    .fetch_all(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to list minister messages")?;
                Ok(rows.iter().map(|r| row_to_minister(&RowRef::Sqlite(r))).collect())
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(&sql)
                    .fetch_all(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to list minister messages")?;
                Ok(rows.iter().map(|r| row_to_minister(&RowRef::Mysql(r))).collect())
            }
        }
    }

    async fn latest(&self) -> Result<Option<MinisterMessage>> {
        let sql = format!(
            "SELECT {} FROM finance_minister_messages ORDER BY created_at DESC LIMIT 1",
            MINISTER_COLUMNS
        );
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .fetch_optional(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to get latest minister message")?;
                Ok(row.map(|r| row_to_minister(&RowRef::Sqlite(&r))))
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .fetch_optional(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to get latest minister message")?;
                Ok(row.map(|r| row_to_minister(&RowRef::Mysql(&r))))
            }
        }
    }

    async fn update(&self, message: &MinisterMessage) -> Result<MinisterMessage> {
        let now = Utc::now();

        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(MINISTER_UPDATE)
                    .bind(&message.minister_name)
                    .bind(&message.content_en)
                    .bind(&message.content_fr)
                    .bind(&message.image_url)
                    .bind(&message.telephone)
                    .bind(&message.email)
                    .bind(&message.website)
                    .bind(now)
                    .bind(message.id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to update minister message")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(MINISTER_UPDATE)
                    .bind(&message.minister_name)
                    .bind(&message.content_en)
                    .bind(&message.content_fr)
                    .bind(&message.image_url)
                    .bind(&message.telephone)
                    .bind(&message.email)
                    .bind(&message.website)
                    .bind(now)
                    .bind(message.id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to update minister message")?;
            }
        }

        Ok(MinisterMessage {
            updated_at: now,
            ..message.clone()
        })
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let sql = "DELETE FROM finance_minister_messages WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to delete minister message")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to delete minister message")?;
            }
        }
        Ok(())
    }
}

enum RowRef<'a> {
    Sqlite(&'a sqlx::sqlite::SqliteRow),
    Mysql(&'a sqlx::mysql::MySqlRow),
}

fn row_to_director(row: &RowRef<'_>) -> DirectorMessage {
    match row {
        RowRef::Sqlite(r) => DirectorMessage {
            id: r.get("id"),
            director_name: r.get("director_name"),
            title_en: r.get("title_en"),
            title_fr: r.get("title_fr"),
            excerpt_en: r.get("excerpt_en"),
            excerpt_fr: r.get("excerpt_fr"),
            content_en: r.get("content_en"),
            content_fr: r.get("content_fr"),
            image_url: r.get("image_url"),
            x: r.get("x"),
            linkedin: r.get("linkedin"),
            email: r.get("email"),
            created_at: r.get("created_at"),
            updated_at: r.get("updated_at"),
        },
        RowRef::Mysql(r) => DirectorMessage {
            id: r.get("id"),
            director_name: r.get("director_name"),
            title_en: r.get("title_en"),
            title_fr: r.get("title_fr"),
            excerpt_en: r.get("excerpt_en"),
            excerpt_fr: r.get("excerpt_fr"),
            content_en: r.get("content_en"),
            content_fr: r.get("content_fr"),
            image_url: r.get("image_url"),
            x: r.get("x"),
            linkedin: r.get("linkedin"),
            email: r.get("email"),
            created_at: r.get("created_at"),
            updated_at: r.get("updated_at"),
        },
    }
}

fn row_to_minister(row: &RowRef<'_>) -> MinisterMessage {
    match row {
        RowRef::Sqlite(r) => MinisterMessage {
            id: r.get("id"),
            minister_name: r.get("minister_name"),
            content_en: r.get("content_en"),
            content_fr: r.get("content_fr"),
            image_url: r.get("image_url"),
            telephone: r.get("telephone"),
            email: r.get("email"),
            website: r.get("website"),
            created_at: r.get("created_at"),
            updated_at: r.get("updated_at"),
        },
        RowRef::Mysql(r) => MinisterMessage {
            id: r.get("id"),
            minister_name: r.get("minister_name"),
            content_en: r.get("content_en"),
            content_fr: r.get("content_fr"),
            image_url: r.get("image_url"),
            telephone: r.get("telephone"),
            email: r.get("email"),
            website: r.get("website"),
            created_at: r.get("created_at"),
            updated_at: r.get("updated_at"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> (SqlxDirectorMessageRepository, SqlxMinisterMessageRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        (
            SqlxDirectorMessageRepository::new(pool.clone()),
            SqlxMinisterMessageRepository::new(pool),
        )
    }

    fn make_director(name: &str) -> DirectorMessage {
        let now = Utc::now();
        DirectorMessage {
            id: 0,
            director_name: Some(name.to_string()),
            title_en: Some("A word from the director".to_string()),
            title_fr: Some("Le mot du directeur".to_string()),
            excerpt_en: None,
            excerpt_fr: None,
            content_en: Some("Welcome.".to_string()),
            content_fr: Some("Bienvenue.".to_string()),
            image_url: None,
            x: None,
            linkedin: None,
            email: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_director_message_latest_is_most_recent() {
        let (repo, _) = setup().await;
        assert!(repo.latest().await.unwrap().is_none());

        repo.create(&make_director("First")).await.unwrap();
        // SQLite timestamp precision: force distinct created_at values
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        repo.create(&make_director("Second")).await.unwrap();

        let latest = repo.latest().await.unwrap().unwrap();
        assert_eq!(latest.director_name.as_deref(), Some("Second"));

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_minister_message_crud() {
        let (_, repo) = setup().await;
        let now = Utc::now();
        let created = repo
            .create(&MinisterMessage {
                id: 0,
                minister_name: Some("Minister".to_string()),
                content_en: Some("Statement.".to_string()),
                content_fr: Some("Déclaration.".to_string()),
                image_url: None,
                telephone: Some("+237 222 222 222".to_string()),
                email: None,
                website: None,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        assert!(created.id > 0);

        let mut updated = repo.get_by_id(created.id).await.unwrap().unwrap();
        updated.website = Some("https://minfi.example".to_string());
        repo.update(&updated).await.unwrap();

        let found = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.website.as_deref(), Some("https://minfi.example"));

        repo.delete(created.id).await.unwrap();
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }
}
