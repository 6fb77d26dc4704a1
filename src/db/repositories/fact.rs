//! Fact repository

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::Fact;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::sync::Arc;

/// Fact repository trait
#[async_trait]
pub trait FactRepository: Send + Sync {
    /// Create a new fact
    async fn create(&self, fact: &Fact) -> Result<Fact>;

    /// Get fact by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Fact>>;

    /// List all facts, most recent first
    async fn list(&self) -> Result<Vec<Fact>>;

    /// Update a fact (full row)
    async fn update(&self, fact: &Fact) -> Result<Fact>;

    /// Delete a fact
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based fact repository implementation
pub struct SqlxFactRepository {
    pool: DynDatabasePool,
}

impl SqlxFactRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn FactRepository> {
        Arc::new(Self::new(pool))
    }
}

const FACT_COLUMNS: &str = "id, content_en, content_fr, posted_on";

#[async_trait]
impl FactRepository for SqlxFactRepository {
    async fn create(&self, fact: &Fact) -> Result<Fact> {
        let now = Utc::now();
        let sql = "INSERT INTO facts (content_en, content_fr, posted_on) VALUES (?, ?, ?)";

        let id = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(sql)
                .bind(&fact.content_en)
                .bind(&fact.content_fr)
                .bind(now)
                .execute(self.pool.as_sqlite().unwrap())
                .await
                .context("Failed to create fact")?
                .last_insert_rowid(),
            DatabaseDriver::Mysql => sqlx::query(sql)
                .bind(&fact.content_en)
                .bind(&fact.content_fr)
                .bind(now)
                .execute(self.pool.as_mysql().unwrap())
                .await
                .context("Failed to create fact")?
                .last_insert_id() as i64,
        };

        Ok(Fact {
            id,
            content_en: fact.content_en.clone(),
            content_fr: fact.content_fr.clone(),
            posted_on: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Fact>> {
        let sql = format!("SELECT {} FROM facts WHERE id = ?", FACT_COLUMNS);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to get fact")?;
                Ok(row.map(|r| row_to_fact(&RowRef::Sqlite(&r))))
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to get fact")?;
                Ok(row.map(|r| row_to_fact(&RowRef::Mysql(&r))))
            }
        }
    }

    async fn list(&self) -> Result<Vec<Fact>> {
        let sql = format!("SELECT {} FROM facts ORDER BY posted_on DESC", FACT_COLUMNS);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(&sql)
                    .fetch_all(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to list facts")?;
                Ok(rows.iter().map(|r| row_to_fact(&RowRef::Sqlite(r))).collect())
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(&sql)
                    .fetch_all(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to list facts")?;
                Ok(rows.iter().map(|r| row_to_fact(&RowRef::Mysql(r))).collect())
            }
        }
    }

    async fn update(&self, fact: &Fact) -> Result<Fact> {
        let sql = "UPDATE facts SET content_en = ?, content_fr = ? WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(sql)
                    .bind(&fact.content_en)
                    .bind(&fact.content_fr)
                    .bind(fact.id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to update fact")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(sql)
                    .bind(&fact.content_en)
                    .bind(&fact.content_fr)
                    .bind(fact.id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to update fact")?;
            }
        }
        Ok(fact.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let sql = "DELETE FROM facts WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to delete fact")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to delete fact")?;
            }
        }
        Ok(())
    }
}

enum RowRef<'a> {
    Sqlite(&'a sqlx::sqlite::SqliteRow),
    Mysql(&'a sqlx::mysql::MySqlRow),
}

fn row_to_fact(row: &RowRef<'_>) -> Fact {
    match row {
        RowRef::Sqlite(r) => Fact {
            id: r.get("id"),
            content_en: r.get("content_en"),
            content_fr: r.get("content_fr"),
            posted_on: r.get("posted_on"),
        },
        RowRef::Mysql(r) => Fact {
            id: r.get("id"),
            content_en: r.get("content_en"),
            content_fr: r.get("content_fr"),
            posted_on: r.get("posted_on"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> SqlxFactRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxFactRepository::new(pool)
    }

    #[tokio::test]
    async fn test_fact_crud() {
        let repo = setup().await;

        let created = repo
            .create(&Fact {
                id: 0,
                content_en: "The institution was founded in 1988.".to_string(),
                content_fr: "L'institution a été fondée en 1988.".to_string(),
                posted_on: Utc::now(),
            })
            .await
            .unwrap();
        assert!(created.id > 0);

        let mut updated = repo.get_by_id(created.id).await.unwrap().unwrap();
        updated.content_en = "Updated fact.".to_string();
        repo.update(&updated).await.unwrap();

        let found = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.content_en, "Updated fact.");
        assert_eq!(found.content_fr, "L'institution a été fondée en 1988.");

        assert_eq!(repo.list().await.unwrap().len(), 1);

        repo.delete(created.id).await.unwrap();
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }
}
