//! Subscriber repository

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{ListParams, Subscriber, SubscriberStatus};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::str::FromStr;
use std::sync::Arc;

/// Subscriber repository trait
#[async_trait]
pub trait SubscriberRepository: Send + Sync {
    /// Create a new active subscriber
    async fn create(&self, email: &str) -> Result<Subscriber>;

    /// Get subscriber by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Subscriber>>;

    /// Get subscriber by email
    async fn get_by_email(&self, email: &str) -> Result<Option<Subscriber>>;

    /// Change a subscriber's status
    async fn set_status(&self, id: i64, status: SubscriberStatus) -> Result<()>;

    /// List subscribers, optionally filtered by status, most recent first
    async fn list(
        &self,
        status: Option<SubscriberStatus>,
        params: &ListParams,
    ) -> Result<(Vec<Subscriber>, i64)>;

    /// Delete a subscriber
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based subscriber repository implementation
pub struct SqlxSubscriberRepository {
    pool: DynDatabasePool,
}

impl SqlxSubscriberRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn SubscriberRepository> {
        Arc::new(Self::new(pool))
    }
}

const SUBSCRIBER_COLUMNS: &str = "id, email, subscribed_on, status";

#[async_trait]
impl SubscriberRepository for SqlxSubscriberRepository {
    async fn create(&self, email: &str) -> Result<Subscriber> {
        let now = Utc::now();
        let sql = "INSERT INTO subscribers (email, subscribed_on, status) VALUES (?, ?, 'active')";

        let id = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(sql)
                .bind(email)
                .bind(now)
                .execute(self.pool.as_sqlite().unwrap())
                .await
                .context("Failed to create subscriber")?
                .last_insert_rowid(),
            DatabaseDriver::Mysql => sqlx::query(sql)
                .bind(email)
                .bind(now)
                .execute(self.pool.as_mysql().unwrap())
                .await
                .context("Failed to create subscriber")?
                .last_insert_id() as i64,
        };

        Ok(Subscriber {
            id,
            email: email.to_string(),
            subscribed_on: now,
            status: SubscriberStatus::Active,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Subscriber>> {
        let sql = format!("SELECT {} FROM subscribers WHERE id = ?", SUBSCRIBER_COLUMNS);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to get subscriber")?;
                row.map(|r| row_to_subscriber(&RowRef::Sqlite(&r))).transpose()
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to get subscriber")?;
                row.map(|r| row_to_subscriber(&RowRef::Mysql(&r))).transpose()
            }
        }
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Subscriber>> {
        let sql = format!(
            "SELECT {} FROM subscribers WHERE email = ?",
            SUBSCRIBER_COLUMNS
        );
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(email)
                    .fetch_optional(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to get subscriber by email")?;
                row.map(|r| row_to_subscriber(&RowRef::Sqlite(&r))).transpose()
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(email)
                    .fetch_optional(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to get subscriber by email")?;
                row.map(|r| row_to_subscriber(&RowRef::Mysql(&r))).transpose()
            }
        }
    }

    async fn set_status(&self, id: i64, status: SubscriberStatus) -> Result<()> {
        let sql = "UPDATE subscribers SET status = ? WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(sql)
                    .bind(status.to_string())
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to update subscriber status")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(sql)
                    .bind(status.to_string())
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to update subscriber status")?;
            }
        }
        Ok(())
    }

    async fn list(
        &self,
        status: Option<SubscriberStatus>,
        params: &ListParams,
    ) -> Result<(Vec<Subscriber>, i64)> {
        let where_clause = if status.is_some() { " WHERE status = ?" } else { "" };
        let count_sql = format!("SELECT COUNT(*) as count FROM subscribers{}", where_clause);
        let list_sql = format!(
            "SELECT {} FROM subscribers{} ORDER BY subscribed_on DESC LIMIT ? OFFSET ?",
            SUBSCRIBER_COLUMNS, where_clause
        );
        let status_str = status.map(|s| s.to_string());

        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let pool = self.pool.as_sqlite().unwrap();
                let mut count_query = sqlx::query(&count_sql);
                if let Some(ref s) = status_str {
                    count_query = count_query.bind(s);
                }
                let total: i64 = count_query
                    .fetch_one(pool)
                    .await
                    .context("Failed to count subscribers")?
                    .get("count");

                let mut list_query = sqlx::query(&list_sql);
                if let Some(ref s) = status_str {
                    list_query = list_query.bind(s);
                }
                let rows = list_query
                    .bind(params.limit())
                    .bind(params.offset())
                    .fetch_all(pool)
                    .await
                    .context("Failed to list subscribers")?;
                let subscribers = rows
                    .iter()
                    .map(|r| row_to_subscriber(&RowRef::Sqlite(r)))
                    .collect::<Result<Vec<_>>>()?;
                Ok((subscribers, total))
            }
            DatabaseDriver::Mysql => {
                let pool = self.pool.as_mysql().unwrap();
                let mut count_query = sqlx::query(&count_sql);
                if let Some(ref s) = status_str {
                    count_query = count_query.bind(s);
                }
                let total: i64 = count_query
                    .fetch_one(pool)
                    .await
                    .context("Failed to count subscribers")?
                    .get("count");

                let mut list_query = sqlx::query(&list_sql);
                if let Some(ref s) = status_str {
                    list_query = list_query.bind(s);
                }
                let rows = list_query
                    .bind(params.limit())
                    .bind(params.offset())
                    .fetch_all(pool)
                    .await
                    .context("Failed to list subscribers")?;
                let subscribers = rows
                    .iter()
                    .map(|r| row_to_subscriber(&RowRef::Mysql(r)))
                    .collect::<Result<Vec<_>>>()?;
                Ok((subscribers, total))
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let sql = "DELETE FROM subscribers WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to delete subscriber")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to delete subscriber")?;
            }
        }
        Ok(())
    }
}

enum RowRef<'a> {
    Sqlite(&'a sqlx::sqlite::SqliteRow),
    Mysql(&'a sqlx::mysql::MySqlRow),
}

fn row_to_subscriber(row: &RowRef<'_>) -> Result<Subscriber> {
    let (id, email, subscribed_on, status_str): (i64, String, chrono::DateTime<Utc>, String) =
        match row {
            RowRef::Sqlite(r) => (
                r.get("id"),
                r.get("email"),
                r.get("subscribed_on"),
                r.get("status"),
            ),
            RowRef::Mysql(r) => (
                r.get("id"),
                r.get("email"),
                r.get("subscribed_on"),
                r.get("status"),
            ),
        };

    let status = SubscriberStatus::from_str(&status_str)
        .with_context(|| format!("Invalid subscriber status in database: {}", status_str))?;

    Ok(Subscriber {
        id,
        email,
        subscribed_on,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> SqlxSubscriberRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxSubscriberRepository::new(pool)
    }

    #[tokio::test]
    async fn test_subscriber_create_and_lookup() {
        let repo = setup().await;
        let created = repo.create("reader@example.com").await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.status, SubscriberStatus::Active);

        let found = repo.get_by_email("reader@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);

        assert!(repo.get_by_email("missing@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_subscriber_email_unique() {
        let repo = setup().await;
        repo.create("reader@example.com").await.unwrap();
        assert!(repo.create("reader@example.com").await.is_err());
    }

    #[tokio::test]
    async fn test_subscriber_status_change_and_filter() {
        let repo = setup().await;
        let a = repo.create("a@example.com").await.unwrap();
        repo.create("b@example.com").await.unwrap();

        repo.set_status(a.id, SubscriberStatus::Unsubscribed)
            .await
            .unwrap();

        let (active, total) = repo
            .list(Some(SubscriberStatus::Active), &ListParams::new(1, 50))
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(active[0].email, "b@example.com");

        let (_, total) = repo.list(None, &ListParams::new(1, 50)).await.unwrap();
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn test_subscriber_delete(){
        let repo = setup().await;
        let created = repo.create("gone@example.com").await.unwrap();
        repo.delete(created.id).await.unwrap();
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }
}
