//! Project repository

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{ListParams, Project};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::sync::Arc;

/// Project repository trait
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Create a new project
    async fn create(&self, project: &Project) -> Result<Project>;

    /// Get project by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Project>>;

    /// List projects, most recently posted first
    async fn list(&self, params: &ListParams) -> Result<(Vec<Project>, i64)>;

    /// Update a project (full row)
    async fn update(&self, project: &Project) -> Result<Project>;

    /// Delete a project
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based project repository implementation
pub struct SqlxProjectRepository {
    pool: DynDatabasePool,
}

impl SqlxProjectRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ProjectRepository> {
        Arc::new(Self::new(pool))
    }
}

const PROJECT_COLUMNS: &str = "id, title_en, title_fr, description_en, description_fr, link, \
     image_url, posted_on, created_at, updated_at";

const INSERT_SQL: &str = "INSERT INTO projects (title_en, title_fr, description_en, description_fr, \
     link, image_url, posted_on, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)";

const UPDATE_SQL: &str = "UPDATE projects SET title_en = ?, title_fr = ?, description_en = ?, \
     description_fr = ?, link = ?, image_url = ?, updated_at = ? WHERE id = ?";

#[async_trait]
impl ProjectRepository for SqlxProjectRepository {
    async fn create(&self, project: &Project) -> Result<Project> {
        let now = Utc::now();

        let id = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(INSERT_SQL)
                .bind(&project.title_en)
                .bind(&project.title_fr)
                .bind(&project.description_en)
                .bind(&project.description_fr)
                .bind(&project.link)
                .bind(&project.image_url)
                .bind(now)
                .bind(now)
                .bind(now)
                .execute(self.pool.as_sqlite().unwrap())
                .await
                .context("Failed to create project")?
                .last_insert_rowid(),
            DatabaseDriver::Mysql => sqlx::query(INSERT_SQL)
                .bind(&project.title_en)
                .bind(&project.title_fr)
                .bind(&project.description_en)
                .bind(&project.description_fr)
                .bind(&project.link)
                .bind(&project.image_url)
                .bind(now)
                .bind(now)
                .bind(now)
                .execute(self.pool.as_mysql().unwrap())
                .await
                .context("Failed to create project")?
                .last_insert_id() as i64,
        };

        Ok(Project {
            id,
            posted_on: now,
            created_at: now,
            updated_at: now,
            ..project.clone()
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Project>> {
        let sql = format!("SELECT {} FROM projects WHERE id = ?", PROJECT_COLUMNS);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to get project")?;
                Ok(row.map(|r| row_to_project(&RowRef::Sqlite(&r))))
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to get project")?;
                Ok(row.map(|r| row_to_project(&RowRef::Mysql(&r))))
            }
        }
    }

    async fn list(&self, params: &ListParams) -> Result<(Vec<Project>, i64)> {
        let count_sql = "SELECT COUNT(*) as count FROM projects";
        let list_sql = format!(
            "SELECT {} FROM projects ORDER BY posted_on DESC LIMIT ? OFFSET ?",
            PROJECT_COLUMNS
        );

        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let pool = self.pool.as_sqlite().unwrap();
                let total: i64 = sqlx::query(count_sql)
                    .fetch_one(pool)
                    .await
                    .context("Failed to count projects")?
                    .get("count");
                let rows = sqlx::query(&list_sql)
                    .bind(params.limit())
                    .bind(params.offset())
                    .fetch_all(pool)
                    .await
                    .context("Failed to list projects")?;
                Ok((
                    rows.iter().map(|r| row_to_project(&RowRef::Sqlite(r))).collect(),
                    total,
                ))
            }
            DatabaseDriver::Mysql => {
                let pool = self.pool.as_mysql().unwrap();
                let total: i64 = sqlx::query(count_sql)
                    .fetch_one(pool)
                    .await
                    .context("Failed to count projects")?
                    .get("count");
                let rows = sqlx::query(&list_sql)
                    .bind(params.limit())
                    .bind(params.offset())
                    .fetch_all(pool)
                    .await
                    .context("Failed to list projects")?;
                Ok((
                    rows.iter().map(|r| row_to_project(&RowRef::Mysql(r))).collect(),
                    total,
                ))
            }
        }
    }

    async fn update(&self, project: &Project) -> Result<Project> {
        let now = Utc::now();

        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(UPDATE_SQL)
                    .bind(&project.title_en)
                    .bind(&project.title_fr)
                    .bind(&project.description_en)
                    .bind(&project.description_fr)
                    .bind(&project.link)
                    .bind(&project.image_url)
                    .bind(now)
                    .bind(project.id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to update project")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(UPDATE_SQL)
                    .bind(&project.title_en)
                    .bind(&project.title_fr)
                    .bind(&project.description_en)
                    .bind(&project.description_fr)
                    .bind(&project.link)
                    .bind(&project.image_url)
                    .bind(now)
                    .bind(project.id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to update project")?;
            }
        }

        Ok(Project {
            updated_at: now,
            ..project.clone()
        })
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let sql = "DELETE FROM projects WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to delete project")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to delete project")?;
            }
        }
        Ok(())
    }
}

/// Row wrapper so the mapper can be shared between drivers
enum RowRef<'a> {
    Sqlite(&'a sqlx::sqlite::SqliteRow),
    Mysql(&'a sqlx::mysql::MySqlRow),
}

fn row_to_project(row: &RowRef<'_>) -> Project {
    match row {
        RowRef::Sqlite(r) => Project {
            id: r.get("id"),
            title_en: r.get("title_en"),
            title_fr: r.get("title_fr"),
            description_en: r.get("description_en"),
            description_fr: r.get("description_fr"),
            link: r.get("link"),
            image_url: r.get("image_url"),
            posted_on: r.get("posted_on"),
            created_at: r.get("created_at"),
            updated_at: r.get("updated_at"),
        },
        RowRef::Mysql(r) => Project {
            id: r.get("id"),
            title_en: r.get("title_en"),
            title_fr: r.get("title_fr"),
            description_en: r.get("description_en"),
            description_fr: r.get("description_fr"),
            link: r.get("link"),
            image_url: r.get("image_url"),
            posted_on: r.get("posted_on"),
            created_at: r.get("created_at"),
            updated_at: r.get("updated_at"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> SqlxProjectRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxProjectRepository::new(pool)
    }

    fn make_project(n: u32) -> Project {
        let now = Utc::now();
        Project {
            id: 0,
            title_en: format!("Project {}", n),
            title_fr: format!("Projet {}", n),
            description_en: Some("Description".to_string()),
            description_fr: None,
            link: None,
            image_url: None,
            posted_on: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_project_crud() {
        let repo = setup().await;

        let created = repo.create(&make_project(1)).await.unwrap();
        assert!(created.id > 0);

        let found = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.title_fr, "Projet 1");
        assert_eq!(found.description_fr, None);

        let mut updated = found.clone();
        updated.link = Some("https://example.org".to_string());
        repo.update(&updated).await.unwrap();
        let found = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.link.as_deref(), Some("https://example.org"));

        repo.delete(created.id).await.unwrap();
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_project_pagination() {
        let repo = setup().await;
        for n in 1..=7 {
            repo.create(&make_project(n)).await.unwrap();
        }

        let (items, total) = repo.list(&ListParams::new(1, 5)).await.unwrap();
        assert_eq!(items.len(), 5);
        assert_eq!(total, 7);

        let (items, _) = repo.list(&ListParams::new(2, 5)).await.unwrap();
        assert_eq!(items.len(), 2);
    }
}
