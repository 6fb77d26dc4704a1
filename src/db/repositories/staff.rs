//! Staff repository

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{ListParams, Staff};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::sync::Arc;

/// Staff repository trait
#[async_trait]
pub trait StaffRepository: Send + Sync {
    /// Create a new staff member
    async fn create(&self, staff: &Staff) -> Result<Staff>;

    /// Get staff member by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Staff>>;

    /// List staff members, optionally filtered by department (matched
    /// against either language), most recent first
    async fn list(
        &self,
        department: Option<&str>,
        params: &ListParams,
    ) -> Result<(Vec<Staff>, i64)>;

    /// Update a staff member (full row)
    async fn update(&self, staff: &Staff) -> Result<Staff>;

    /// Delete a staff member
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based staff repository implementation
pub struct SqlxStaffRepository {
    pool: DynDatabasePool,
}

impl SqlxStaffRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn StaffRepository> {
        Arc::new(Self::new(pool))
    }
}

const STAFF_COLUMNS: &str = "id, name_en, name_fr, position_en, position_fr, department_en, \
     department_fr, bio_en, bio_fr, photo_url, email, phone, created_at, updated_at";

const INSERT_SQL: &str = "INSERT INTO staff (name_en, name_fr, position_en, position_fr, \
     department_en, department_fr, bio_en, bio_fr, photo_url, email, phone, created_at, updated_at) \
     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

const UPDATE_SQL: &str = "UPDATE staff SET name_en = ?, name_fr = ?, position_en = ?, \
     position_fr = ?, department_en = ?, department_fr = ?, bio_en = ?, bio_fr = ?, \
     photo_url = ?, email = ?, phone = ?, updated_at = ? WHERE id = ?";

const DEPARTMENT_FILTER: &str = " WHERE (department_en = ? OR department_fr = ?)";

#[async_trait]
impl StaffRepository for SqlxStaffRepository {
    async fn create(&self, staff: &Staff) -> Result<Staff> {
        let now = Utc::now();

        let id = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(INSERT_SQL)
                .bind(&staff.name_en)
                .bind(&staff.name_fr)
                .bind(&staff.position_en)
                .bind(&staff.position_fr)
                .bind(&staff.department_en)
                .bind(&staff.department_fr)
                .bind(&staff.bio_en)
                .bind(&staff.bio_fr)
                .bind(&staff.photo_url)
                .bind(&staff.email)
                .bind(&staff.phone)
                .bind(now)
                .bind(now)
                .execute(self.pool.as_sqlite().unwrap())
                .await
                .context("Failed to create staff member")?
                .last_insert_rowid(),
            DatabaseDriver::Mysql => sqlx::query(INSERT_SQL)
                .bind(&staff.name_en)
                .bind(&staff.name_fr)
                .bind(&staff.position_en)
                .bind(&staff.position_fr)
                .bind(&staff.department_en)
                .bind(&staff.department_fr)
                .bind(&staff.bio_en)
                .bind(&staff.bio_fr)
                .bind(&staff.photo_url)
                .bind(&staff.email)
                .bind(&staff.phone)
                .bind(now)
                .bind(now)
                .execute(self.pool.as_mysql().unwrap())
                .await
                .context("Failed to create staff member")?
                .last_insert_id() as i64,
        };

        Ok(Staff {
            id,
            created_at: now,
            updated_at: now,
            ..staff.clone()
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Staff>> {
        let sql = format!("SELECT {} FROM staff WHERE id = ?", STAFF_COLUMNS);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to get staff member")?;
                Ok(row.map(|r| row_to_staff(&RowRef::Sqlite(&r))))
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to get staff member")?;
                Ok(row.map(|r| row_to_staff(&RowRef::Mysql(&r))))
            }
        }
    }

    async fn list(
        &self,
        department: Option<&str>,
        params: &ListParams,
    ) -> Result<(Vec<Staff>, i64)> {
        let where_clause = if department.is_some() {
            DEPARTMENT_FILTER
        } else {
            ""
        };
        let count_sql = format!("SELECT COUNT(*) as count FROM staff{}", where_clause);
        let list_sql = format!(
            "SELECT {} FROM staff{} ORDER BY created_at DESC LIMIT ? OFFSET ?",
            STAFF_COLUMNS, where_clause
        );

        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let pool = self.pool.as_sqlite().unwrap();
                let mut count_query = sqlx::query(&count_sql);
                if let Some(dept) = department {
                    count_query = count_query.bind(dept).bind(dept);
                }
                let total: i64 = count_query
                    .fetch_one(pool)
                    .await
                    .context("Failed to count staff")?
                    .get("count");

                let mut list_query = sqlx::query(&list_sql);
                if let Some(dept) = department {
                    list_query = list_query.bind(dept).bind(dept);
                }
                let rows = list_query
                    .bind(params.limit())
                    .bind(params.offset())
                    .fetch_all(pool)
                    .await
                    .context("Failed to list staff")?;
                Ok((
                    rows.iter().map(|r| row_to_staff(&RowRef::Sqlite(r))).collect(),
                    total,
                ))
            }
            DatabaseDriver::Mysql => {
                let pool = self.pool.as_mysql().unwrap();
                let mut count_query = sqlx::query(&count_sql);
                if let Some(dept) = department {
                    count_query = count_query.bind(dept).bind(dept);
                }
                let total: i64 = count_query
                    .fetch_one(pool)
                    .await
                    .context("Failed to count staff")?
                    .get("count");

                let mut list_query = sqlx::query(&list_sql);
                if let Some(dept) = department {
                    list_query = list_query.bind(dept).bind(dept);
                }
                let rows = list_query
                    .bind(params.limit())
                    .bind(params.offset())
                    .fetch_all(pool)
                    .await
                    .context("Failed to list staff")?;
                Ok((
                    rows.iter().map(|r| row_to_staff(&RowRef::Mysql(r))).collect(),
                    total,
                ))
            }
        }
    }

    async fn update(&self, staff: &Staff) -> Result<Staff> {
        let now = Utc::now();

        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(UPDATE_SQL)
                    .bind(&staff.name_en)
                    .bind(&staff.name_fr)
                    .bind(&staff.position_en)
                    .bind(&staff.position_fr)
                    .bind(&staff.department_en)
                    .bind(&staff.department_fr)
                    .bind(&staff.bio_en)
                    .bind(&staff.bio_fr)
                    .bind(&staff.photo_url)
                    .bind(&staff.email)
                    .bind(&staff.phone)
                    .bind(now)
                    .bind(staff.id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to update staff member")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(UPDATE_SQL)
                    .bind(&staff.name_en)
                    .bind(&staff.name_fr)
                    .bind(&staff.position_en)
                    .bind(&staff.position_fr)
                    .bind(&staff.department_en)
                    .bind(&staff.department_fr)
                    .bind(&staff.bio_en)
                    .bind(&staff.bio_fr)
                    .bind(&staff.photo_url)
                    .bind(&staff.email)
                    .bind(&staff.phone)
                    .bind(now)
                    .bind(staff.id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to update staff member")?;
            }
        }

        Ok(Staff {
            updated_at: now,
            ..staff.clone()
        })
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let sql = "DELETE FROM staff WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to delete staff member")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to delete staff member")?;
            }
        }
        Ok(())
    }
}

enum RowRef<'a> {
    Sqlite(&'a sqlx::sqlite::SqliteRow),
    Mysql(&'a sqlx::mysql::MySqlRow),
}

fn row_to_staff(row: &RowRef<'_>) -> Staff {
    match row {
        RowRef::Sqlite(r) => Staff {
            id: r.get("id"),
            name_en: r.get("name_en"),
            name_fr: r.get("name_fr"),
            position_en: r.get("position_en"),
            position_fr: r.get("position_fr"),
            department_en: r.get("department_en"),
            department_fr: r.get("department_fr"),
            bio_en: r.get("bio_en"),
            bio_fr: r.get("bio_fr"),
            photo_url: r.get("photo_url"),
            email: r.get("email"),
            phone: r.get("phone"),
            created_at: r.get("created_at"),
            updated_at: r.get("updated_at"),
        },
        RowRef::Mysql(r) => Staff {
            id: r.get("id"),
            name_en: r.get("name_en"),
            name_fr: r.get("name_fr"),
            position_en: r.get("position_en"),
            position_fr: r.get("position_fr"),
            department_en: r.get("department_en"),
            department_fr: r.get("department_fr"),
            bio_en: r.get("bio_en"),
            bio_fr: r.get("bio_fr"),
            photo_url: r.get("photo_url"),
            email: r.get("email"),
            phone: r.get("phone"),
            created_at: r.get("created_at"),
            updated_at: r.get("updated_at"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> SqlxStaffRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxStaffRepository::new(pool)
    }

    fn make_staff(name: &str, department: Option<&str>) -> Staff {
        let now = Utc::now();
        Staff {
            id: 0,
            name_en: name.to_string(),
            name_fr: name.to_string(),
            position_en: "Engineer".to_string(),
            position_fr: "Ingénieur".to_string(),
            department_en: department.map(String::from),
            department_fr: department.map(|d| format!("{} (fr)", d)),
            bio_en: None,
            bio_fr: None,
            photo_url: None,
            email: None,
            phone: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_staff_crud() {
        let repo = setup().await;
        let created = repo.create(&make_staff("Alice", Some("IT"))).await.unwrap();
        assert!(created.id > 0);

        let mut updated = repo.get_by_id(created.id).await.unwrap().unwrap();
        updated.phone = Some("+237 600 000 000".to_string());
        repo.update(&updated).await.unwrap();

        let found = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.phone.as_deref(), Some("+237 600 000 000"));

        repo.delete(created.id).await.unwrap();
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_staff_department_filter() {
        let repo = setup().await;
        repo.create(&make_staff("Alice", Some("IT"))).await.unwrap();
        repo.create(&make_staff("Bob", Some("Finance"))).await.unwrap();
        repo.create(&make_staff("Carol", None)).await.unwrap();

        let (all, total) = repo.list(None, &ListParams::new(1, 20)).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(total, 3);

        let (it_only, total) = repo
            .list(Some("IT"), &ListParams::new(1, 20))
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(it_only[0].name_en, "Alice");

        // The French department column is matched too
        let (fr_match, _) = repo
            .list(Some("Finance (fr)"), &ListParams::new(1, 20))
            .await
            .unwrap();
        assert_eq!(fr_match.len(), 1);
        assert_eq!(fr_match[0].name_en, "Bob");
    }
}
