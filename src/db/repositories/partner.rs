//! Partner repository

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::Partner;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::sync::Arc;

/// Partner repository trait
#[async_trait]
pub trait PartnerRepository: Send + Sync {
    /// Create a new partner
    async fn create(&self, partner: &Partner) -> Result<Partner>;

    /// Get partner by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Partner>>;

    /// List all partners, most recently added first
    async fn list(&self) -> Result<Vec<Partner>>;

    /// Update a partner (full row)
    async fn update(&self, partner: &Partner) -> Result<Partner>;

    /// Delete a partner
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based partner repository implementation
pub struct SqlxPartnerRepository {
    pool: DynDatabasePool,
}

impl SqlxPartnerRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn PartnerRepository> {
        Arc::new(Self::new(pool))
    }
}

const PARTNER_COLUMNS: &str =
    "id, name_en, name_fr, description_en, description_fr, logo_url, website, added_on";

const INSERT_SQL: &str = "INSERT INTO partners (name_en, name_fr, description_en, description_fr, \
     logo_url, website, added_on) VALUES (?, ?, ?, ?, ?, ?, ?)";

const UPDATE_SQL: &str = "UPDATE partners SET name_en = ?, name_fr = ?, description_en = ?, \
     description_fr = ?, logo_url = ?, website = ? WHERE id = ?";

#[async_trait]
impl PartnerRepository for SqlxPartnerRepository {
    async fn create(&self, partner: &Partner) -> Result<Partner> {
        let now = Utc::now();

        let id = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(INSERT_SQL)
                .bind(&partner.name_en)
                .bind(&partner.name_fr)
                .bind(&partner.description_en)
                .bind(&partner.description_fr)
                .bind(&partner.logo_url)
                .bind(&partner.website)
                .bind(now)
                .execute(self.pool.as_sqlite().unwrap())
                .await
                .context("Failed to create partner")?
                .last_insert_rowid(),
            DatabaseDriver::Mysql => sqlx::query(INSERT_SQL)
                .bind(&partner.name_en)
                .bind(&partner.name_fr)
                .bind(&partner.description_en)
                .bind(&partner.description_fr)
                .bind(&partner.logo_url)
                .bind(&partner.website)
                .bind(now)
                .execute(self.pool.as_mysql().unwrap())
                .await
                .context("Failed to create partner")?
                .last_insert_id() as i64,
        };

        Ok(Partner {
            id,
            added_on: now,
            ..partner.clone()
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Partner>> {
        let sql = format!("SELECT {} FROM partners WHERE id = ?", PARTNER_COLUMNS);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to get partner")?;
                Ok(row.map(|r| row_to_partner(&RowRef::Sqlite(&r))))
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to get partner")?;
                Ok(row.map(|r| row_to_partner(&RowRef::Mysql(&r))))
            }
        }
    }

    async fn list(&self) -> Result<Vec<Partner>> {
        let sql = format!(
            "SELECT {} FROM partners ORDER BY added_on DESC",
            PARTNER_COLUMNS
        );
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(&sql)
                    .fetch_all(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to list partners")?;
                Ok(rows.iter().map(|r| row_to_partner(&RowRef::Sqlite(r))).collect())
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(&sql)
                    .fetch_all(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to list partners")?;
                Ok(rows.iter().map(|r| row_to_partner(&RowRef::Mysql(r))).collect())
            }
        }
    }

    async fn update(&self, partner: &Partner) -> Result<Partner> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(UPDATE_SQL)
                    .bind(&partner.name_en)
                    .bind(&partner.name_fr)
                    .bind(&partner.description_en)
                    .bind(&partner.description_fr)
                    .bind(&partner.logo_url)
                    .bind(&partner.website)
                    .bind(partner.id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to update partner")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(UPDATE_SQL)
                    .bind(&partner.name_en)
                    .bind(&partner.name_fr)
                    .bind(&partner.description_en)
                    .bind(&partner.description_fr)
                    .bind(&partner.logo_url)
                    .bind(&partner.website)
                    .bind(partner.id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to update partner")?;
            }
        }

        Ok(partner.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let sql = "DELETE FROM partners WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to delete partner")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to delete partner")?;
            }
        }
        Ok(())
    }
}

enum RowRef<'a> {
    Sqlite(&'a sqlx::sqlite::SqliteRow),
    Mysql(&'a sqlx::mysql::MySqlRow),
}

fn row_to_partner(row: &RowRef<'_>) -> Partner {
    match row {
        RowRef::Sqlite(r) => Partner {
            id: r.get("id"),
            name_en: r.get("name_en"),
            name_fr: r.get("name_fr"),
            description_en: r.get("description_en"),
            description_fr: r.get("description_fr"),
            logo_url: r.get("logo_url"),
            website: r.get("website"),
            added_on: r.get("added_on"),
        },
        RowRef::Mysql(r) => Partner {
            id: r.get("id"),
            name_en: r.get("name_en"),
            name_fr: r.get("name_fr"),
            description_en: r.get("description_en"),
            description_fr: r.get("description_fr"),
            logo_url: r.get("logo_url"),
            website: r.get("website"),
            added_on: r.get("added_on"),
        },
    }
}
