//! Asset repository
//!
//! Includes a language-aware search over titles and descriptions.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Asset, Lang, ListParams};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::sync::Arc;

/// Asset repository trait
#[async_trait]
pub trait AssetRepository: Send + Sync {
    /// Create a new asset
    async fn create(&self, asset: &Asset) -> Result<Asset>;

    /// Get asset by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Asset>>;

    /// List assets, most recently uploaded first
    async fn list(&self, params: &ListParams) -> Result<(Vec<Asset>, i64)>;

    /// Search assets by title or description in the given language
    async fn search(
        &self,
        query: &str,
        lang: Lang,
        params: &ListParams,
    ) -> Result<(Vec<Asset>, i64)>;

    /// Update an asset (full row)
    async fn update(&self, asset: &Asset) -> Result<Asset>;

    /// Delete an asset
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based asset repository implementation
pub struct SqlxAssetRepository {
    pool: DynDatabasePool,
}

impl SqlxAssetRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn AssetRepository> {
        Arc::new(Self::new(pool))
    }
}

const ASSET_COLUMNS: &str = "id, title_en, title_fr, description_en, description_fr, file_url, \
     file_type, file_size, uploaded_on";

const INSERT_SQL: &str = "INSERT INTO assets (title_en, title_fr, description_en, description_fr, \
     file_url, file_type, file_size, uploaded_on) VALUES (?, ?, ?, ?, ?, ?, ?, ?)";

const UPDATE_SQL: &str = "UPDATE assets SET title_en = ?, title_fr = ?, description_en = ?, \
     description_fr = ?, file_url = ?, file_type = ?, file_size = ? WHERE id = ?";

fn search_filter(lang: Lang) -> &'static str {
    match lang {
        Lang::En => " WHERE (title_en LIKE ? OR description_en LIKE ?)",
        Lang::Fr => " WHERE (title_fr LIKE ? OR description_fr LIKE ?)",
    }
}

#[async_trait]
impl AssetRepository for SqlxAssetRepository {
    async fn create(&self, asset: &Asset) -> Result<Asset> {
        let now = Utc::now();

        let id = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(INSERT_SQL)
                .bind(&asset.title_en)
                .bind(&asset.title_fr)
                .bind(&asset.description_en)
                .bind(&asset.description_fr)
                .bind(&asset.file_url)
                .bind(&asset.file_type)
                .bind(asset.file_size)
                .bind(now)
                .execute(self.pool.as_sqlite().unwrap())
                .await
                .context("Failed to create asset")?
                .last_insert_rowid(),
            DatabaseDriver::Mysql => sqlx::query(INSERT_SQL)
                .bind(&asset.title_en)
                .bind(&asset.title_fr)
                .bind(&asset.description_en)
                .bind(&asset.description_fr)
                .bind(&asset.file_url)
                .bind(&asset.file_type)
                .bind(asset.file_size)
                .bind(now)
                .execute(self.pool.as_mysql().unwrap())
                .await
                .context("Failed to create asset")?
                .last_insert_id() as i64,
        };

        Ok(Asset {
            id,
            uploaded_on: now,
            ..asset.clone()
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Asset>> {
        let sql = format!("SELECT {} FROM assets WHERE id = ?", ASSET_COLUMNS);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to get asset")?;
                Ok(row.map(|r| row_to_asset(&RowRef::Sqlite(&r))))
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to get asset")?;
                Ok(row.map(|r| row_to_asset(&RowRef::Mysql(&r))))
            }
        }
    }

    async fn list(&self, params: &ListParams) -> Result<(Vec<Asset>, i64)> {
        let count_sql = "SELECT COUNT(*) as count FROM assets";
        let list_sql = format!(
            "SELECT {} FROM assets ORDER BY uploaded_on DESC LIMIT ? OFFSET ?",
            ASSET_COLUMNS
        );

        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let pool = self.pool.as_sqlite().unwrap();
                let total: i64 = sqlx::query(count_sql)
                    .fetch_one(pool)
                    .await
                    .context("Failed to count assets")?
                    .get("count");
                let rows = sqlx::query(&list_sql)
                    .bind(params.limit())
                    .bind(params.offset())
                    .fetch_all(pool)
                    .await
                    .context("Failed to list assets")?;
                Ok((
                    rows.iter().map(|r| row_to_asset(&RowRef::Sqlite(r))).collect(),
                    total,
                ))
            }
            DatabaseDriver::Mysql => {
                let pool = self.pool.as_mysql().unwrap();
                let total: i64 = sqlx::query(count_sql)
                    .fetch_one(pool)
                    .await
                    .context("Failed to count assets")?
                    .get("count");
                let rows = sqlx::query(&list_sql)
                    .bind(params.limit())
                    .bind(params.offset())
                    .fetch_all(pool)
                    .await
                    .context("Failed to list assets")?;
                Ok((
                    rows.iter().map(|r| row_to_asset(&RowRef::Mysql(r))).collect(),
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
    ) -> Result<(Vec<Asset>, i64)> {
        let pattern = format!("%{}%", query);
        let filter = search_filter(lang);
        let count_sql = format!("SELECT COUNT(*) as count FROM assets{}", filter);
        let list_sql = format!(
            "SELECT {} FROM assets{} ORDER BY uploaded_on DESC LIMIT ? OFFSET ?",
            ASSET_COLUMNS, filter
        );

        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let pool = self.pool.as_sqlite().unwrap();
                let total: i64 = sqlx::query(&count_sql)
                    .bind(&pattern)
                    .bind(&pattern)
                    .fetch_one(pool)
                    .await
                    .context("Failed to count asset search results")?
                    .get("count");
                let rows = sqlx::query(&list_sql)
                    .bind(&pattern)
                    .bind(&pattern)
                    .bind(params.limit())
                    .bind(params.offset())
                    .fetch_all(pool)
                    .await
                    .context("Failed to search assets")?;
                Ok((
                    rows.iter().map(|r| row_to_asset(&RowRef::Sqlite(r))).collect(),
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
                    .context("Failed to count asset search results")?
                    .get("count");
                let rows = sqlx::query(&list_sql)
                    .bind(&pattern)
                    .bind(&pattern)
                    .bind(params.limit())
                    .bind(params.offset())
                    .fetch_all(pool)
                    .await
                    .context("Failed to search assets")?;
                Ok((
                    rows.iter().map(|r| row_to_asset(&RowRef::Mysql(r))).collect(),
                    total,
                ))
            }
        }
    }

    async fn update(&self, asset: &Asset) -> Result<Asset> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(UPDATE_SQL)
                    .bind(&asset.title_en)
                    .bind(&asset.title_fr)
                    .bind(&asset.description_en)
                    .bind(&asset.description_fr)
                    .bind(&asset.file_url)
                    .bind(&asset.file_type)
                    .bind(asset.file_size)
                    .bind(asset.id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to update asset")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(UPDATE_SQL)
                    .bind(&asset.title_en)
                    .bind(&asset.title_fr)
                    .bind(&asset.description_en)
                    .bind(&asset.description_fr)
                    .bind(&asset.file_url)
                    .bind(&asset.file_type)
                    .bind(asset.file_size)
                    .bind(asset.id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to update asset")?;
            }
        }
        Ok(asset.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let sql = "DELETE FROM assets WHERE id = ?";
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_sqlite().unwrap())
                    .await
                    .context("Failed to delete asset")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(sql)
                    .bind(id)
                    .execute(self.pool.as_mysql().unwrap())
                    .await
                    .context("Failed to delete asset")?;
            }
        }
        Ok(())
    }
}

enum RowRef<'a> {
    Sqlite(&'a sqlx::sqlite::SqliteRow),
    Mysql(&'a sqlx::mysql::MySqlRow),
}

fn row_to_asset(row: &RowRef<'_>) -> Asset {
    match row {
        RowRef::Sqlite(r) => Asset {
            id: r.get("id"),
            title_en: r.get("title_en"),
            title_fr: r.get("title_fr"),
            description_en: r.get("description_en"),
            description_fr: r.get("description_fr"),
            file_url: r.get("file_url"),
            file_type: r.get("file_type"),
            file_size: r.get("file_size"),
            uploaded_on: r.get("uploaded_on"),
        },
        RowRef::Mysql(r) => Asset {
            id: r.get("id"),
            title_en: r.get("title_en"),
            title_fr: r.get("title_fr"),
            description_en: r.get("description_en"),
            description_fr: r.get("description_fr"),
            file_url: r.get("file_url"),
            file_type: r.get("file_type"),
            file_size: r.get("file_size"),
            uploaded_on: r.get("uploaded_on"),
        },
    }
}
