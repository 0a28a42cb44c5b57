//! System Config Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::SysConfig;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "sys_config";

#[derive(Clone)]
pub struct SysConfigRepository {
    base: BaseRepository,
}

impl SysConfigRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_code(&self, cfg_code: &str) -> RepoResult<Option<SysConfig>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM sys_config WHERE cfg_code = $code LIMIT 1")
            .bind(("code", cfg_code.to_string()))
            .await?;
        Ok(result.take::<Vec<SysConfig>>(0)?.into_iter().next())
    }

    /// Create the record or replace its value, keyed by `cfg_code`
    pub async fn set_value(&self, cfg_code: &str, cfg_val: &str) -> RepoResult<SysConfig> {
        if let Some(existing) = self.find_by_code(cfg_code).await? {
            let id = existing
                .id
                .ok_or_else(|| RepoError::Database("Config record without id".into()))?;
            self.base
                .db()
                .query("UPDATE $id SET cfg_val = $val")
                .bind(("id", id))
                .bind(("val", cfg_val.to_string()))
                .await?
                .check()?;
            return self
                .find_by_code(cfg_code)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Config {cfg_code} not found")));
        }
        let created: Option<SysConfig> = self
            .base
            .db()
            .create(TABLE)
            .content(SysConfig {
                id: None,
                cfg_code: cfg_code.to_string(),
                cfg_val: cfg_val.to_string(),
            })
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create config record".into()))
    }
}
