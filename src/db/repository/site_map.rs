//! Site Map Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::SiteMap;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "site_map";

#[derive(Clone)]
pub struct SiteMapRepository {
    base: BaseRepository,
}

impl SiteMapRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<SiteMap>> {
        let maps: Vec<SiteMap> = self
            .base
            .db()
            .query("SELECT * FROM site_map ORDER BY map_no ASC")
            .await?
            .take(0)?;
        Ok(maps)
    }

    pub async fn create(&self, map: SiteMap) -> RepoResult<SiteMap> {
        let created: Option<SiteMap> = self.base.db().create(TABLE).content(map).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create site map".into()))
    }
}
