//! Anchor Group Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::AnchorGroup;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "anchor_group";

#[derive(Clone)]
pub struct AnchorGroupRepository {
    base: BaseRepository,
}

impl AnchorGroupRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all_by_ids(&self, ids: &[RecordId]) -> RepoResult<Vec<AnchorGroup>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let groups: Vec<AnchorGroup> = self
            .base
            .db()
            .query("SELECT * FROM anchor_group WHERE id INSIDE $ids ORDER BY name ASC")
            .bind(("ids", ids.to_vec()))
            .await?
            .take(0)?;
        Ok(groups)
    }

    pub async fn create(&self, group: AnchorGroup) -> RepoResult<AnchorGroup> {
        let created: Option<AnchorGroup> = self.base.db().create(TABLE).content(group).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create anchor group".into()))
    }
}
