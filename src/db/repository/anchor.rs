//! Anchor Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Anchor, AnchorConfig};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "anchor";
const CONFIG_TABLE: &str = "anchor_config";

#[derive(Clone)]
pub struct AnchorRepository {
    base: BaseRepository,
}

impl AnchorRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Anchor>> {
        let anchor: Option<Anchor> = self.base.db().select(id.clone()).await?;
        Ok(anchor)
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Anchor>> {
        let anchors: Vec<Anchor> = self
            .base
            .db()
            .query("SELECT * FROM anchor ORDER BY anchor_id ASC")
            .await?
            .take(0)?;
        Ok(anchors)
    }

    pub async fn find_all_by_ids(&self, ids: &[RecordId]) -> RepoResult<Vec<Anchor>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let anchors: Vec<Anchor> = self
            .base
            .db()
            .query("SELECT * FROM anchor WHERE id INSIDE $ids ORDER BY anchor_id ASC")
            .bind(("ids", ids.to_vec()))
            .await?
            .take(0)?;
        Ok(anchors)
    }

    pub async fn create(&self, anchor: Anchor) -> RepoResult<Anchor> {
        let created: Option<Anchor> = self.base.db().create(TABLE).content(anchor).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create anchor".into()))
    }

    // ========== Per-anchor config (one-to-one by hardware id) ==========

    pub async fn find_config(&self, anchor_id: &str) -> RepoResult<Option<AnchorConfig>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM anchor_config WHERE anchor_id = $anchor_id LIMIT 1")
            .bind(("anchor_id", anchor_id.to_string()))
            .await?;
        Ok(result.take::<Vec<AnchorConfig>>(0)?.into_iter().next())
    }

    /// All configs, used for the reporting-interval statistics
    pub async fn all_configs(&self) -> RepoResult<Vec<AnchorConfig>> {
        let configs: Vec<AnchorConfig> = self
            .base
            .db()
            .query("SELECT * FROM anchor_config")
            .await?
            .take(0)?;
        Ok(configs)
    }

    pub async fn save_config(&self, config: AnchorConfig) -> RepoResult<AnchorConfig> {
        let created: Option<AnchorConfig> =
            self.base.db().create(CONFIG_TABLE).content(config).await?;
        created.ok_or_else(|| RepoError::Database("Failed to save anchor config".into()))
    }
}
