//! Switch Area Repository
//!
//! Owns the boundary-line cascade lifecycle: creating an area persists its
//! segments in the same transaction, deleting an area removes its segments,
//! its own neighbor relations and every relation naming it as a neighbor
//! before the row itself goes away.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{AreaNeighbor, SwitchArea, SwitchLine};
use crate::geometry::{LINE_TYPE_BOUNDARY, SegmentSpec};
use serde::Deserialize;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use uuid::Uuid;

const TABLE: &str = "switch_area";

/// Explicit filter for area queries (no runtime-built predicate trees)
#[derive(Debug, Clone, Default)]
pub struct AreaFilter {
    /// Match `area_id` by prefix
    pub area_id_prefix: Option<String>,
    /// Match the map association
    pub map_id: Option<i64>,
    /// With `map_id`: widen the match to "this map or any assigned map"
    pub any_assigned: bool,
    /// Exclude one area (used by the neighbor-selection listing)
    pub exclude: Option<RecordId>,
    /// `(page_no 1-based, page_size)`
    pub page: Option<(usize, usize)>,
}

/// One row of the zone-count report, grouped by map association
#[derive(Debug, Clone, Deserialize)]
pub struct MapAreaCount {
    pub map_id: Option<i64>,
    pub count: i64,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    count: i64,
}

/// Map a unique-index violation onto `Duplicate`, everything else onto
/// `Database`
fn map_write_err(err: surrealdb::Error) -> RepoError {
    let msg = err.to_string();
    if msg.contains("switch_area_area_id") || msg.contains("switch_area_area_no") {
        RepoError::Duplicate(format!("Switch area already exists: {msg}"))
    } else if msg.contains("area_neighbor_link") {
        RepoError::Duplicate(format!("Neighbor relation already exists: {msg}"))
    } else {
        RepoError::Database(msg)
    }
}

#[derive(Clone)]
pub struct SwitchAreaRepository {
    base: BaseRepository,
}

impl SwitchAreaRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn lines_from_segments(area: &RecordId, segments: &[SegmentSpec]) -> Vec<SwitchLine> {
        segments
            .iter()
            .map(|s| SwitchLine {
                id: None,
                area: area.clone(),
                line_type: LINE_TYPE_BOUNDARY,
                poly_index: s.poly_index,
                sx: s.sx,
                sy: s.sy,
                tx: s.tx,
                ty: s.ty,
            })
            .collect()
    }

    // ========== Point lookups ==========

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<SwitchArea>> {
        let area: Option<SwitchArea> = self.base.db().select(id.clone()).await?;
        Ok(area)
    }

    pub async fn find_by_area_id(&self, area_id: &str) -> RepoResult<Option<SwitchArea>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM switch_area WHERE area_id = $area_id LIMIT 1")
            .bind(("area_id", area_id.to_string()))
            .await?;
        Ok(result.take::<Vec<SwitchArea>>(0)?.into_iter().next())
    }

    pub async fn find_by_area_no(&self, area_no: i64) -> RepoResult<Option<SwitchArea>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM switch_area WHERE area_no = $area_no LIMIT 1")
            .bind(("area_no", area_no))
            .await?;
        Ok(result.take::<Vec<SwitchArea>>(0)?.into_iter().next())
    }

    // ========== Listings ==========

    pub async fn find_all(&self) -> RepoResult<Vec<SwitchArea>> {
        let areas: Vec<SwitchArea> = self
            .base
            .db()
            .query("SELECT * FROM switch_area ORDER BY area_no ASC")
            .await?
            .take(0)?;
        Ok(areas)
    }

    pub async fn find_all_by_ids(&self, ids: &[RecordId]) -> RepoResult<Vec<SwitchArea>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let areas: Vec<SwitchArea> = self
            .base
            .db()
            .query("SELECT * FROM switch_area WHERE id INSIDE $ids ORDER BY area_no ASC")
            .bind(("ids", ids.to_vec()))
            .await?
            .take(0)?;
        Ok(areas)
    }

    fn filter_clause(filter: &AreaFilter) -> String {
        let mut conds: Vec<&str> = Vec::new();
        if filter.area_id_prefix.is_some() {
            conds.push("string::starts_with(area_id, $prefix)");
        }
        if filter.map_id.is_some() {
            if filter.any_assigned {
                conds.push("(map_id = $map_id OR map_id >= 0)");
            } else {
                conds.push("map_id = $map_id");
            }
        }
        if filter.exclude.is_some() {
            conds.push("id != $exclude");
        }
        if conds.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conds.join(" AND "))
        }
    }

    /// Filtered listing, newest down-link number first
    pub async fn search(&self, filter: &AreaFilter) -> RepoResult<Vec<SwitchArea>> {
        let mut sql = format!(
            "SELECT * FROM switch_area{} ORDER BY area_no DESC",
            Self::filter_clause(filter)
        );
        if let Some((page_no, page_size)) = filter.page {
            let start = page_no.saturating_sub(1) * page_size;
            sql.push_str(&format!(" LIMIT {page_size} START {start}"));
        }
        let mut request = self.base.db().query(sql);
        if let Some(prefix) = &filter.area_id_prefix {
            request = request.bind(("prefix", prefix.clone()));
        }
        if let Some(map_id) = filter.map_id {
            request = request.bind(("map_id", map_id));
        }
        if let Some(exclude) = &filter.exclude {
            request = request.bind(("exclude", exclude.clone()));
        }
        let areas: Vec<SwitchArea> = request.await?.take(0)?;
        Ok(areas)
    }

    /// Row count for a filter, ignoring paging
    pub async fn count(&self, filter: &AreaFilter) -> RepoResult<i64> {
        let sql = format!(
            "SELECT count() AS count FROM switch_area{} GROUP ALL",
            Self::filter_clause(filter)
        );
        let mut request = self.base.db().query(sql);
        if let Some(prefix) = &filter.area_id_prefix {
            request = request.bind(("prefix", prefix.clone()));
        }
        if let Some(map_id) = filter.map_id {
            request = request.bind(("map_id", map_id));
        }
        if let Some(exclude) = &filter.exclude {
            request = request.bind(("exclude", exclude.clone()));
        }
        let row: Vec<CountRow> = request.await?.take(0)?;
        Ok(row.first().map(|r| r.count).unwrap_or(0))
    }

    /// Zone counts grouped by map association (`map_id = None` bucket included)
    pub async fn count_grouped_by_map(&self) -> RepoResult<Vec<MapAreaCount>> {
        let rows: Vec<MapAreaCount> = self
            .base
            .db()
            .query("SELECT map_id, count() AS count FROM switch_area GROUP BY map_id")
            .await?
            .take(0)?;
        Ok(rows)
    }

    // ========== Mutations ==========

    /// Persist a new area together with its boundary segments.
    ///
    /// The record key is generated client side so the segment inserts can ride
    /// the same transaction as the area row.
    pub async fn create(
        &self,
        area: SwitchArea,
        segments: &[SegmentSpec],
    ) -> RepoResult<SwitchArea> {
        let rid = RecordId::from_table_key(TABLE, Uuid::new_v4().simple().to_string());
        let lines = Self::lines_from_segments(&rid, segments);

        let mut sql = String::from("BEGIN TRANSACTION; CREATE $id CONTENT $area;");
        if !lines.is_empty() {
            sql.push_str(" INSERT INTO switch_line $lines;");
        }
        sql.push_str(" COMMIT TRANSACTION;");

        let mut request = self
            .base
            .db()
            .query(sql)
            .bind(("id", rid.clone()))
            .bind(("area", area));
        if !lines.is_empty() {
            request = request.bind(("lines", lines));
        }
        request.await?.check().map_err(map_write_err)?;

        self.find_by_id(&rid)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create switch area".into()))
    }

    /// Merge scalar fields into an existing area
    pub async fn update_merge(
        &self,
        id: &RecordId,
        merge: serde_json::Value,
    ) -> RepoResult<SwitchArea> {
        self.base
            .db()
            .query("UPDATE $id MERGE $data")
            .bind(("id", id.clone()))
            .bind(("data", merge))
            .await?
            .check()
            .map_err(map_write_err)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Switch area {id} not found")))
    }

    /// Replace the boundary of an area: merge the derived fields and swap the
    /// segment set, atomically
    pub async fn replace_boundary(
        &self,
        id: &RecordId,
        merge: serde_json::Value,
        segments: &[SegmentSpec],
    ) -> RepoResult<SwitchArea> {
        let lines = Self::lines_from_segments(id, segments);

        let mut sql = String::from(
            "BEGIN TRANSACTION; UPDATE $id MERGE $data; DELETE switch_line WHERE area = $id;",
        );
        if !lines.is_empty() {
            sql.push_str(" INSERT INTO switch_line $lines;");
        }
        sql.push_str(" COMMIT TRANSACTION;");

        let mut request = self
            .base
            .db()
            .query(sql)
            .bind(("id", id.clone()))
            .bind(("data", merge));
        if !lines.is_empty() {
            request = request.bind(("lines", lines));
        }
        request.await?.check().map_err(map_write_err)?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Switch area {id} not found")))
    }

    /// Replace the membership sets of an area
    pub async fn set_membership(
        &self,
        id: &RecordId,
        anchors: Vec<RecordId>,
        groups: Vec<RecordId>,
    ) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $id SET anchors = $anchors, anchor_groups = $groups")
            .bind(("id", id.clone()))
            .bind(("anchors", anchors))
            .bind(("groups", groups))
            .await?
            .check()?;
        Ok(())
    }

    /// Remove one area and everything hanging off it: relations naming it as
    /// a neighbor, its own relations, its boundary segments, then the row.
    pub async fn delete_cascade(&self, id: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query(
                "BEGIN TRANSACTION; \
                 DELETE area_neighbor WHERE neighbor_area = $id OR switch_area = $id; \
                 DELETE switch_line WHERE area = $id; \
                 DELETE $id; \
                 COMMIT TRANSACTION;",
            )
            .bind(("id", id.clone()))
            .await?
            .check()?;
        Ok(())
    }

    // ========== Boundary segments ==========

    /// Segments of an area in `poly_index` order
    pub async fn lines_of(&self, area: &RecordId) -> RepoResult<Vec<SwitchLine>> {
        let lines: Vec<SwitchLine> = self
            .base
            .db()
            .query("SELECT * FROM switch_line WHERE area = $area ORDER BY poly_index ASC")
            .bind(("area", area.clone()))
            .await?
            .take(0)?;
        Ok(lines)
    }

    // ========== Neighbor relations ==========

    pub async fn neighbors_of(&self, area: &RecordId) -> RepoResult<Vec<AreaNeighbor>> {
        let neighbors: Vec<AreaNeighbor> = self
            .base
            .db()
            .query("SELECT * FROM area_neighbor WHERE switch_area = $area")
            .bind(("area", area.clone()))
            .await?
            .take(0)?;
        Ok(neighbors)
    }

    pub async fn create_neighbor(&self, neighbor: AreaNeighbor) -> RepoResult<AreaNeighbor> {
        let created: Option<AreaNeighbor> = self
            .base
            .db()
            .create("area_neighbor")
            .content(neighbor)
            .await
            .map_err(map_write_err)?;
        created.ok_or_else(|| RepoError::Database("Failed to create neighbor relation".into()))
    }

    /// Delete one relation by id (individual deletes stay durable even when
    /// an in-memory relation set is stale)
    pub async fn delete_neighbor(&self, id: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE $id")
            .bind(("id", id.clone()))
            .await?
            .check()?;
        Ok(())
    }

    /// Every relation in the store, regardless of side (diagnostics/tests)
    pub async fn all_neighbors(&self) -> RepoResult<Vec<AreaNeighbor>> {
        let neighbors: Vec<AreaNeighbor> = self
            .base
            .db()
            .query("SELECT * FROM area_neighbor")
            .await?
            .take(0)?;
        Ok(neighbors)
    }
}
