//! Switch Area Service
//!
//! Management façade over the area store: geometry lifecycle, neighbor graph,
//! anchor/group membership and the map-level reports. Every structural
//! create/delete pushes a delta to the injected [`TopologyNotifier`] so the
//! runtime map never drifts from persisted state.

use crate::core::Config;
use crate::db::models::{Anchor, AreaNeighbor, SwitchArea, SwitchAreaCreate, SwitchAreaUpdate, SwitchLine};
use crate::db::repository::{
    AnchorGroupRepository, AnchorRepository, AreaFilter, SiteMapRepository, SwitchAreaRepository,
};
use crate::geometry::{self, GraphicsType, LINE_TYPE_BOUNDARY};
use crate::services::anchor_version::AnchorVersionTable;
use crate::services::module_map::TopologyNotifier;
use crate::utils::{AppError, AppResult, Page};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;
use validator::Validate;

/// Border type: area carries a drawn boundary
pub const BORDER_TYPE_BOUNDED: i32 = 1;

/// Parse a comma-separated record-id list, skipping unparseable tokens
pub fn parse_id_csv(ids: &str) -> Vec<RecordId> {
    ids.split(',')
        .filter_map(|token| token.trim().parse::<RecordId>().ok())
        .collect()
}

/// Display row for map rendering: identity, color and type-1 boundary lines
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaDisplay {
    pub id: RecordId,
    pub area_id: String,
    pub show_color: Option<String>,
    pub lines: Vec<SwitchLine>,
}

/// Zone-count report grouped by map
///
/// When unassigned areas exist the per-map breakdown is meaningless to the
/// operator; the report then carries the total per map and flags it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaGroupReport {
    pub has_unassigned: bool,
    pub counts: HashMap<String, i64>,
}

/// One candidate area for an anchor's region lookup
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorRegionCandidate {
    pub anchor_id: String,
    pub area_no: i64,
    pub distance: f64,
}

#[derive(Clone)]
pub struct SwitchAreaService {
    db: Surreal<Db>,
    notifier: Arc<dyn TopologyNotifier>,
    anchor_versions: Arc<AnchorVersionTable>,
    config: Config,
}

impl SwitchAreaService {
    pub fn new(
        db: Surreal<Db>,
        notifier: Arc<dyn TopologyNotifier>,
        anchor_versions: Arc<AnchorVersionTable>,
        config: Config,
    ) -> Self {
        Self {
            db,
            notifier,
            anchor_versions,
            config,
        }
    }

    fn areas(&self) -> SwitchAreaRepository {
        SwitchAreaRepository::new(self.db.clone())
    }

    fn anchors(&self) -> AnchorRepository {
        AnchorRepository::new(self.db.clone())
    }

    async fn require_area(&self, id: &RecordId) -> AppResult<SwitchArea> {
        self.areas()
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Switch area {id} not found")))
    }

    // ========== Queries ==========

    /// Paged listing filtered by external-id prefix, newest first
    pub async fn areas_paged(
        &self,
        area_id_prefix: Option<&str>,
        page_no: usize,
        page_size: usize,
    ) -> AppResult<Page<SwitchArea>> {
        let page_no = page_no.max(1);
        let filter = AreaFilter {
            area_id_prefix: area_id_prefix
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            page: Some((page_no, page_size)),
            ..Default::default()
        };
        let repo = self.areas();
        let total = repo.count(&filter).await?;
        let items = repo.search(&filter).await?;
        Ok(Page::new(items, total, page_no, page_size))
    }

    pub async fn area(&self, id: &RecordId) -> AppResult<Option<SwitchArea>> {
        Ok(self.areas().find_by_id(id).await?)
    }

    /// Point lookup by down-link number
    pub async fn area_by_area_no(&self, area_no: i64) -> AppResult<Option<SwitchArea>> {
        Ok(self.areas().find_by_area_no(area_no).await?)
    }

    pub async fn area_by_area_id(&self, area_id: &str) -> AppResult<Option<SwitchArea>> {
        Ok(self.areas().find_by_area_id(area_id).await?)
    }

    /// All areas, or the given subset
    pub async fn all_areas(&self, ids: Option<&[RecordId]>) -> AppResult<Vec<SwitchArea>> {
        let repo = self.areas();
        match ids {
            None => Ok(repo.find_all().await?),
            Some(ids) if ids.is_empty() => Ok(repo.find_all().await?),
            Some(ids) => Ok(repo.find_all_by_ids(ids).await?),
        }
    }

    /// Boundary segments of an area in `poly_index` order
    pub async fn lines_of_area(&self, id: &RecordId) -> AppResult<Vec<SwitchLine>> {
        self.require_area(id).await?;
        Ok(self.areas().lines_of(id).await?)
    }

    /// Anchors assigned to an area
    pub async fn area_anchors(&self, id: &RecordId) -> AppResult<Vec<Anchor>> {
        let area = self.require_area(id).await?;
        Ok(self.anchors().find_all_by_ids(&area.anchors).await?)
    }

    /// Anchors assigned to the area with this down-link number
    pub async fn area_anchors_by_no(&self, area_no: i64) -> AppResult<Vec<Anchor>> {
        let area = self
            .areas()
            .find_by_area_no(area_no)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Switch area no {area_no} not found")))?;
        Ok(self.anchors().find_all_by_ids(&area.anchors).await?)
    }

    /// Candidate targets for neighbor selection: every area except the given
    /// one
    pub async fn other_areas_for_select(
        &self,
        exclude: Option<&RecordId>,
    ) -> AppResult<Vec<SwitchArea>> {
        let filter = AreaFilter {
            exclude: exclude.cloned(),
            ..Default::default()
        };
        Ok(self.areas().search(&filter).await?)
    }

    /// Areas on a map; `exact` matches only that map, otherwise any assigned
    /// area qualifies
    pub async fn areas_by_map(&self, map_id: i64, exact: bool) -> AppResult<Vec<SwitchArea>> {
        let filter = AreaFilter {
            map_id: Some(map_id),
            any_assigned: !exact,
            ..Default::default()
        };
        Ok(self.areas().search(&filter).await?)
    }

    // ========== Lifecycle ==========

    /// Create an area, building its boundary when bordered, and register it
    /// with the runtime map
    pub async fn create_area(&self, data: SwitchAreaCreate) -> AppResult<SwitchArea> {
        data.validate()?;
        let blank = |value: &Option<String>| value.as_deref().map(str::trim).unwrap_or("").is_empty();
        if data.border_type == BORDER_TYPE_BOUNDED && (blank(&data.show_color) || blank(&data.points))
        {
            return Err(AppError::validation(
                "Bordered area requires a color and boundary points",
            ));
        }

        let repo = self.areas();
        if repo.find_by_area_id(&data.area_id).await?.is_some() {
            return Err(AppError::conflict(format!(
                "Area id {} already exists",
                data.area_id
            )));
        }
        if repo.find_by_area_no(data.area_no).await?.is_some() {
            return Err(AppError::conflict(format!(
                "Area no {} already exists",
                data.area_no
            )));
        }

        let outline = if data.border_type == BORDER_TYPE_BOUNDED {
            let graphics = GraphicsType::try_from(data.graphics_type)?;
            geometry::build_outline(data.points.as_deref().unwrap_or(""), graphics)?
        } else {
            geometry::Outline::default()
        };
        let bounds = outline.bounds;

        let area = SwitchArea {
            id: None,
            area_no: data.area_no,
            area_id: data.area_id,
            start_x: bounds.map(|b| b.start_x),
            start_y: bounds.map(|b| b.start_y),
            end_x: bounds.map(|b| b.end_x),
            end_y: bounds.map(|b| b.end_y),
            min_z: data.min_z,
            max_z: data.max_z,
            map_id: data.map_id,
            sort: 1,
            area_type: data.area_type,
            show_color: data.show_color,
            leave_rssi_enable: data.leave_rssi_enable,
            bs_area_type: data.bs_area_type,
            graphics_type: data.graphics_type,
            border_type: data.border_type,
            disable_warning: data.disable_warning,
            anchors: Vec::new(),
            anchor_groups: Vec::new(),
        };

        let created = repo.create(area, &outline.segments).await?;
        self.notifier.area_added(created.area_no).await;
        tracing::info!(area_no = created.area_no, area_id = %created.area_id,
            "switch area created");
        Ok(created)
    }

    /// Replace the scalar fields of an area; a supplied point string also
    /// rebuilds the boundary
    pub async fn update_area(&self, id: &RecordId, data: SwitchAreaUpdate) -> AppResult<SwitchArea> {
        data.validate()?;
        let repo = self.areas();
        if let Some(existing) = repo.find_by_area_id(&data.area_id).await?
            && existing.id.as_ref() != Some(id)
        {
            return Err(AppError::conflict(format!(
                "Area id {} already exists",
                data.area_id
            )));
        }
        if let Some(existing) = repo.find_by_area_no(data.area_no).await?
            && existing.id.as_ref() != Some(id)
        {
            return Err(AppError::conflict(format!(
                "Area no {} already exists",
                data.area_no
            )));
        }
        let area = self.require_area(id).await?;

        let merge = serde_json::json!({
            "area_id": data.area_id,
            "area_no": data.area_no,
            "min_z": data.min_z,
            "max_z": data.max_z,
            "show_color": data.show_color,
            "area_type": data.area_type,
            "leave_rssi_enable": data.leave_rssi_enable,
            "bs_area_type": data.bs_area_type,
            "disable_warning": data.disable_warning,
        });

        match data.points.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            Some(points) => {
                let graphics_type = data.graphics_type.unwrap_or(area.graphics_type);
                self.rebuild_boundary(id, merge, points, graphics_type, data.clear_members)
                    .await
            }
            None => Ok(repo.update_merge(id, merge).await?),
        }
    }

    /// Redraw the boundary of an area.
    ///
    /// With `clear_members` set, every assigned anchor is removed one at a
    /// time — the region reshaped, memberships must be revalidated by an
    /// operator.
    pub async fn redraw_region(
        &self,
        id: &RecordId,
        points: &str,
        graphics_type: i32,
        clear_members: bool,
    ) -> AppResult<SwitchArea> {
        if points.trim().is_empty() {
            return Err(AppError::validation("Boundary points must not be blank"));
        }
        self.require_area(id).await?;
        self.rebuild_boundary(id, serde_json::json!({}), points, graphics_type, clear_members)
            .await
    }

    async fn rebuild_boundary(
        &self,
        id: &RecordId,
        base_merge: serde_json::Value,
        points: &str,
        graphics_type: i32,
        clear_members: bool,
    ) -> AppResult<SwitchArea> {
        let graphics = GraphicsType::try_from(graphics_type)?;
        let outline = geometry::build_outline(points, graphics)?;

        let mut merge = match base_merge {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        merge.insert("graphics_type".into(), graphics_type.into());
        // no geometry -> the stored bounding box stays untouched
        if let Some(bounds) = outline.bounds {
            merge.insert("start_x".into(), bounds.start_x.into());
            merge.insert("start_y".into(), bounds.start_y.into());
            merge.insert("end_x".into(), bounds.end_x.into());
            merge.insert("end_y".into(), bounds.end_y.into());
        }

        let updated = self
            .areas()
            .replace_boundary(id, serde_json::Value::Object(merge), &outline.segments)
            .await?;
        tracing::info!(area_no = updated.area_no, segments = outline.segments.len(),
            "area boundary rebuilt");

        if clear_members {
            for anchor_id in updated.anchors.clone() {
                self.remove_anchor(id, &anchor_id).await?;
            }
            return self.require_area(id).await;
        }
        Ok(updated)
    }

    /// Delete areas; cascades relations and segments, and deregisters each
    /// area from the runtime map
    pub async fn delete_areas(&self, ids: &[RecordId]) -> AppResult<usize> {
        let repo = self.areas();
        let areas = repo.find_all_by_ids(ids).await?;
        for area in &areas {
            let Some(area_id) = &area.id else { continue };
            repo.delete_cascade(area_id).await?;
            self.notifier.area_removed(area.area_no).await;
            tracing::info!(area_no = area.area_no, "switch area deleted");
        }
        Ok(areas.len())
    }

    /// Delete every area assigned to a map
    pub async fn delete_areas_by_map(&self, map_id: i64) -> AppResult<usize> {
        let areas = self.areas_by_map(map_id, true).await?;
        let ids: Vec<RecordId> = areas.into_iter().filter_map(|a| a.id).collect();
        self.delete_areas(&ids).await
    }

    /// Move an area onto a map (or off, with `None`)
    pub async fn assign_map(&self, id: &RecordId, map_id: Option<i64>) -> AppResult<SwitchArea> {
        self.require_area(id).await?;
        Ok(self
            .areas()
            .update_merge(id, serde_json::json!({ "map_id": map_id }))
            .await?)
    }

    // ========== Neighbor graph ==========

    /// Add a directed neighbor relation with its separator line.
    ///
    /// Relations are stored on the initiating side only; with
    /// `Config::mirror_neighbor_links` set the reverse relation is inserted
    /// as well.
    pub async fn add_neighbor(
        &self,
        id: &RecordId,
        neighbor_id: &RecordId,
        sep_points: &str,
    ) -> AppResult<AreaNeighbor> {
        let repo = self.areas();
        self.require_area(id).await?;
        self.require_area(neighbor_id).await?;
        if id == neighbor_id {
            return Err(AppError::validation("An area cannot neighbor itself"));
        }

        let existing = repo.neighbors_of(id).await?;
        if existing.iter().any(|n| &n.neighbor_area == neighbor_id) {
            return Err(AppError::conflict(format!(
                "Neighbor relation {id} -> {neighbor_id} already exists"
            )));
        }

        let points = geometry::parse_points(sep_points)?;
        let [(sx, sy), (ex, ey)] = points.as_slice() else {
            return Err(AppError::validation(
                "Separator line requires exactly two points",
            ));
        };

        let relation = repo
            .create_neighbor(AreaNeighbor {
                id: None,
                switch_area: id.clone(),
                neighbor_area: neighbor_id.clone(),
                sep_start_x: *sx,
                sep_start_y: *sy,
                sep_end_x: *ex,
                sep_end_y: *ey,
            })
            .await?;

        if self.config.mirror_neighbor_links {
            let reverse_exists = repo
                .neighbors_of(neighbor_id)
                .await?
                .iter()
                .any(|n| &n.neighbor_area == id);
            if !reverse_exists {
                repo.create_neighbor(AreaNeighbor {
                    id: None,
                    switch_area: neighbor_id.clone(),
                    neighbor_area: id.clone(),
                    sep_start_x: *sx,
                    sep_start_y: *sy,
                    sep_end_x: *ex,
                    sep_end_y: *ey,
                })
                .await?;
            }
        }
        Ok(relation)
    }

    /// Remove the relations from an area to any of the given neighbor areas.
    ///
    /// Each matched relation is deleted individually by id so the removal is
    /// durable even when a cached relation set is stale.
    pub async fn remove_neighbors(
        &self,
        id: &RecordId,
        neighbor_ids: &[RecordId],
    ) -> AppResult<usize> {
        let repo = self.areas();
        self.require_area(id).await?;
        let targets = repo.find_all_by_ids(neighbor_ids).await?;
        let relations = repo.neighbors_of(id).await?;

        let mut removed = 0;
        for relation in relations {
            let matched = targets
                .iter()
                .any(|t| t.id.as_ref() == Some(&relation.neighbor_area));
            if matched && let Some(relation_id) = relation.id {
                repo.delete_neighbor(&relation_id).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// The relation from an area to one specific neighbor, if any
    pub async fn neighbor_to(
        &self,
        id: &RecordId,
        neighbor_id: &RecordId,
    ) -> AppResult<Option<AreaNeighbor>> {
        self.require_area(id).await?;
        let relations = self.areas().neighbors_of(id).await?;
        Ok(relations
            .into_iter()
            .find(|n| &n.neighbor_area == neighbor_id))
    }

    /// The neighbor *areas* of an area (for UI selection)
    pub async fn neighbor_targets(&self, id: &RecordId) -> AppResult<Vec<SwitchArea>> {
        self.require_area(id).await?;
        let repo = self.areas();
        let relations = repo.neighbors_of(id).await?;
        let targets: Vec<RecordId> = relations.into_iter().map(|n| n.neighbor_area).collect();
        Ok(repo.find_all_by_ids(&targets).await?)
    }

    // ========== Anchor membership ==========

    /// Idempotent membership insert; the runtime map hears about the first
    /// insertion only
    pub async fn add_anchor(&self, id: &RecordId, anchor_id: &RecordId) -> AppResult<()> {
        let area = self.require_area(id).await?;
        let anchor = self
            .anchors()
            .find_by_id(anchor_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Anchor {anchor_id} not found")))?;

        if !area.anchors.contains(anchor_id) {
            let mut anchors = area.anchors;
            anchors.push(anchor_id.clone());
            self.areas()
                .set_membership(id, anchors, area.anchor_groups)
                .await?;
            self.notifier
                .area_anchor_added(area.area_no, &anchor.anchor_id)
                .await;
        }
        Ok(())
    }

    /// Remove an anchor from an area's membership set
    pub async fn remove_anchor(&self, id: &RecordId, anchor_id: &RecordId) -> AppResult<()> {
        let area = self.require_area(id).await?;
        let anchor = self
            .anchors()
            .find_by_id(anchor_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Anchor {anchor_id} not found")))?;

        if area.anchors.contains(anchor_id) {
            let anchors = area
                .anchors
                .into_iter()
                .filter(|a| a != anchor_id)
                .collect();
            self.areas()
                .set_membership(id, anchors, area.anchor_groups)
                .await?;
            self.notifier
                .area_anchor_removed(area.area_no, &anchor.anchor_id)
                .await;
        }
        Ok(())
    }

    /// Replace the membership of an area from comma-separated id lists.
    ///
    /// Group ids win: membership becomes "by group" and the anchor set is
    /// populated with the union of the groups' members for display. Anchor
    /// ids alone select explicit membership and clear the group association.
    /// Neither clears both.
    pub async fn set_area_anchors(
        &self,
        id: &RecordId,
        anchor_ids: &str,
        group_ids: &str,
    ) -> AppResult<()> {
        let area = self.require_area(id).await?;
        let group_rids = parse_id_csv(group_ids);
        let anchor_rids = parse_id_csv(anchor_ids);

        if !group_rids.is_empty() {
            let groups = AnchorGroupRepository::new(self.db.clone())
                .find_all_by_ids(&group_rids)
                .await?;
            let mut members: Vec<RecordId> = Vec::new();
            for group in &groups {
                for anchor in &group.anchors {
                    if !members.contains(anchor) {
                        members.push(anchor.clone());
                    }
                }
            }
            let group_ids: Vec<RecordId> = groups.into_iter().filter_map(|g| g.id).collect();
            self.areas().set_membership(id, members, group_ids).await?;
        } else if !anchor_rids.is_empty() {
            let anchors = self.anchors().find_all_by_ids(&anchor_rids).await?;
            let member_ids: Vec<RecordId> = anchors.into_iter().filter_map(|a| a.id).collect();
            self.areas()
                .set_membership(id, member_ids, Vec::new())
                .await?;
        } else {
            self.areas()
                .set_membership(id, Vec::new(), Vec::new())
                .await?;
        }
        tracing::info!(area_no = area.area_no, "area membership replaced");
        Ok(())
    }

    // ========== Reports ==========

    /// Display rows for map rendering; `all` ignores the map filter
    pub async fn areas_display(&self, map_id: i64, all: bool) -> AppResult<Vec<AreaDisplay>> {
        let repo = self.areas();
        let areas = if all {
            repo.find_all().await?
        } else {
            self.areas_by_map(map_id, false).await?
        };

        let mut rows = Vec::with_capacity(areas.len());
        for area in areas {
            let Some(id) = area.id else { continue };
            let lines = repo
                .lines_of(&id)
                .await?
                .into_iter()
                .filter(|l| l.line_type == LINE_TYPE_BOUNDARY)
                .collect();
            rows.push(AreaDisplay {
                id,
                area_id: area.area_id,
                show_color: area.show_color,
                lines,
            });
        }
        Ok(rows)
    }

    /// Zone counts grouped by map
    pub async fn area_group(&self) -> AppResult<AreaGroupReport> {
        let rows = self.areas().count_grouped_by_map().await?;
        let unassigned: i64 = rows
            .iter()
            .filter(|r| r.map_id.is_none())
            .map(|r| r.count)
            .sum();

        if unassigned > 0 {
            let total: i64 = rows.iter().map(|r| r.count).sum();
            let maps = SiteMapRepository::new(self.db.clone()).find_all().await?;
            let counts = maps
                .into_iter()
                .map(|m| (m.map_no.to_string(), total))
                .collect();
            return Ok(AreaGroupReport {
                has_unassigned: true,
                counts,
            });
        }

        let counts = rows
            .into_iter()
            .filter_map(|r| r.map_id.map(|m| (m.to_string(), r.count)))
            .collect();
        Ok(AreaGroupReport {
            has_unassigned: false,
            counts,
        })
    }

    /// Region lookup: per anchor, the nearest bounded areas by bounding-box
    /// center, capped at the hardware revision's region count
    pub async fn candidate_areas_for_anchors(
        &self,
        anchor_ids: &str,
    ) -> AppResult<Vec<AnchorRegionCandidate>> {
        let anchors_repo = self.anchors();
        let areas = self.areas().find_all().await?;

        let mut result = Vec::new();
        for rid in parse_id_csv(anchor_ids) {
            let Some(anchor) = anchors_repo.find_by_id(&rid).await? else {
                continue;
            };
            let config = anchors_repo.find_config(&anchor.anchor_id).await?;
            let region_num = self
                .anchor_versions
                .region_num_for(config.and_then(|c| c.version_code).as_deref());

            let ax = anchor.anchor_x.unwrap_or(0) as f64;
            let ay = anchor.anchor_y.unwrap_or(0) as f64;
            let mut candidates: Vec<(i64, f64)> = areas
                .iter()
                .filter_map(|area| {
                    let (sx, sy) = (area.start_x?, area.start_y?);
                    let (ex, ey) = (area.end_x?, area.end_y?);
                    let cx = (sx + ex) as f64 / 2.0;
                    let cy = (sy + ey) as f64 / 2.0;
                    let distance = ((cx - ax).powi(2) + (cy - ay).powi(2)).sqrt();
                    Some((area.area_no, distance))
                })
                .collect();
            candidates.sort_by(|a, b| a.1.total_cmp(&b.1));
            result.extend(candidates.into_iter().take(region_num.max(0) as usize).map(
                |(area_no, distance)| AnchorRegionCandidate {
                    anchor_id: anchor.anchor_id.clone(),
                    area_no,
                    distance,
                },
            ));
        }
        Ok(result)
    }
}
