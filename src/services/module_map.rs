//! Runtime topology registry (module anchor map)
//!
//! The live in-memory view of the persisted area/anchor topology, consumed by
//! the real-time parsing pipeline when it resolves which area a reporting tag
//! belongs to. Every structural create/delete and every anchor membership
//! change must reach the registry exactly once, otherwise the runtime view
//! drifts from the store.

use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashSet;

/// Bridge pushed topology deltas as they are persisted
///
/// Injected into the management service at construction; production wires in
/// [`ModuleAnchorMap`], tests substitute a recording stub.
#[async_trait]
pub trait TopologyNotifier: Send + Sync {
    /// A new area was persisted, keyed by its down-link number
    async fn area_added(&self, area_no: i64);
    /// An area row was removed
    async fn area_removed(&self, area_no: i64);
    /// An anchor joined an area's membership set
    async fn area_anchor_added(&self, area_no: i64, anchor_id: &str);
    /// An anchor left an area's membership set
    async fn area_anchor_removed(&self, area_no: i64, anchor_id: &str);
}

/// 模块基站表 - 区域下发编号到基站硬件 ID 集合的实时映射
#[derive(Debug, Default)]
pub struct ModuleAnchorMap {
    areas: DashMap<i64, HashSet<String>>,
}

impl ModuleAnchorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_area(&self, area_no: i64) -> bool {
        self.areas.contains_key(&area_no)
    }

    /// Anchor hardware ids registered to an area, sorted for stable output
    pub fn anchors_of(&self, area_no: i64) -> Vec<String> {
        let mut anchors: Vec<String> = self
            .areas
            .get(&area_no)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        anchors.sort();
        anchors
    }

    pub fn area_count(&self) -> usize {
        self.areas.len()
    }
}

#[async_trait]
impl TopologyNotifier for ModuleAnchorMap {
    async fn area_added(&self, area_no: i64) {
        self.areas.entry(area_no).or_default();
        tracing::debug!(area_no, "module map: area registered");
    }

    async fn area_removed(&self, area_no: i64) {
        self.areas.remove(&area_no);
        tracing::debug!(area_no, "module map: area dropped");
    }

    async fn area_anchor_added(&self, area_no: i64, anchor_id: &str) {
        self.areas
            .entry(area_no)
            .or_default()
            .insert(anchor_id.to_string());
    }

    async fn area_anchor_removed(&self, area_no: i64, anchor_id: &str) {
        if let Some(mut set) = self.areas.get_mut(&area_no) {
            set.remove(anchor_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tracks_area_and_anchor_lifecycle() {
        let map = ModuleAnchorMap::new();
        map.area_added(7).await;
        assert!(map.contains_area(7));

        map.area_anchor_added(7, "A-01").await;
        map.area_anchor_added(7, "A-02").await;
        map.area_anchor_added(7, "A-01").await;
        assert_eq!(map.anchors_of(7), vec!["A-01", "A-02"]);

        map.area_anchor_removed(7, "A-01").await;
        assert_eq!(map.anchors_of(7), vec!["A-02"]);

        map.area_removed(7).await;
        assert!(!map.contains_area(7));
        assert!(map.anchors_of(7).is_empty());
    }

    #[tokio::test]
    async fn anchor_add_registers_area_implicitly() {
        let map = ModuleAnchorMap::new();
        map.area_anchor_added(3, "B-09").await;
        assert!(map.contains_area(3));
        assert_eq!(map.area_count(), 1);
    }
}
