//! Site Map Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Floor map entity (楼层地图)
///
/// Areas reference maps by the numeric `map_id` column carried in the
/// down-link protocol, not by record link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteMap {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// 地图编号 referenced by `SwitchArea::map_id`
    pub map_no: i64,
    pub name: String,
}
