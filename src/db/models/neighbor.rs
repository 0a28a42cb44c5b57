//! Area Neighbor Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Directed adjacency link between two switch areas (邻区关系)
///
/// Stored on the initiating side only; `(switch_area, neighbor_area)` is
/// unique. The separator endpoints describe the border line the handoff
/// decision evaluates when a tag crosses between the two areas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaNeighbor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Source area holding the relation
    pub switch_area: RecordId,
    /// Adjacent area
    pub neighbor_area: RecordId,
    pub sep_start_x: i64,
    pub sep_start_y: i64,
    pub sep_end_x: i64,
    pub sep_end_y: i64,
}
