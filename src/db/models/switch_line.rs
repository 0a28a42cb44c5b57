//! Switch Line Model (boundary segment)

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// One directed edge of an area outline (区域边界线段)
///
/// Ordered by `poly_index` (1-based); cascades with its owning area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchLine {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Owning switch area
    pub area: RecordId,
    /// 1 = area boundary line
    pub line_type: i32,
    /// 1-based position in the outline sequence
    pub poly_index: i32,
    pub sx: i64,
    pub sy: i64,
    pub tx: i64,
    pub ty: i64,
}
