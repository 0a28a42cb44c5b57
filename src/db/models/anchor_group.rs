//! Anchor Group Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Named collection of anchors (基站分组)
///
/// Associated to a switch area as the alternative to listing anchors
/// directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub anchors: Vec<RecordId>,
}
