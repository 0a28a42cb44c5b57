//! System Config Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Global configuration record (全局配置项)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SysConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Configuration code (unique), e.g. `max_anchor`
    pub cfg_code: String,
    pub cfg_val: String,
}
