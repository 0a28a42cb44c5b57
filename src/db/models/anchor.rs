//! Anchor Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Anchor entity (基站：参与定位感知的物理设备)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Anchor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// 基站硬件 ID (globally unique)
    pub anchor_id: String,
    #[serde(default)]
    pub anchor_x: Option<i64>,
    #[serde(default)]
    pub anchor_y: Option<i64>,
    #[serde(default)]
    pub anchor_z: Option<i64>,
    #[serde(default)]
    pub anchor_type: Option<i32>,
    #[serde(default)]
    pub anchor_bno: Option<i32>,
    #[serde(default)]
    pub enabled: Option<i32>,
    /// 1 = 同步主基站
    #[serde(default)]
    pub is_bs: Option<i32>,
    #[serde(default)]
    pub map_id: Option<i64>,
}

/// Per-anchor communication config, keyed by the hardware id (一对一)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub anchor_id: String,
    /// 上报间隔 (reporting interval)
    #[serde(default)]
    pub anchor_interval: Option<i32>,
    /// TDMA sequence number
    #[serde(default)]
    pub seq: Option<i32>,
    /// 硬件版本号
    #[serde(default)]
    pub version_code: Option<String>,
}
