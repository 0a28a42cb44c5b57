//! Switch Area Model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Switch area entity (切换区域：标签跨越边界时触发基站切换的多边形区域)
///
/// Bounding box fields (`start_x..end_y`) are derived from the boundary
/// segment scan and are absent until a boundary is drawn. `anchors` and
/// `anchor_groups` are the membership sets; business rule is one mode at a
/// time — an explicit anchor list or a group reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwitchArea {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// 区域下发编号 (globally unique, transmitted to field hardware)
    pub area_no: i64,
    /// 外部区域编码 (globally unique)
    pub area_id: String,
    #[serde(default)]
    pub start_x: Option<i64>,
    #[serde(default)]
    pub start_y: Option<i64>,
    #[serde(default)]
    pub end_x: Option<i64>,
    #[serde(default)]
    pub end_y: Option<i64>,
    #[serde(default)]
    pub min_z: Option<i64>,
    #[serde(default)]
    pub max_z: Option<i64>,
    /// 所属地图；`None` 表示未挂接
    #[serde(default)]
    pub map_id: Option<i64>,
    #[serde(default = "default_sort")]
    pub sort: i32,
    #[serde(default)]
    pub area_type: Option<i32>,
    #[serde(default)]
    pub show_color: Option<String>,
    #[serde(default)]
    pub leave_rssi_enable: Option<i32>,
    #[serde(default)]
    pub bs_area_type: Option<i32>,
    /// 1 = 闭合多边形, 2 = 开放折线
    pub graphics_type: i32,
    /// 0 = 无边界, 1 = 已绘制边界
    pub border_type: i32,
    #[serde(default)]
    pub disable_warning: Option<i32>,
    /// Explicit anchor membership set
    #[serde(default)]
    pub anchors: Vec<RecordId>,
    /// Anchor-group membership set
    #[serde(default)]
    pub anchor_groups: Vec<RecordId>,
}

fn default_sort() -> i32 {
    1
}

/// Create switch area payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SwitchAreaCreate {
    #[validate(length(min = 1, message = "area_id must not be blank"))]
    pub area_id: String,
    pub area_no: i64,
    pub map_id: Option<i64>,
    pub min_z: Option<i64>,
    pub max_z: Option<i64>,
    pub show_color: Option<String>,
    /// Boundary point string, `"x,y x,y ..."`; required when `border_type = 1`
    pub points: Option<String>,
    pub area_type: Option<i32>,
    pub leave_rssi_enable: Option<i32>,
    pub bs_area_type: Option<i32>,
    pub graphics_type: i32,
    pub border_type: i32,
    pub disable_warning: Option<i32>,
}

/// Update switch area payload
///
/// Scalar replacement; when `points` is supplied the boundary is rebuilt and
/// `clear_members` controls whether existing anchor membership is dropped for
/// operator re-validation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SwitchAreaUpdate {
    #[validate(length(min = 1, message = "area_id must not be blank"))]
    pub area_id: String,
    pub area_no: i64,
    pub min_z: Option<i64>,
    pub max_z: Option<i64>,
    #[validate(length(min = 1, message = "show_color must not be blank"))]
    pub show_color: String,
    pub area_type: Option<i32>,
    pub leave_rssi_enable: Option<i32>,
    pub bs_area_type: Option<i32>,
    pub disable_warning: Option<i32>,
    #[serde(default)]
    pub points: Option<String>,
    #[serde(default)]
    pub graphics_type: Option<i32>,
    #[serde(default)]
    pub clear_members: bool,
}
