//! 服务层 - 区域管理核心服务
//!
//! # 服务列表
//!
//! - [`SwitchAreaService`] - 切换区域管理（几何、邻区、基站成员）
//! - [`SlotService`] - 时隙容量计算
//! - [`ConsistencyChecker`] - 序号一致性巡检
//! - [`ModuleAnchorMap`] - 实时拓扑注册表 ([`TopologyNotifier`] 默认实现)
//! - [`AnchorVersionTable`] - 基站版本规格表

pub mod anchor_version;
pub mod consistency;
pub mod module_map;
pub mod slot;
pub mod switch_area;

pub use anchor_version::{AnchorVersionSpec, AnchorVersionTable, DEFAULT_REGION_NUM};
pub use consistency::{ConsistencyChecker, SeqCheckRow};
pub use module_map::{ModuleAnchorMap, TopologyNotifier};
pub use slot::{SlotModel, SlotService};
pub use switch_area::{AreaDisplay, AreaGroupReport, SwitchAreaService};
