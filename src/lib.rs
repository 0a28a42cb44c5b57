//! RTLS Edge - 室内实时定位系统服务端管理层
//!
//! # 架构概述
//!
//! 管理物理基站 (anchor)、地图上的切换区域 (switch area)、区域间的邻区
//! 关系以及基站/分组到区域的挂接；所有结构性变更同步推送到实时拓扑
//! 注册表，供解析链路做跨区切换判定。
//!
//! # 模块结构
//!
//! ```text
//! rtls-edge/src/
//! ├── core/          # 配置、状态
//! ├── db/            # 嵌入式 SurrealDB：模型、仓储
//! ├── geometry.rs    # 区域边界几何
//! ├── services/      # 区域管理、时隙计算、一致性巡检、实时拓扑表
//! └── utils/         # 错误类型、日志
//! ```

pub mod core;
pub mod db;
pub mod geometry;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use self::core::{Config, ServerState};
pub use services::{
    AnchorVersionTable, ConsistencyChecker, ModuleAnchorMap, SlotService, SwitchAreaService,
    TopologyNotifier,
};
pub use utils::{AppError, AppResult, Page};
