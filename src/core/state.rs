//! 服务器状态 - 持有所有服务的共享引用

use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::RwLock;

use crate::core::Config;
use crate::db::DbService;
use crate::services::{
    AnchorVersionTable, ConsistencyChecker, ModuleAnchorMap, SlotService, SwitchAreaService,
    TopologyNotifier,
};
use crate::utils::AppResult;

/// 边缘节点核心状态
///
/// 使用 `Arc` 实现浅拷贝，所有权成本极低。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | 嵌入式数据库 |
/// | notifier | 实时拓扑注册表桥接 |
/// | anchor_versions | 基站版本规格表 |
/// | topology_lock | 拓扑读写锁：批量拓扑变更与一致性巡检互斥 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub notifier: Arc<dyn TopologyNotifier>,
    pub anchor_versions: Arc<AnchorVersionTable>,
    pub topology_lock: Arc<RwLock<()>>,
}

impl ServerState {
    /// 初始化状态：打开 `work_dir/database/rtls.db` 并装配默认服务
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        std::fs::create_dir_all(config.database_dir()).map_err(|e| {
            crate::utils::AppError::Internal(format!("Failed to create work directory: {e}"))
        })?;
        let db_path = config.database_dir().join("rtls.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        Ok(Self::with_db(config.clone(), db_service.db))
    }

    /// 基于已打开的数据库装配状态（测试用内存引擎时也走这里）
    pub fn with_db(config: Config, db: Surreal<Db>) -> Self {
        Self {
            config,
            db,
            notifier: Arc::new(ModuleAnchorMap::new()),
            anchor_versions: Arc::new(AnchorVersionTable::new()),
            topology_lock: Arc::new(RwLock::new(())),
        }
    }

    /// 替换拓扑通知桥接（测试注入记录桩）
    pub fn with_notifier(mut self, notifier: Arc<dyn TopologyNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// 区域管理服务
    pub fn switch_area_service(&self) -> SwitchAreaService {
        SwitchAreaService::new(
            self.db.clone(),
            self.notifier.clone(),
            self.anchor_versions.clone(),
            self.config.clone(),
        )
    }

    /// 时隙容量服务
    pub fn slot_service(&self) -> SlotService {
        SlotService::new(self.db.clone())
    }

    /// 一致性巡检
    pub fn consistency_checker(&self) -> ConsistencyChecker {
        ConsistencyChecker::new(self.db.clone(), self.topology_lock.clone())
    }
}
