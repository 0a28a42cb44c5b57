//! 服务器配置

use std::path::PathBuf;

/// 边缘节点配置项
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/rtls/edge | 工作目录 |
/// | LOG_LEVEL | info | 日志级别 |
/// | ENVIRONMENT | development | 运行环境 |
/// | MIRROR_NEIGHBOR_LINKS | false | 添加邻区时自动写入反向关系 |
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// 日志级别
    pub log_level: String,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 邻区关系默认只存在发起方；置位后自动镜像写入对端
    pub mirror_neighbor_links: bool,
}

impl Config {
    /// 从环境变量加载配置，未设置时使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/rtls/edge".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            mirror_neighbor_links: std::env::var("MIRROR_NEIGHBOR_LINKS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }

    /// 使用自定义工作目录覆盖配置，常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config
    }

    /// 数据库文件目录
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 日志文件目录
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
