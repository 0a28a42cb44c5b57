//! 统一错误处理
//!
//! 提供服务层错误类型：
//! - [`AppError`] - 应用错误枚举
//! - [`AppResult`] - 服务层统一返回类型
//!
//! 业务上可预期的失败（参数缺失、重复、目标不存在）以具体的错误变体返回，
//! 不通过 panic 传播；持久层失败统一归入 [`AppError::Database`]。

use crate::db::repository::RepoError;

/// 应用错误枚举
///
/// | 分类 | 说明 |
/// |------|------|
/// | `Validation` | 参数缺失、坐标串格式错误 |
/// | `Conflict` | 区域编号/下发编号重复、邻区关系重复 |
/// | `NotFound` | 区域/基站/邻区不存在 |
/// | `Database` | 持久层写入被拒绝，事务已回滚 |
/// | `Internal` | 其他意外错误 |
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for service operations
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
            RepoError::Database(msg) => {
                tracing::error!(target: "database", error = %msg, "Database error occurred");
                AppError::Database(msg)
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}
