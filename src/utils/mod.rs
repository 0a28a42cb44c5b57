//! 工具模块 - 通用工具函数和类型
//!
//! - [`AppError`] / [`AppResult`] - 应用错误类型
//! - [`Page`] - 分页结果
//! - 日志初始化

pub mod error;
pub mod logger;
pub mod types;

pub use error::{AppError, AppResult};
pub use logger::{init_logger, init_logger_with_file};
pub use types::Page;
