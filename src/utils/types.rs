//! Common value types shared across services

use serde::{Deserialize, Serialize};

/// 分页结果
///
/// `page_no` is 1-based; `total` is the row count before paging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page_no: usize,
    pub page_size: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, page_no: usize, page_size: usize) -> Self {
        Self {
            items,
            total,
            page_no,
            page_size,
        }
    }
}
