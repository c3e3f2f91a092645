//! Catalog Store Port - 书目存储抽象
//!
//! 定义书目持久化的抽象接口
//! 具体实现在 infrastructure/persistence 层（MySQL / PostgreSQL / SQLite）

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::book::CompleteBookRecord;

/// 数据库分配的行 ID
pub type RowId = i64;

/// 存储错误
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Record rejected: {0}")]
    InvalidRecord(String),
}

/// Catalog Store Port
///
/// 调用方从不感知具体数据库方言
#[async_trait]
pub trait CatalogStorePort: Send + Sync {
    /// 目录中已有的去重主题（剔除空值，升序）
    ///
    /// 空目录返回空列表，不是错误。
    async fn distinct_subjects(&self) -> Result<Vec<String>, CatalogError>;

    /// 目录中已有的去重细分主题（剔除空值，升序）
    async fn distinct_specific_subjects(&self) -> Result<Vec<String>, CatalogError>;

    /// 插入一行完整记录，返回数据库分配的行 ID
    ///
    /// 单行 INSERT 即提交点：要么整行写入，要么零行。
    async fn insert_book(&self, record: &CompleteBookRecord) -> Result<RowId, CatalogError>;
}
