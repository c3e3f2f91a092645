//! Reading Status Port - 阅读状态来源抽象
//!
//! 工作流在入库前向操作员询问阅读状态；
//! 交互式实现与固定值实现都在 infrastructure/console 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::book::{BookMetadata, ReadingStatus};

/// 询问错误
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Input stream closed")]
    Closed,

    #[error("Invalid status code: {0}")]
    InvalidCode(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// Reading Status Port
///
/// 交互式实现先向操作员展示已提取的书目信息，再读取状态代码
#[async_trait]
pub trait ReadingStatusPort: Send + Sync {
    /// 取得本次记录的阅读状态
    async fn reading_status(&self, metadata: &BookMetadata) -> Result<ReadingStatus, PromptError>;
}
