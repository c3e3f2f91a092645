//! Book Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BookError {
    #[error("无效的阅读状态代码: {0} (应为 c/p/n)")]
    InvalidReadingStatus(String),

    #[error("记录不完整: {0}")]
    IncompleteRecord(String),
}
