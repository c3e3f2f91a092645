//! 应用层错误定义
//!
//! 工作流各步骤失败的统一分类

use thiserror::Error;

use crate::application::ports::{CameraError, CatalogError, InferenceError, PromptError};
use crate::domain::book::BookError;

/// 工作流错误
///
/// 每个变体对应一个失败阶段；任何一个都会立即终止本次执行。
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// 相机不可达或请求超时
    #[error("Connection error: {0}")]
    Connection(String),

    /// 采集到的载荷不是有效图像，或采集侧 IO 失败
    #[error("Capture error: {0}")]
    Capture(String),

    /// 调用推理服务失败（网络 / API / 配额）
    #[error("Inference error: {0}")]
    Inference(String),

    /// 推理响应不符合期望的结构
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// 输入或配置未通过校验
    #[error("Validation error: {0}")]
    Validation(String),

    /// 数据库连接或写入失败
    #[error("Store error: {0}")]
    Store(String),
}

impl From<CameraError> for WorkflowError {
    fn from(err: CameraError) -> Self {
        match err {
            CameraError::Connection(_) | CameraError::Timeout => {
                Self::Connection(err.to_string())
            }
            CameraError::InvalidImage(_) | CameraError::Io(_) => Self::Capture(err.to_string()),
        }
    }
}

impl From<InferenceError> for WorkflowError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::MalformedResponse(_) => Self::Extraction(err.to_string()),
            // 读取本地图像失败属于采集侧问题，字节从未离开本机
            InferenceError::Io(_) => Self::Capture(err.to_string()),
            InferenceError::Network(_) | InferenceError::Api(_) => {
                Self::Inference(err.to_string())
            }
        }
    }
}

impl From<CatalogError> for WorkflowError {
    fn from(err: CatalogError) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<PromptError> for WorkflowError {
    fn from(err: PromptError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<BookError> for WorkflowError {
    fn from(err: BookError) -> Self {
        Self::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_errors_split_by_phase() {
        let timeout: WorkflowError = CameraError::Timeout.into();
        assert!(matches!(timeout, WorkflowError::Connection(_)));

        let bad_payload: WorkflowError =
            CameraError::InvalidImage("not a JPEG".to_string()).into();
        assert!(matches!(bad_payload, WorkflowError::Capture(_)));
    }

    #[test]
    fn test_malformed_response_is_extraction_failure() {
        let err: WorkflowError =
            InferenceError::MalformedResponse("missing Description".to_string()).into();
        assert!(matches!(err, WorkflowError::Extraction(_)));

        let err: WorkflowError = InferenceError::Api("429 Too Many Requests".to_string()).into();
        assert!(matches!(err, WorkflowError::Inference(_)));
    }
}
