//! Inference Port - 视觉语言模型抽象
//!
//! 定义元数据提取与主题分类的抽象接口
//! 具体实现在 infrastructure/inference 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::book::{BookMetadata, SubjectInfo};
use crate::domain::capture::CapturedImage;

/// 推理错误
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// 分类上下文 - 目录中已有的主题词汇
///
/// 两份清单都交给模型，促使其优先复用已有分类而不是另起炉灶。
#[derive(Debug, Clone, Default)]
pub struct SubjectContext {
    pub subjects: Vec<String>,
    pub specific_subjects: Vec<String>,
}

/// Inference Port
///
/// 外部视觉语言模型服务的抽象接口，每次调用一个请求
#[async_trait]
pub trait InferencePort: Send + Sync {
    /// 从书名页照片提取书目元数据
    ///
    /// 缺字段的响应直接判为格式错误，不做默认值填充。
    async fn extract_metadata(
        &self,
        image: &CapturedImage,
    ) -> Result<BookMetadata, InferenceError>;

    /// 结合已有主题词汇推断主题分类
    async fn infer_subject(
        &self,
        metadata: &BookMetadata,
        context: &SubjectContext,
    ) -> Result<SubjectInfo, InferenceError>;
}
