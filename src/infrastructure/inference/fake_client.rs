//! Fake Inference Client - 用于测试的推理实现
//!
//! 不调用任何外部 API，始终返回构造时给定的元数据与主题

use async_trait::async_trait;

use crate::application::ports::{InferenceError, InferencePort, SubjectContext};
use crate::domain::book::{BookMetadata, SubjectInfo};
use crate::domain::capture::CapturedImage;

/// Fake Inference Client
pub struct FakeInferenceClient {
    metadata: BookMetadata,
    subject: SubjectInfo,
}

impl FakeInferenceClient {
    /// 创建返回指定答案的客户端
    pub fn new(metadata: BookMetadata, subject: SubjectInfo) -> Self {
        Self { metadata, subject }
    }

    /// 使用内置样例书创建
    pub fn with_defaults() -> Self {
        Self::new(
            BookMetadata::new(
                "The Rust Programming Language",
                "Steve Klabnik, Carol Nichols",
                "No Starch Press",
                "The official book on the Rust programming language.",
            ),
            SubjectInfo::new("Computer Science", "Programming Languages"),
        )
    }
}

#[async_trait]
impl InferencePort for FakeInferenceClient {
    async fn extract_metadata(
        &self,
        image: &CapturedImage,
    ) -> Result<BookMetadata, InferenceError> {
        // 图像必须实际存在，和真实客户端保持一致的失败语义
        if !image.path().exists() {
            return Err(InferenceError::Io(format!(
                "{}: no such file",
                image.path().display()
            )));
        }

        tracing::debug!(
            image = %image.file_name(),
            title = %self.metadata.title,
            "FakeInferenceClient: returning canned metadata"
        );
        Ok(self.metadata.clone())
    }

    async fn infer_subject(
        &self,
        _metadata: &BookMetadata,
        context: &SubjectContext,
    ) -> Result<SubjectInfo, InferenceError> {
        tracing::debug!(
            known_subjects = context.subjects.len(),
            subject = %self.subject.subject,
            "FakeInferenceClient: returning canned subject"
        );
        Ok(self.subject.clone())
    }
}
