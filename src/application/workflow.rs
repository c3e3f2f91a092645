//! Book Workflow - 编目工作流编排
//!
//! 顺序串联: 采集 → 提取 → 分类 → 询问状态 → 合并 → 入库 → 清理
//! 单次执行内无重试；任一步骤失败立即终止。
//! 只要采集成功，清理一定执行，无论后续成败。

use std::sync::Arc;
use uuid::Uuid;

use crate::application::error::WorkflowError;
use crate::application::ports::{
    CameraPort, CatalogStorePort, InferencePort, ReadingStatusPort, RowId, SubjectContext,
};
use crate::domain::book::CompleteBookRecord;
use crate::domain::capture::CapturedImage;

/// 工作流状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    /// 等待开始
    Idle,
    /// 采集图像中
    Capturing,
    /// 提取元数据中
    Extracting,
    /// 推断主题中
    Classifying,
    /// 等待操作员输入
    AwaitingUserInput,
    /// 写入数据库中
    Storing,
    /// 清理临时图像中
    CleaningUp,
    /// 成功结束
    Done,
    /// 失败结束
    Failed,
}

impl WorkflowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "idle",
            WorkflowState::Capturing => "capturing",
            WorkflowState::Extracting => "extracting",
            WorkflowState::Classifying => "classifying",
            WorkflowState::AwaitingUserInput => "awaiting_user_input",
            WorkflowState::Storing => "storing",
            WorkflowState::CleaningUp => "cleaning_up",
            WorkflowState::Done => "done",
            WorkflowState::Failed => "failed",
        }
    }
}

/// 单次执行的状态跟踪
///
/// 每次调用新建，run_id 用于日志关联
struct RunState {
    run_id: Uuid,
    state: WorkflowState,
}

impl RunState {
    fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            state: WorkflowState::Idle,
        }
    }

    fn advance(&mut self, next: WorkflowState) {
        tracing::debug!(
            run_id = %self.run_id,
            from = self.state.as_str(),
            to = next.as_str(),
            "Workflow state change"
        );
        self.state = next;
    }
}

/// 工作流结果
#[derive(Debug, Clone)]
pub struct WorkflowReport {
    /// 数据库分配的行 ID
    pub row_id: RowId,
    /// 入库的完整记录
    pub record: CompleteBookRecord,
}

/// 编目工作流
///
/// 持有各端口的共享引用，每次调用对应一次完整执行
pub struct BookWorkflow {
    camera: Arc<dyn CameraPort>,
    inference: Arc<dyn InferencePort>,
    catalog: Arc<dyn CatalogStorePort>,
    status_source: Arc<dyn ReadingStatusPort>,
    location: String,
}

impl BookWorkflow {
    pub fn new(
        camera: Arc<dyn CameraPort>,
        inference: Arc<dyn InferencePort>,
        catalog: Arc<dyn CatalogStorePort>,
        status_source: Arc<dyn ReadingStatusPort>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            camera,
            inference,
            catalog,
            status_source,
            location: location.into(),
        }
    }

    /// 执行一次完整编目
    ///
    /// 采集失败直接返回；采集成功后，无论后续步骤结果如何，
    /// 返回前都会尝试删除临时图像。
    pub async fn process_complete_book(&self) -> Result<WorkflowReport, WorkflowError> {
        let mut run = RunState::new();

        run.advance(WorkflowState::Capturing);
        let image = match self.camera.capture().await {
            Ok(image) => image,
            Err(e) => {
                run.advance(WorkflowState::Failed);
                return Err(e.into());
            }
        };
        tracing::info!(
            run_id = %run.run_id,
            file = %image.file_name(),
            "Image captured"
        );

        let result = self.catalog_from_image(&mut run, &image).await;

        run.advance(WorkflowState::CleaningUp);
        self.discard_image(&run, &image).await;

        match result {
            Ok(report) => {
                run.advance(WorkflowState::Done);
                tracing::info!(
                    run_id = %run.run_id,
                    row_id = report.row_id,
                    title = %report.record.title(),
                    "Book cataloged"
                );
                Ok(report)
            }
            Err(e) => {
                run.advance(WorkflowState::Failed);
                tracing::error!(run_id = %run.run_id, error = %e, "Workflow failed");
                Err(e)
            }
        }
    }

    /// 连通性测试：采集一帧并立即删除，不做推理与入库
    pub async fn run_connectivity_test(&self) -> Result<(), WorkflowError> {
        let mut run = RunState::new();

        run.advance(WorkflowState::Capturing);
        let image = match self.camera.capture().await {
            Ok(image) => image,
            Err(e) => {
                run.advance(WorkflowState::Failed);
                return Err(e.into());
            }
        };
        tracing::info!(
            run_id = %run.run_id,
            file = %image.file_name(),
            "Test image captured"
        );

        run.advance(WorkflowState::CleaningUp);
        self.discard_image(&run, &image).await;
        run.advance(WorkflowState::Done);

        Ok(())
    }

    /// 采集之后的阶段：提取 → 分类 → 询问状态 → 合并 → 入库
    async fn catalog_from_image(
        &self,
        run: &mut RunState,
        image: &CapturedImage,
    ) -> Result<WorkflowReport, WorkflowError> {
        run.advance(WorkflowState::Extracting);
        let metadata = self.inference.extract_metadata(image).await?;
        tracing::info!(
            run_id = %run.run_id,
            title = %metadata.title,
            author = %metadata.author,
            "Metadata extracted"
        );

        run.advance(WorkflowState::Classifying);
        let context = SubjectContext {
            subjects: self.catalog.distinct_subjects().await?,
            specific_subjects: self.catalog.distinct_specific_subjects().await?,
        };
        tracing::debug!(
            run_id = %run.run_id,
            known_subjects = context.subjects.len(),
            known_specific_subjects = context.specific_subjects.len(),
            "Loaded existing subject vocabulary"
        );
        let subject = self.inference.infer_subject(&metadata, &context).await?;
        tracing::info!(
            run_id = %run.run_id,
            subject = %subject.subject,
            specific_subject = %subject.specific_subject,
            "Subject classified"
        );

        run.advance(WorkflowState::AwaitingUserInput);
        let status = self.status_source.reading_status(&metadata).await?;

        let record =
            CompleteBookRecord::merge(metadata, subject, self.location.clone(), status);

        run.advance(WorkflowState::Storing);
        let row_id = self.catalog.insert_book(&record).await?;
        tracing::info!(run_id = %run.run_id, row_id, "Record stored");

        Ok(WorkflowReport { row_id, record })
    }

    /// 尽力删除临时图像；失败只记 warn，不改变工作流结果
    async fn discard_image(&self, run: &RunState, image: &CapturedImage) {
        match self.camera.discard(image).await {
            Ok(()) => {
                tracing::debug!(
                    run_id = %run.run_id,
                    file = %image.file_name(),
                    "Captured image removed"
                );
            }
            Err(e) => {
                tracing::warn!(
                    run_id = %run.run_id,
                    file = %image.file_name(),
                    error = %e,
                    "Failed to remove captured image"
                );
            }
        }
    }
}
