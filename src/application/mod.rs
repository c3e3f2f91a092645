//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Camera、Inference、CatalogStore、ReadingStatus）
//! - workflow: 编目工作流编排
//! - error: 应用层错误定义

pub mod error;
pub mod ports;
pub mod workflow;

pub use error::WorkflowError;

pub use ports::{
    CameraError, CameraPort, CatalogError, CatalogStorePort, InferenceError, InferencePort,
    PromptError, ReadingStatusPort, RowId, SubjectContext,
};

pub use workflow::{BookWorkflow, WorkflowReport, WorkflowState};
