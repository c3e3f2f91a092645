//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod camera;
mod catalog;
mod inference;
mod status;

pub use camera::{CameraError, CameraPort};
pub use catalog::{CatalogError, CatalogStorePort, RowId};
pub use inference::{InferenceError, InferencePort, SubjectContext};
pub use status::{PromptError, ReadingStatusPort};
