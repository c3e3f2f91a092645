//! Booklog - 书库编目流水线
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Book Context: 书目元数据、主题与完整记录
//! - Capture Context: 临时采集图像
//!
//! 应用层 (application/):
//! - Ports: 端口定义（CameraPort, InferencePort, CatalogStorePort, ReadingStatusPort）
//! - Workflow: 编目工作流编排
//!
//! 基础设施层 (infrastructure/):
//! - Camera: IP Webcam HTTP 单帧采集
//! - Inference: OpenAI 兼容视觉模型客户端
//! - Persistence: MySQL / PostgreSQL / SQLite 书目存储
//! - Console: 交互式命令循环与状态提问

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
