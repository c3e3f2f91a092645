//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod camera;
pub mod console;
pub mod inference;
pub mod persistence;

pub use camera::{FakeCamera, IpWebcamClient, IpWebcamConfig};
pub use console::{ConsoleInput, ConsolePrompt, FixedReadingStatus};
pub use inference::{FakeInferenceClient, OpenAiVisionClient, OpenAiVisionConfig};
pub use persistence::{connect_catalog_store, CatalogDialect};
