//! Camera Port - 网络相机抽象
//!
//! 定义图像采集的抽象接口，具体实现在 infrastructure/camera 层

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::capture::CapturedImage;

/// 相机错误
#[derive(Debug, Error)]
pub enum CameraError {
    #[error("Cannot reach camera: {0}")]
    Connection(String),

    #[error("Camera request timed out")]
    Timeout,

    #[error("Invalid image payload: {0}")]
    InvalidImage(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// Camera Port
///
/// 网络相机的抽象接口
#[async_trait]
pub trait CameraPort: Send + Sync {
    /// 采集一帧并保存为带时间戳的临时文件
    async fn capture(&self) -> Result<CapturedImage, CameraError>;

    /// 删除采集的临时文件
    ///
    /// 文件已不存在视为成功。
    async fn discard(&self, image: &CapturedImage) -> Result<(), CameraError>;
}
