//! Fake Camera - 用于测试的相机实现
//!
//! 不访问网络，始终把内置（或配置）的 JPEG 字节写入采集目录

use async_trait::async_trait;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;

use crate::application::ports::{CameraError, CameraPort};
use crate::domain::capture::CapturedImage;

/// 最小合法 JPEG（SOI + EOI），足以通过载荷检查
const MINIMAL_JPEG: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xD9];

/// Fake Camera
///
/// 文件名带自增序号，同一测试内多次采集不会相互覆盖
pub struct FakeCamera {
    capture_dir: PathBuf,
    image_bytes: Vec<u8>,
    counter: AtomicU64,
}

impl FakeCamera {
    /// 创建写入内置最小 JPEG 的 Fake Camera
    pub fn new(capture_dir: impl Into<PathBuf>) -> Self {
        Self::with_image(capture_dir, MINIMAL_JPEG.to_vec())
    }

    /// 创建写入指定字节的 Fake Camera
    pub fn with_image(capture_dir: impl Into<PathBuf>, image_bytes: Vec<u8>) -> Self {
        Self {
            capture_dir: capture_dir.into(),
            image_bytes,
            counter: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl CameraPort for FakeCamera {
    async fn capture(&self) -> Result<CapturedImage, CameraError> {
        let captured_at = Utc::now();
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let file_name = format!(
            "captured_{}_{:03}.jpg",
            captured_at.format("%Y%m%d_%H%M%S"),
            n
        );

        fs::create_dir_all(&self.capture_dir)
            .await
            .map_err(|e| CameraError::Io(e.to_string()))?;

        let path = self.capture_dir.join(file_name);
        fs::write(&path, &self.image_bytes)
            .await
            .map_err(|e| CameraError::Io(e.to_string()))?;

        tracing::debug!(path = %path.display(), "FakeCamera: wrote canned frame");

        Ok(CapturedImage::new(path, captured_at))
    }

    async fn discard(&self, image: &CapturedImage) -> Result<(), CameraError> {
        match fs::remove_file(image.path()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CameraError::Io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_capture_writes_jpeg_and_discard_removes_it() {
        let dir = tempfile::tempdir().unwrap();
        let camera = FakeCamera::new(dir.path());

        let image = camera.capture().await.unwrap();
        let bytes = std::fs::read(image.path()).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

        camera.discard(&image).await.unwrap();
        assert!(!image.path().exists());
        // 重复删除不算错误
        camera.discard(&image).await.unwrap();
    }

    #[tokio::test]
    async fn test_consecutive_captures_get_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();
        let camera = FakeCamera::new(dir.path());

        let first = camera.capture().await.unwrap();
        let second = camera.capture().await.unwrap();
        assert_ne!(first.path(), second.path());
    }
}
