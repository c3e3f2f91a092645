//! IP Webcam Client - 网络相机图像采集
//!
//! 实现 CameraPort trait，通过 HTTP 从 IP Webcam 类应用拉取单帧
//!
//! 相机 API:
//! GET {base_url}/shot.jpg
//! Response: image/jpeg binary

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;

use crate::application::ports::{CameraError, CameraPort};
use crate::domain::capture::CapturedImage;

/// JPEG SOI 标记
const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];

/// IP Webcam 客户端配置
#[derive(Debug, Clone)]
pub struct IpWebcamConfig {
    /// 相机基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 采集图像的保存目录
    pub capture_dir: PathBuf,
}

impl Default for IpWebcamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://192.168.1.100:8080".to_string(),
            timeout_secs: 10,
            capture_dir: PathBuf::from("captured_images"),
        }
    }
}

impl IpWebcamConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_capture_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.capture_dir = dir.into();
        self
    }
}

/// IP Webcam 客户端
///
/// 每次 capture 拉取一帧，保存为带时间戳的临时文件
pub struct IpWebcamClient {
    client: Client,
    config: IpWebcamConfig,
}

impl IpWebcamClient {
    /// 创建新的 IP Webcam 客户端
    pub fn new(config: IpWebcamConfig) -> Result<Self, CameraError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CameraError::Connection(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 单帧抓取 URL
    fn shot_url(&self) -> String {
        format!("{}/shot.jpg", self.config.base_url.trim_end_matches('/'))
    }

    /// 带时间戳的目标文件路径
    fn capture_path(&self, at: DateTime<Utc>) -> PathBuf {
        self.config.capture_dir.join(timestamped_file_name(at))
    }
}

/// captured_YYYYmmdd_HHMMSS.jpg
fn timestamped_file_name(at: DateTime<Utc>) -> String {
    format!("captured_{}.jpg", at.format("%Y%m%d_%H%M%S"))
}

/// 载荷必须以 JPEG SOI 标记开头
fn looks_like_jpeg(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[..2] == JPEG_SOI
}

#[async_trait]
impl CameraPort for IpWebcamClient {
    async fn capture(&self) -> Result<CapturedImage, CameraError> {
        let url = self.shot_url();
        tracing::debug!(url = %url, "Requesting camera frame");

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                CameraError::Timeout
            } else if e.is_connect() {
                CameraError::Connection(format!("Cannot connect to camera: {}", e))
            } else {
                CameraError::Connection(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CameraError::Connection(format!(
                "Camera returned HTTP {}",
                status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CameraError::Connection(format!("Failed to read frame body: {}", e)))?;

        if !looks_like_jpeg(&bytes) {
            return Err(CameraError::InvalidImage(format!(
                "payload of {} bytes is not a JPEG",
                bytes.len()
            )));
        }

        let captured_at = Utc::now();

        fs::create_dir_all(&self.config.capture_dir)
            .await
            .map_err(|e| CameraError::Io(e.to_string()))?;

        let path = self.capture_path(captured_at);
        fs::write(&path, &bytes)
            .await
            .map_err(|e| CameraError::Io(e.to_string()))?;

        tracing::info!(
            path = %path.display(),
            size = bytes.len(),
            "Frame captured"
        );

        Ok(CapturedImage::new(path, captured_at))
    }

    async fn discard(&self, image: &CapturedImage) -> Result<(), CameraError> {
        match fs::remove_file(image.path()).await {
            Ok(()) => {
                tracing::debug!(path = %image.path().display(), "Captured image deleted");
                Ok(())
            }
            // 已不存在同样算删除成功
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CameraError::Io(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = IpWebcamConfig::default();
        assert_eq!(config.base_url, "http://192.168.1.100:8080");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.capture_dir, PathBuf::from("captured_images"));
    }

    #[test]
    fn test_config_builder() {
        let config = IpWebcamConfig::new("http://10.0.0.5:8080")
            .with_timeout(3)
            .with_capture_dir("/tmp/frames");
        assert_eq!(config.base_url, "http://10.0.0.5:8080");
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.capture_dir, PathBuf::from("/tmp/frames"));
    }

    #[test]
    fn test_shot_url_ignores_trailing_slash() {
        let client = IpWebcamClient::new(IpWebcamConfig::new("http://10.0.0.5:8080/")).unwrap();
        assert_eq!(client.shot_url(), "http://10.0.0.5:8080/shot.jpg");
    }

    #[test]
    fn test_timestamped_file_name() {
        let at = DateTime::parse_from_rfc3339("2024-06-01T09:30:05Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(timestamped_file_name(at), "captured_20240601_093005.jpg");
    }

    #[test]
    fn test_jpeg_payload_check() {
        assert!(looks_like_jpeg(&[0xFF, 0xD8, 0xFF, 0xD9]));
        assert!(!looks_like_jpeg(&[]));
        assert!(!looks_like_jpeg(&[0xFF]));
        // PNG 文件头
        assert!(!looks_like_jpeg(&[0x89, 0x50, 0x4E, 0x47]));
        // HTML 错误页
        assert!(!looks_like_jpeg(b"<html>error</html>"));
    }

    #[tokio::test]
    async fn test_discard_missing_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let client = IpWebcamClient::new(
            IpWebcamConfig::new("http://10.0.0.5:8080").with_capture_dir(dir.path()),
        )
        .unwrap();

        let image = CapturedImage::new(dir.path().join("never_written.jpg"), Utc::now());
        assert!(client.discard(&image).await.is_ok());
    }
}
