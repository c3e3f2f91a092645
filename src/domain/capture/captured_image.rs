//! Capture Context - 采集图像

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 单次采集得到的临时图像
///
/// 不变量:
/// - 只属于一次流水线执行
/// - 执行结束时删除，无论成功还是失败
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedImage {
    path: PathBuf,
    captured_at: DateTime<Utc>,
}

impl CapturedImage {
    pub fn new(path: PathBuf, captured_at: DateTime<Utc>) -> Self {
        Self { path, captured_at }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    /// 图像文件名（日志用）
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("<unnamed>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name() {
        let image = CapturedImage::new(
            PathBuf::from("/tmp/captured_images/captured_20240101_120000.jpg"),
            Utc::now(),
        );
        assert_eq!(image.file_name(), "captured_20240101_120000.jpg");
    }
}
