//! Book Context - Value Objects

use serde::{Deserialize, Serialize};

use super::BookError;

/// 书目元数据
///
/// 由视觉模型从书名页照片中提取，提取后不可变。
/// 多位贡献者合并在 author 字段中（附角色缩写，如 "J. Smith (ed.)"）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BookMetadata {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub description: String,
}

impl BookMetadata {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        publisher: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            publisher: publisher.into(),
            description: description.into(),
        }
    }
}

/// 主题分类
///
/// subject 为宽泛类别（如 "Science Fiction"），
/// specific_subject 为细分类别（如 "Space Opera"）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectInfo {
    pub subject: String,
    pub specific_subject: String,
}

impl SubjectInfo {
    pub fn new(subject: impl Into<String>, specific_subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            specific_subject: specific_subject.into(),
        }
    }
}

/// 阅读状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadingStatus {
    #[serde(rename = "Complete")]
    Complete,
    #[serde(rename = "Partially Complete")]
    PartiallyComplete,
    #[serde(rename = "Not Started")]
    NotStarted,
}

impl ReadingStatus {
    /// 入库使用的标签
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::Complete => "Complete",
            ReadingStatus::PartiallyComplete => "Partially Complete",
            ReadingStatus::NotStarted => "Not Started",
        }
    }

    /// 从操作员输入的单字母代码解析（大小写不敏感）
    ///
    /// c = Complete, p = Partially Complete, n = Not Started；
    /// 其余输入一律拒绝，不做猜测。
    pub fn from_code(code: &str) -> Result<Self, BookError> {
        let code = code.trim();
        match code.to_ascii_lowercase().as_str() {
            "c" => Ok(ReadingStatus::Complete),
            "p" => Ok(ReadingStatus::PartiallyComplete),
            "n" => Ok(ReadingStatus::NotStarted),
            _ => Err(BookError::InvalidReadingStatus(code.to_string())),
        }
    }

    /// 从入库标签解析
    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "Complete" => Some(ReadingStatus::Complete),
            "Partially Complete" => Some(ReadingStatus::PartiallyComplete),
            "Not Started" => Some(ReadingStatus::NotStarted),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_accepts_all_cases() {
        assert_eq!(
            ReadingStatus::from_code("c").unwrap(),
            ReadingStatus::Complete
        );
        assert_eq!(
            ReadingStatus::from_code("P").unwrap(),
            ReadingStatus::PartiallyComplete
        );
        assert_eq!(
            ReadingStatus::from_code(" N ").unwrap(),
            ReadingStatus::NotStarted
        );
    }

    #[test]
    fn test_from_code_rejects_unknown() {
        let err = ReadingStatus::from_code("x").unwrap_err();
        assert!(matches!(err, BookError::InvalidReadingStatus(code) if code == "x"));
        assert!(ReadingStatus::from_code("").is_err());
        assert!(ReadingStatus::from_code("complete").is_err());
    }

    #[test]
    fn test_label_round_trip() {
        for status in [
            ReadingStatus::Complete,
            ReadingStatus::PartiallyComplete,
            ReadingStatus::NotStarted,
        ] {
            assert_eq!(ReadingStatus::from_label(status.as_str()), Some(status));
        }
        assert_eq!(ReadingStatus::from_label("unknown"), None);
    }

    #[test]
    fn test_metadata_serializes_with_capitalized_keys() {
        let metadata = BookMetadata::new("Dune", "Frank Herbert", "Chilton Books", "Epic.");
        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["Title"], "Dune");
        assert_eq!(json["Description"], "Epic.");
    }
}
