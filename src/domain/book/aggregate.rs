//! Book Context - Aggregate Root

use serde::{Deserialize, Serialize};

use super::{BookError, BookMetadata, ReadingStatus, SubjectInfo};

/// 完整书目记录
///
/// 不变量:
/// - merge 之后字段不可变
/// - 整行一次性入库，不存在部分写入
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteBookRecord {
    title: String,
    author: String,
    publisher: String,
    description: String,
    subject: String,
    specific_subject: String,
    location: String,
    reading_status: ReadingStatus,
}

impl CompleteBookRecord {
    /// 合并提取的元数据、主题分类、存放位置与阅读状态
    ///
    /// 纯组合，无失败路径；阅读状态代码的校验发生在此之前。
    pub fn merge(
        metadata: BookMetadata,
        subject: SubjectInfo,
        location: impl Into<String>,
        reading_status: ReadingStatus,
    ) -> Self {
        Self {
            title: metadata.title,
            author: metadata.author,
            publisher: metadata.publisher,
            description: metadata.description,
            subject: subject.subject,
            specific_subject: subject.specific_subject,
            location: location.into(),
            reading_status,
        }
    }

    /// 入库前校验
    pub fn validate(&self) -> Result<(), BookError> {
        if self.title.trim().is_empty() {
            return Err(BookError::IncompleteRecord("title is empty".to_string()));
        }
        Ok(())
    }

    // Getters
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn publisher(&self) -> &str {
        &self.publisher
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn specific_subject(&self) -> &str {
        &self.specific_subject
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn reading_status(&self) -> ReadingStatus {
        self.reading_status
    }
}

impl std::fmt::Display for CompleteBookRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Title: {}", self.title)?;
        writeln!(f, "Author: {}", self.author)?;
        writeln!(f, "Publisher: {}", self.publisher)?;
        writeln!(f, "Description: {}", self.description)?;
        writeln!(f, "Subject: {}", self.subject)?;
        writeln!(f, "Specific Subject: {}", self.specific_subject)?;
        writeln!(f, "Location: {}", self.location)?;
        write!(f, "Reading Status: {}", self.reading_status.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metadata() -> BookMetadata {
        BookMetadata::new(
            "Dune",
            "Frank Herbert",
            "Chilton Books",
            "A desert planet epic.",
        )
    }

    #[test]
    fn test_merge_combines_all_fields() {
        let record = CompleteBookRecord::merge(
            sample_metadata(),
            SubjectInfo::new("Science Fiction", "Space Opera"),
            "Home Office",
            ReadingStatus::Complete,
        );

        assert_eq!(record.title(), "Dune");
        assert_eq!(record.author(), "Frank Herbert");
        assert_eq!(record.publisher(), "Chilton Books");
        assert_eq!(record.description(), "A desert planet epic.");
        assert_eq!(record.subject(), "Science Fiction");
        assert_eq!(record.specific_subject(), "Space Opera");
        assert_eq!(record.location(), "Home Office");
        assert_eq!(record.reading_status(), ReadingStatus::Complete);
    }

    #[test]
    fn test_validate_rejects_empty_title() {
        let record = CompleteBookRecord::merge(
            BookMetadata::new("   ", "someone", "somewhere", "something"),
            SubjectInfo::new("Fiction", "General"),
            "Shelf A",
            ReadingStatus::NotStarted,
        );

        assert!(record.validate().is_err());
    }

    #[test]
    fn test_display_echoes_every_field() {
        let record = CompleteBookRecord::merge(
            sample_metadata(),
            SubjectInfo::new("Science Fiction", "Space Opera"),
            "Home Office",
            ReadingStatus::PartiallyComplete,
        );

        let echo = record.to_string();
        assert!(echo.contains("Title: Dune"));
        assert!(echo.contains("Specific Subject: Space Opera"));
        assert!(echo.contains("Reading Status: Partially Complete"));
    }
}
