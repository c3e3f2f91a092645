//! 阅读状态来源

use std::io::Write;

use async_trait::async_trait;

use crate::application::ports::{PromptError, ReadingStatusPort};
use crate::domain::book::{BookMetadata, ReadingStatus};

use super::ConsoleInput;

/// 交互式状态提问
///
/// 先回显提取出的书目信息，再循环询问 C/P/N 直到输入有效。
pub struct ConsolePrompt {
    input: ConsoleInput,
}

impl ConsolePrompt {
    pub fn new(input: ConsoleInput) -> Self {
        Self { input }
    }
}

#[async_trait]
impl ReadingStatusPort for ConsolePrompt {
    async fn reading_status(&self, metadata: &BookMetadata) -> Result<ReadingStatus, PromptError> {
        println!("\nExtracted book information:");
        match serde_json::to_string_pretty(metadata) {
            Ok(json) => println!("{json}"),
            Err(_) => println!("{metadata:?}"),
        }

        println!("\nSelect reading status:");
        println!("  C - Complete");
        println!("  P - Partially Complete");
        println!("  N - Not Started");

        loop {
            print!("Enter C, P, or N: ");
            flush_stdout()?;

            let line = self
                .input
                .read_line()
                .await
                .map_err(|e| PromptError::Io(e.to_string()))?
                .ok_or(PromptError::Closed)?;

            match ReadingStatus::from_code(&line) {
                Ok(status) => {
                    println!("Selected: {}", status.as_str());
                    return Ok(status);
                }
                Err(_) => {
                    println!("Invalid input '{}'. Please enter C, P, or N.", line.trim());
                }
            }
        }
    }
}

/// 非交互场景（capture --status）的固定状态来源
///
/// 保存原始代码，校验推迟到工作流询问阶段，使无效代码
/// 与交互输入走同一条 Validation 错误路径。
pub struct FixedReadingStatus {
    code: String,
}

impl FixedReadingStatus {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

#[async_trait]
impl ReadingStatusPort for FixedReadingStatus {
    async fn reading_status(
        &self,
        _metadata: &BookMetadata,
    ) -> Result<ReadingStatus, PromptError> {
        ReadingStatus::from_code(&self.code)
            .map_err(|_| PromptError::InvalidCode(self.code.clone()))
    }
}

fn flush_stdout() -> Result<(), PromptError> {
    std::io::stdout()
        .flush()
        .map_err(|e| PromptError::Io(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> BookMetadata {
        BookMetadata::new("Dune", "Frank Herbert", "Chilton Books", "Desert epic.")
    }

    #[tokio::test]
    async fn test_fixed_status_accepts_known_codes() {
        let source = FixedReadingStatus::new("P");
        let status = source.reading_status(&metadata()).await.unwrap();
        assert_eq!(status, ReadingStatus::PartiallyComplete);
    }

    #[tokio::test]
    async fn test_fixed_status_rejects_unknown_code() {
        let source = FixedReadingStatus::new("x");
        let err = source.reading_status(&metadata()).await.unwrap_err();
        assert!(matches!(err, PromptError::InvalidCode(code) if code == "x"));
    }
}
