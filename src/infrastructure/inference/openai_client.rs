//! OpenAI Vision Client - 调用视觉语言模型
//!
//! 实现 InferencePort trait，通过 chat completions API 完成:
//! - 书名页照片 → 书目元数据（图像以 base64 data URI 内联）
//! - 元数据 + 已有主题词汇 → 主题分类
//!
//! 外部 API:
//! POST {base_url}/chat/completions  (Bearer 认证, JSON)

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::fs;

use crate::application::ports::{InferenceError, InferencePort, SubjectContext};
use crate::domain::book::{BookMetadata, SubjectInfo};
use crate::domain::capture::CapturedImage;

/// 提取阶段的系统指令
const EXTRACTION_SYSTEM_PROMPT: &str = r#"You are an expert bibliographic extractor.
When the user shows you a book title page image, return ONLY a JSON object with all text exactly as printed.
For the author, include all contributors with an abbreviation of their role, e.g. ed. for the editor, trans. for the translator.
The JSON object must contain exactly these string fields:
{
    "Title": "The title of the book",
    "Author": "The author and other contributors of the book",
    "Publisher": "The publisher of the book",
    "Description": "A short description of the book"
}
Infer the description from your knowledge of the book."#;

/// 分类阶段的系统指令
const CLASSIFY_SYSTEM_PROMPT: &str = r#"You are an expert bibliographic subject and specific subject classifier.
When the user gives you a JSON object with the title, author, publisher, and description of a book, infer the subject and specific subject of the book and return ONLY a JSON object in the following format:
{
    "Subject": "The subject of the book",
    "SubjectSpecific": "The specific subject of the book"
}"#;

/// OpenAI Vision 客户端配置
#[derive(Debug, Clone)]
pub struct OpenAiVisionConfig {
    /// API 基础 URL
    pub base_url: String,
    /// API 密钥
    pub api_key: String,
    /// 模型名称
    pub model: String,
    /// 图像细节级别: "low" / "auto" / "high"
    pub image_detail: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for OpenAiVisionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4.1".to_string(),
            image_detail: "auto".to_string(),
            timeout_secs: 60,
        }
    }
}

impl OpenAiVisionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// OpenAI Vision 客户端
pub struct OpenAiVisionClient {
    client: Client,
    config: OpenAiVisionConfig,
}

impl OpenAiVisionClient {
    /// 创建新的客户端
    pub fn new(config: OpenAiVisionConfig) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| InferenceError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// 发送一次聊天补全请求，返回首个 choice 的文本内容
    async fn complete(&self, body: serde_json::Value) -> Result<String, InferenceError> {
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    InferenceError::Network("request timed out".to_string())
                } else if e.is_connect() {
                    InferenceError::Network(format!("Cannot connect to inference API: {}", e))
                } else {
                    InferenceError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Api(format!(
                "HTTP {}: {}",
                status, error_body
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::MalformedResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                InferenceError::MalformedResponse("empty completion content".to_string())
            })
    }
}

#[async_trait]
impl InferencePort for OpenAiVisionClient {
    async fn extract_metadata(
        &self,
        image: &CapturedImage,
    ) -> Result<BookMetadata, InferenceError> {
        let bytes = fs::read(image.path())
            .await
            .map_err(|e| InferenceError::Io(e.to_string()))?;
        let data_uri = format!("data:image/jpeg;base64,{}", STANDARD.encode(&bytes));

        tracing::debug!(
            model = %self.config.model,
            image = %image.file_name(),
            image_size = bytes.len(),
            "Sending extraction request"
        );

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": EXTRACTION_SYSTEM_PROMPT },
                { "role": "user", "content": [
                    { "type": "text", "text": "This is an image of a title page of a book." },
                    { "type": "image_url",
                      "image_url": { "url": data_uri, "detail": self.config.image_detail } }
                ]}
            ],
            "temperature": 0.2
        });

        let content = self.complete(body).await?;
        let metadata = parse_metadata(&content)?;

        tracing::info!(title = %metadata.title, "Extraction completed");
        Ok(metadata)
    }

    async fn infer_subject(
        &self,
        metadata: &BookMetadata,
        context: &SubjectContext,
    ) -> Result<SubjectInfo, InferenceError> {
        let book_info = serde_json::to_string(metadata)
            .map_err(|e| InferenceError::MalformedResponse(e.to_string()))?;

        tracing::debug!(
            model = %self.config.model,
            known_subjects = context.subjects.len(),
            known_specific_subjects = context.specific_subjects.len(),
            "Sending classification request"
        );

        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": CLASSIFY_SYSTEM_PROMPT },
                { "role": "user", "content": [
                    { "type": "text", "text": classify_prompt(context) },
                    { "type": "text", "text": book_info }
                ]}
            ],
            "temperature": 0.2
        });

        let content = self.complete(body).await?;
        let subject = parse_subject(&content)?;

        tracing::info!(
            subject = %subject.subject,
            specific_subject = %subject.specific_subject,
            "Classification completed"
        );
        Ok(subject)
    }
}

/// 分类阶段的用户提示词：附上目录中已有的两份主题清单
fn classify_prompt(context: &SubjectContext) -> String {
    format!(
        "Given the following subjects and specific subjects, and information about a book, \
         infer the subject and specific subject of the book. Subjects: {:?}. \
         Specific Subjects: {:?}. Prefer one of the existing subjects when the book \
         plausibly fits it; otherwise propose a suitable new subject and specific subject.",
        context.subjects, context.specific_subjects
    )
}

// ============================================================================
// 响应解析
// ============================================================================

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// 提取响应的严格结构：四个字段缺一不可，全部为字符串
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MetadataPayload {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Author")]
    author: String,
    #[serde(rename = "Publisher")]
    publisher: String,
    #[serde(rename = "Description")]
    description: String,
}

impl From<MetadataPayload> for BookMetadata {
    fn from(payload: MetadataPayload) -> Self {
        BookMetadata::new(
            payload.title,
            payload.author,
            payload.publisher,
            payload.description,
        )
    }
}

/// 分类响应的严格结构
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SubjectPayload {
    #[serde(rename = "Subject")]
    subject: String,
    #[serde(rename = "SubjectSpecific")]
    subject_specific: String,
}

impl From<SubjectPayload> for SubjectInfo {
    fn from(payload: SubjectPayload) -> Self {
        SubjectInfo::new(payload.subject, payload.subject_specific)
    }
}

/// 解析提取响应；结构不符一律判为格式错误，不做默认值填充
fn parse_metadata(content: &str) -> Result<BookMetadata, InferenceError> {
    let cleaned = repair_trailing_commas(strip_code_fences(content));
    let payload: MetadataPayload = serde_json::from_str(&cleaned)
        .map_err(|e| InferenceError::MalformedResponse(e.to_string()))?;
    Ok(payload.into())
}

/// 解析分类响应
fn parse_subject(content: &str) -> Result<SubjectInfo, InferenceError> {
    let cleaned = repair_trailing_commas(strip_code_fences(content));
    let payload: SubjectPayload = serde_json::from_str(&cleaned)
        .map_err(|e| InferenceError::MalformedResponse(e.to_string()))?;
    Ok(payload.into())
}

/// 去掉模型喜欢加的 markdown 代码围栏
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    inner.trim()
}

/// 修复右花括号前的尾逗号（GPT 输出的常见毛病）
fn repair_trailing_commas(json_str: &str) -> String {
    let lines: Vec<&str> = json_str.split('\n').collect();
    let mut fixed = Vec::with_capacity(lines.len());

    for (i, line) in lines.iter().enumerate() {
        let next_is_closing = lines
            .get(i + 1)
            .map(|next| next.trim() == "}")
            .unwrap_or(false);
        if next_is_closing && line.trim_end().ends_with(',') {
            fixed.push(line.trim_end().trim_end_matches(',').to_string());
        } else {
            fixed.push(line.to_string());
        }
    }

    fixed.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = OpenAiVisionConfig::default();
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-4.1");
        assert_eq!(config.image_detail, "auto");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_repair_trailing_commas() {
        let broken = "{\n  \"Title\": \"Dune\",\n  \"Author\": \"Frank Herbert\",\n}";
        let fixed = repair_trailing_commas(broken);
        assert!(serde_json::from_str::<serde_json::Value>(&fixed).is_ok());

        let valid = "{\n  \"Title\": \"Dune\"\n}";
        assert_eq!(repair_trailing_commas(valid), valid);
    }

    #[test]
    fn test_parse_metadata_happy_path() {
        let content = r#"```json
{
    "Title": "Dune",
    "Author": "Frank Herbert",
    "Publisher": "Chilton Books",
    "Description": "A desert planet epic.",
}
```"#;
        let metadata = parse_metadata(content).unwrap();
        assert_eq!(metadata.title, "Dune");
        assert_eq!(metadata.publisher, "Chilton Books");
    }

    #[test]
    fn test_parse_metadata_rejects_missing_description() {
        let content = r#"{"Title": "Dune", "Author": "Frank Herbert", "Publisher": "Chilton Books"}"#;
        let err = parse_metadata(content).unwrap_err();
        assert!(matches!(err, InferenceError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_metadata_rejects_null_and_extras() {
        let null_field = r#"{"Title": "Dune", "Author": "Frank Herbert", "Publisher": "Chilton Books", "Description": null}"#;
        assert!(parse_metadata(null_field).is_err());

        let extra_field = r#"{"Title": "Dune", "Author": "Frank Herbert", "Publisher": "Chilton Books", "Description": "Epic.", "ISBN": "999"}"#;
        assert!(parse_metadata(extra_field).is_err());
    }

    #[test]
    fn test_parse_subject() {
        let content = r#"{"Subject": "Science Fiction", "SubjectSpecific": "Space Opera"}"#;
        let subject = parse_subject(content).unwrap();
        assert_eq!(subject.subject, "Science Fiction");
        assert_eq!(subject.specific_subject, "Space Opera");

        assert!(parse_subject(r#"{"Subject": "Science Fiction"}"#).is_err());
    }

    #[test]
    fn test_classify_prompt_lists_both_vocabularies() {
        let context = SubjectContext {
            subjects: vec!["Fiction".to_string(), "History".to_string()],
            specific_subjects: vec!["Space Opera".to_string()],
        };
        let prompt = classify_prompt(&context);
        assert!(prompt.contains("\"Fiction\""));
        assert!(prompt.contains("\"History\""));
        assert!(prompt.contains("\"Space Opera\""));
    }
}
