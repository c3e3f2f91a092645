//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, InferenceConfig};
use crate::infrastructure::persistence::CatalogDialect;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `BOOKLOG_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `BOOKLOG_CAMERA__BASE_URL=http://192.168.1.15:8080`
/// - `BOOKLOG_DATABASE__DIALECT=mysql`
/// - `BOOKLOG_DATABASE__PASSWORD=secret`
/// - `BOOKLOG_LIBRARY__LOCATION="Home Office"`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("camera.base_url", "http://192.168.1.100:8080")?
        .set_default("camera.timeout_secs", 10)?
        .set_default("camera.capture_dir", "captured_images")?
        .set_default("inference.base_url", "https://api.openai.com/v1")?
        .set_default("inference.api_key", "")?
        .set_default("inference.model", "gpt-4.1")?
        .set_default("inference.image_detail", "auto")?
        .set_default("inference.timeout_secs", 60)?
        .set_default("database.dialect", "sqlite")?
        .set_default("database.host", "localhost")?
        .set_default("database.port", 0)?
        .set_default("database.username", "root")?
        .set_default("database.password", "")?
        .set_default("database.database", "booklog")?
        .set_default("database.path", "data/booklog.db")?
        .set_default("database.max_connections", 1)?
        .set_default("library.location", "")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        // 搜索默认配置文件
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 前缀: BOOKLOG_
    // 层级分隔符: __ (双下划线)
    // 例如: BOOKLOG_CAMERA__BASE_URL=http://192.168.1.15:8080
    builder = builder.add_source(
        Environment::with_prefix("BOOKLOG")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize config: {}", e)))?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.camera.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Camera base URL cannot be empty".to_string(),
        ));
    }

    if config.camera.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Camera timeout cannot be 0".to_string(),
        ));
    }

    if config.inference.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Inference base URL cannot be empty".to_string(),
        ));
    }

    if config.inference.model.is_empty() {
        return Err(ConfigError::ValidationError(
            "Inference model cannot be empty".to_string(),
        ));
    }

    match config.database.dialect {
        CatalogDialect::Sqlite => {
            if config.database.path.is_empty() {
                return Err(ConfigError::ValidationError(
                    "Database path cannot be empty".to_string(),
                ));
            }
        }
        CatalogDialect::Mysql | CatalogDialect::Postgres => {
            if config.database.host.is_empty() {
                return Err(ConfigError::ValidationError(
                    "Database host cannot be empty".to_string(),
                ));
            }
            if config.database.database.is_empty() {
                return Err(ConfigError::ValidationError(
                    "Database name cannot be empty".to_string(),
                ));
            }
        }
    }

    Ok(())
}

/// 解析推理服务凭证
///
/// 顺序: 配置项 api_key → OPENAI_API_KEY 环境变量 → api_key_file 文件内容。
/// 三处都未提供时报配置错误，赶在任何工作流步骤之前。
pub fn resolve_api_key(config: &InferenceConfig) -> Result<String, ConfigError> {
    resolve_api_key_with(config, std::env::var("OPENAI_API_KEY").ok())
}

fn resolve_api_key_with(
    config: &InferenceConfig,
    env_key: Option<String>,
) -> Result<String, ConfigError> {
    if !config.api_key.trim().is_empty() {
        return Ok(config.api_key.trim().to_string());
    }

    if let Some(key) = env_key {
        if !key.trim().is_empty() {
            return Ok(key.trim().to_string());
        }
    }

    if let Some(path) = &config.api_key_file {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::ValidationError(format!(
                "Failed to read api_key_file {}: {}",
                path.display(),
                e
            ))
        })?;
        let key = contents.trim();
        if key.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "api_key_file {} is empty",
                path.display()
            )));
        }
        return Ok(key.to_string());
    }

    Err(ConfigError::ValidationError(
        "No inference API key configured: set inference.api_key, OPENAI_API_KEY, or inference.api_key_file"
            .to_string(),
    ))
}

/// 打印配置信息（用于启动时日志）
///
/// API key 不打印内容，只标注来源。
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Camera URL: {}", config.camera.base_url);
    tracing::info!("Camera Timeout: {}s", config.camera.timeout_secs);
    tracing::info!("Capture Directory: {:?}", config.camera.capture_dir);
    tracing::info!("Inference URL: {}", config.inference.base_url);
    tracing::info!("Inference Model: {}", config.inference.model);
    tracing::info!("Image Detail: {}", config.inference.image_detail);
    tracing::info!("Inference Timeout: {}s", config.inference.timeout_secs);
    if config.inference.api_key.is_empty() {
        tracing::info!("Inference API Key: (from environment or key file)");
    } else {
        tracing::info!("Inference API Key: ****");
    }
    match config.database.dialect {
        CatalogDialect::Sqlite => {
            tracing::info!("Database: sqlite:{}", config.database.path);
        }
        CatalogDialect::Mysql | CatalogDialect::Postgres => {
            tracing::info!(
                "Database: {}://{}@{}:{}/{}",
                config.database.dialect.as_str(),
                config.database.username,
                config.database.host,
                config.database.effective_port(),
                config.database.database
            );
        }
    }
    tracing::info!("Database Max Connections: {}", config.database.max_connections);
    if config.library.location.is_empty() {
        tracing::info!("Default Location: (none)");
    } else {
        tracing::info!("Default Location: {}", config.library.location);
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
