//! Booklog - 书库编目流水线
//!
//! - Domain: book/, capture/ (Bounded Contexts)
//! - Application: ports, workflow
//! - Infrastructure: camera, inference, persistence, console

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use booklog::application::ports::ReadingStatusPort;
use booklog::application::BookWorkflow;
use booklog::config::{load_config_from_path, print_config, resolve_api_key};
use booklog::infrastructure::camera::{IpWebcamClient, IpWebcamConfig};
// use booklog::infrastructure::camera::FakeCamera;
// use booklog::infrastructure::inference::FakeInferenceClient;
use booklog::infrastructure::console::{self, ConsoleInput, ConsolePrompt, FixedReadingStatus};
use booklog::infrastructure::inference::{OpenAiVisionClient, OpenAiVisionConfig};
use booklog::infrastructure::persistence::{connect_catalog_store, CatalogDialect};

/// Booklog - 从网络相机批量编目实体书
#[derive(Parser)]
#[command(name = "booklog")]
#[command(version)]
#[command(about = "Catalog physical books from a network camera into a database")]
struct Cli {
    /// 配置文件路径（默认搜索 config.toml / config.local.toml）
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// 交互式命令循环（默认）
    Interactive,
    /// 编目一本书后退出
    Capture {
        /// 阅读状态代码 c/p/n；省略则交互询问
        #[arg(short, long)]
        status: Option<String>,

        /// 覆盖配置中的默认存放位置
        #[arg(short, long)]
        location: Option<String>,
    },
    /// 测试相机连通性后退出
    Test,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config_from_path(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志；操作员界面走 stdout，日志走 stderr
    let log_filter = format!("{},booklog={}", config.log.level, config.log.level);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .with_writer(std::io::stderr);
    if config.log.json {
        builder.json().init();
    } else {
        builder.init();
    }

    tracing::info!("Booklog - 书库编目流水线");
    print_config(&config);

    // 推理凭证尽早解析，缺失时在任何工作流步骤之前报错
    let api_key = resolve_api_key(&config.inference).map_err(|e| anyhow::anyhow!("{}", e))?;

    // SQLite 数据库文件的父目录要先建好
    if config.database.dialect == CatalogDialect::Sqlite {
        if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
    }

    // 连接数据库（含建表迁移）
    let catalog = connect_catalog_store(
        config.database.dialect,
        &config.database.connection_url(),
        config.database.max_connections,
    )
    .await
    .map_err(|e| anyhow::anyhow!("Failed to connect catalog store: {}", e))?;

    // 相机适配器
    let camera_config = IpWebcamConfig {
        base_url: config.camera.base_url.clone(),
        timeout_secs: config.camera.timeout_secs,
        capture_dir: config.camera.capture_dir.clone(),
    };
    let camera = Arc::new(IpWebcamClient::new(camera_config)?);

    // 推理适配器
    let inference_config = OpenAiVisionConfig {
        base_url: config.inference.base_url.clone(),
        api_key,
        model: config.inference.model.clone(),
        image_detail: config.inference.image_detail.clone(),
        timeout_secs: config.inference.timeout_secs,
    };
    let inference = Arc::new(OpenAiVisionClient::new(inference_config)?);

    // // 离线联调用的替身适配器（不出网）
    // let camera = Arc::new(FakeCamera::new(config.camera.capture_dir.clone()));
    // let inference = Arc::new(FakeInferenceClient::with_defaults());

    let input = ConsoleInput::new();

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => {
            let status_source = Arc::new(ConsolePrompt::new(input.clone()));
            let workflow = BookWorkflow::new(
                camera,
                inference,
                catalog,
                status_source,
                config.library.location.clone(),
            );
            console::run_interactive(&workflow, &input).await?;
        }
        Commands::Capture { status, location } => {
            let status_source: Arc<dyn ReadingStatusPort> = match status {
                Some(code) => Arc::new(FixedReadingStatus::new(code)),
                None => Arc::new(ConsolePrompt::new(input.clone())),
            };
            let location = location.unwrap_or_else(|| config.library.location.clone());
            let workflow = BookWorkflow::new(camera, inference, catalog, status_source, location);

            match workflow.process_complete_book().await {
                Ok(report) => {
                    println!("\nFinal book information:");
                    println!("{}", "-".repeat(40));
                    println!("{}", report.record);
                    println!("{}", "-".repeat(40));
                    println!("✓ Added to catalog with row id {}", report.row_id);
                }
                Err(e) => {
                    println!("✗ Book processing failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Test => {
            let status_source = Arc::new(ConsolePrompt::new(input.clone()));
            let workflow = BookWorkflow::new(
                camera,
                inference,
                catalog,
                status_source,
                config.library.location.clone(),
            );

            println!("Testing camera connection...");
            match workflow.run_connectivity_test().await {
                Ok(()) => println!("✓ Connection successful!"),
                Err(e) => {
                    println!("✗ Connection failed: {e}");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
