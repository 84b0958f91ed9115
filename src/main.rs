//! BookForge - AI 书籍生成系统
//!
//! 架构:
//! - Domain: book/ (Bounded Context)
//! - Application: pipeline, ports
//! - Infrastructure: http, memory, persistence, adapters, export, events

use std::sync::Arc;

use bookforge::application::pipeline::GenerationPipeline;
use bookforge::config::{load_config, print_config};
use bookforge::infrastructure::adapters::provider::{HttpProviderClient, HttpProviderConfig};
// use bookforge::infrastructure::adapters::provider::{FakeProviderClient, FakeProviderConfig};
use bookforge::infrastructure::events::EventPublisher;
use bookforge::infrastructure::http::{AppState, HttpServer, ServerConfig};
use bookforge::infrastructure::memory::InMemoryRunRegistry;
use bookforge::infrastructure::persistence::sled::SledBookStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},bookforge={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("BookForge - AI 书籍生成系统");
    print_config(&config);

    // 确保数据目录存在
    tokio::fs::create_dir_all(&config.storage.data_dir).await?;

    // 创建 Sled 书库存储
    let store = SledBookStore::open(config.storage.library_db_path())?.arc();

    // 创建 HTTP 内容生成客户端
    let provider_config = HttpProviderConfig {
        base_url: config.provider.base_url.clone(),
        api_key: config.provider.api_key.clone(),
        outline_model: config.provider.outline_model.clone(),
        chapter_model: config.provider.chapter_model.clone(),
        image_model: config.provider.image_model.clone(),
        timeout_secs: config.provider.timeout_secs,
    };
    let provider = Arc::new(HttpProviderClient::new(provider_config)?);

    // // 创建假生成客户端（本地联调用，无需 API 密钥）
    // let provider = Arc::new(FakeProviderClient::new(FakeProviderConfig::default()));

    // 创建事件发布器
    let events = EventPublisher::new().arc();

    // 创建运行注册表
    let runs = InMemoryRunRegistry::new().arc();

    // 创建生成管线
    let pipeline = GenerationPipeline::new(
        provider.clone(),
        store.clone(),
        runs.clone(),
        events.clone(),
    )
    .arc();

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(pipeline, store, runs, provider, events);

    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl-c");
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
