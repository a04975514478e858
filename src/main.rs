use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use jewelry_pricing::app::{create_router, AppState};
use jewelry_pricing::infrastructure::{
    catalog::JsonFileCatalog, config::load_config, logger::Logger,
};
use jewelry_pricing::{QuoteCache, QuoteSource};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = parse_config_arg(env::args().skip(1))?;
    let config = load_config(config_path.as_deref()).context("加载配置失败")?;

    Logger::init(&config.logging.level);
    info!("启动珠宝定价服务...");

    let source = QuoteSource::from_config(&config.quote).context("构建金价提供方失败")?;
    info!("金价提供方: {:?}", source.provider_names());

    let quote_cache = Arc::new(QuoteCache::new(
        Arc::new(source),
        Duration::from_secs(config.quote.cache_window_seconds),
    ));
    let catalog = Arc::new(JsonFileCatalog::new(&config.catalog.path));
    info!("商品目录: {}", catalog.path().display());

    let state = AppState::new(catalog, quote_cache);
    let app = create_router(state, Duration::from_secs(config.http.timeout_seconds));

    let addr: SocketAddr = format!("{}:{}", config.http.bind_address, config.http.port)
        .parse()
        .context("无效的监听地址")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("无法绑定到 {}", addr))?;

    info!("🚀 服务运行在 http://{}", addr);
    info!("📖 API 端点:");
    info!("   GET /products - 商品列表 (minPrice, maxPrice, minPopularity, maxPopularity)");
    info!("   GET /quote    - 当前金价");
    info!("   GET /health   - 健康检查");

    axum::serve(listener, app).await.context("服务器运行失败")?;
    Ok(())
}

/// 解析 `--config <path>` 参数
fn parse_config_arg(mut args: impl Iterator<Item = String>) -> anyhow::Result<Option<PathBuf>> {
    let mut path = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let value = args.next().context("--config 需要一个文件路径")?;
                path = Some(PathBuf::from(value));
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => anyhow::bail!("未知参数: {}", other),
        }
    }
    Ok(path)
}

fn print_usage() {
    println!("用法: jewelry_server [--config <path>]");
    println!();
    println!("未指定配置时依次查找 $JEWELRY_CONFIG、config.toml、config/config.toml");
}
