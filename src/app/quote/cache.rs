//! 进程级单槽报价缓存

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info};

use super::model::Quote;
use super::source::QuoteSource;

/// 默认缓存窗口：5 分钟
pub const DEFAULT_CACHE_WINDOW: Duration = Duration::from_secs(5 * 60);

/// 缓存槽：报价与获取时间总是成对替换
#[derive(Debug, Clone)]
struct CachedQuote {
    quote: Quote,
    fetched_at: Instant,
}

/// 报价缓存
///
/// 在进程启动时构建一次，通过 `Arc` 共享给所有请求。
/// 刷新由 `refresh_lock` 串行化，等待者拿到锁后会重新检查新鲜度，
/// 因此并发过期时只会发起一次请求。
pub struct QuoteCache {
    source: Arc<QuoteSource>,
    window: Duration,
    slot: RwLock<Option<CachedQuote>>,
    refresh_lock: Mutex<()>,
}

impl QuoteCache {
    pub fn new(source: Arc<QuoteSource>, window: Duration) -> Self {
        Self {
            source,
            window,
            slot: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// 获取当前报价，过期或为空时刷新
    pub async fn get(&self) -> Quote {
        if let Some(quote) = self.fresh().await {
            return quote;
        }

        let _guard = self.refresh_lock.lock().await;
        if let Some(quote) = self.fresh().await {
            debug!("其他请求已刷新报价缓存");
            return quote;
        }

        let quote = self.source.fetch_quote().await;
        info!(
            "报价缓存已刷新: {} USD/克 (来源: {})",
            quote.price_per_gram, quote.source
        );

        *self.slot.write().await = Some(CachedQuote {
            quote: quote.clone(),
            fetched_at: Instant::now(),
        });
        quote
    }

    /// 清空缓存，下一次 `get` 会重新获取
    pub async fn invalidate(&self) {
        *self.slot.write().await = None;
        debug!("报价缓存已清空");
    }

    /// 当前缓存中的报价（不触发刷新）
    pub async fn peek(&self) -> Option<Quote> {
        self.slot.read().await.as_ref().map(|c| c.quote.clone())
    }

    async fn fresh(&self) -> Option<Quote> {
        let slot = self.slot.read().await;
        slot.as_ref()
            .filter(|c| c.fetched_at.elapsed() <= self.window)
            .map(|c| c.quote.clone())
    }
}
