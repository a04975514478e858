//! 报价源：按优先级尝试提供方，全部失败时回退到固定金价

use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::Client;
use tracing::{debug, warn};

use super::model::{Quote, FALLBACK_PRICE_PER_GRAM};
use super::provider::{build_provider, QuoteProvider};
use crate::infrastructure::config::QuoteConfig;

/// 回退报价的来源名称
pub const FALLBACK_SOURCE: &str = "fallback";

/// 报价源
///
/// `fetch_quote` 从不返回错误：每个提供方最多尝试一次，
/// 单次尝试受 `attempt_timeout` 限制，超时视为失败。
pub struct QuoteSource {
    providers: Vec<Box<dyn QuoteProvider>>,
    attempt_timeout: Duration,
    fallback_price_per_gram: f64,
}

impl QuoteSource {
    pub fn new(
        providers: Vec<Box<dyn QuoteProvider>>,
        attempt_timeout: Duration,
        fallback_price_per_gram: f64,
    ) -> Self {
        Self {
            providers,
            attempt_timeout,
            fallback_price_per_gram,
        }
    }

    /// 只使用固定金价的报价源
    pub fn fallback_only() -> Self {
        Self::new(Vec::new(), Duration::from_secs(5), FALLBACK_PRICE_PER_GRAM)
    }

    /// 从配置构建报价源，共享同一个带超时的 HTTP 客户端
    pub fn from_config(config: &QuoteConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.provider_timeout_seconds);
        let client = Client::builder().timeout(timeout).build()?;

        let providers = config
            .providers
            .iter()
            .map(|p| build_provider(p, &client))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(providers, timeout, config.fallback_price_per_gram))
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// 获取当前报价
    pub async fn fetch_quote(&self) -> Quote {
        for provider in &self.providers {
            match self.attempt(provider.as_ref()).await {
                Ok(price_per_gram) => {
                    debug!("提供方 {} 报价: {} USD/克", provider.name(), price_per_gram);
                    return Quote::new(price_per_gram, provider.name());
                }
                Err(e) => warn!("提供方 {} 获取金价失败，尝试下一个: {:#}", provider.name(), e),
            }
        }

        if !self.providers.is_empty() {
            warn!(
                "所有金价提供方均失败，使用固定金价 {} USD/克",
                self.fallback_price_per_gram
            );
        }
        Quote::new(self.fallback_price_per_gram, FALLBACK_SOURCE)
    }

    async fn attempt(&self, provider: &dyn QuoteProvider) -> Result<f64> {
        let price = tokio::time::timeout(self.attempt_timeout, provider.fetch_price_per_gram())
            .await
            .map_err(|_| anyhow!("请求超时 ({:?})", self.attempt_timeout))??;

        if !price.is_finite() || price <= 0.0 {
            return Err(anyhow!("无效的金价: {}", price));
        }
        Ok(price)
    }
}
