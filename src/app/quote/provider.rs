//! 金价提供方
//!
//! 每个提供方只负责一次请求和响应解析，失败直接返回错误，
//! 回退逻辑由 [`QuoteSource`](super::source::QuoteSource) 统一处理。

use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use super::model::QuoteUnit;
use crate::infrastructure::config::{ProviderConfig, ProviderKind};

/// 金价提供方 trait
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// 提供方名称，用于日志和报价来源标记
    fn name(&self) -> &str;

    /// 获取每克金价（USD）
    async fn fetch_price_per_gram(&self) -> Result<f64>;
}

/// 固定金价提供方，永远成功
pub struct ConstantProvider {
    name: String,
    price_per_gram: f64,
}

impl ConstantProvider {
    pub fn new(name: impl Into<String>, price_per_gram: f64) -> Self {
        Self {
            name: name.into(),
            price_per_gram,
        }
    }
}

#[async_trait]
impl QuoteProvider for ConstantProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_price_per_gram(&self) -> Result<f64> {
        Ok(self.price_per_gram)
    }
}

/// goldapi.io 风格的提供方，响应体中 `price` 为单位报价
pub struct GoldApiProvider {
    name: String,
    client: Client,
    url: Url,
    api_key: Option<String>,
    unit: QuoteUnit,
}

#[derive(Debug, Deserialize)]
struct GoldApiBody {
    price: Option<f64>,
}

impl GoldApiProvider {
    pub fn new(
        name: impl Into<String>,
        client: Client,
        url: Url,
        api_key: Option<String>,
        unit: QuoteUnit,
    ) -> Self {
        Self {
            name: name.into(),
            client,
            url,
            api_key,
            unit,
        }
    }
}

/// 解析 goldapi 响应体，返回原始单位报价
pub fn parse_goldapi_body(body: &[u8]) -> Result<f64> {
    let parsed: GoldApiBody = serde_json::from_slice(body).context("goldapi: 响应 JSON 解析失败")?;
    parsed.price.ok_or_else(|| anyhow!("goldapi: 响应缺少 price 字段"))
}

#[async_trait]
impl QuoteProvider for GoldApiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_price_per_gram(&self) -> Result<f64> {
        let mut request = self
            .client
            .get(self.url.clone())
            .header("accept", "application/json");
        if let Some(key) = &self.api_key {
            request = request.header("x-access-token", key);
        }

        let resp = request
            .send()
            .await
            .context("goldapi: 请求失败")?
            .error_for_status()
            .context("goldapi: 非成功状态码")?;

        let body = resp.bytes().await.context("goldapi: 读取响应体失败")?;
        let raw = parse_goldapi_body(&body)?;
        Ok(self.unit.to_per_gram(raw))
    }
}

/// 汇率信封风格的提供方
///
/// 响应形如 `{ "success": true, "data": { "base": "XAU", "currency": "USD", "rates": { "USD": 2350.1 } } }`，
/// `rates[currency]` 为一单位基础金属对应的美元价格。
pub struct RatesProvider {
    name: String,
    client: Client,
    url: Url,
    api_key: Option<String>,
    unit: QuoteUnit,
}

#[derive(Debug, Deserialize)]
struct RatesEnvelope {
    success: bool,
    data: Option<RatesData>,
}

#[derive(Debug, Deserialize)]
struct RatesData {
    #[allow(dead_code)]
    base: String,
    currency: String,
    rates: HashMap<String, f64>,
}

impl RatesProvider {
    pub fn new(
        name: impl Into<String>,
        client: Client,
        url: Url,
        api_key: Option<String>,
        unit: QuoteUnit,
    ) -> Self {
        Self {
            name: name.into(),
            client,
            url,
            api_key,
            unit,
        }
    }
}

/// 解析汇率信封响应体，返回原始单位报价
pub fn parse_rates_body(body: &[u8]) -> Result<f64> {
    let envelope: RatesEnvelope =
        serde_json::from_slice(body).context("rates: 响应 JSON 解析失败")?;
    if !envelope.success {
        return Err(anyhow!("rates: 提供方返回 success=false"));
    }
    let data = envelope
        .data
        .ok_or_else(|| anyhow!("rates: 响应缺少 data 字段"))?;
    data.rates
        .get(&data.currency)
        .copied()
        .ok_or_else(|| anyhow!("rates: 缺少 {} 汇率", data.currency))
}

#[async_trait]
impl QuoteProvider for RatesProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_price_per_gram(&self) -> Result<f64> {
        let mut url = self.url.clone();
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("access_key", key);
        }

        let resp = self
            .client
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .context("rates: 请求失败")?
            .error_for_status()
            .context("rates: 非成功状态码")?;

        let body = resp.bytes().await.context("rates: 读取响应体失败")?;
        let raw = parse_rates_body(&body)?;
        Ok(self.unit.to_per_gram(raw))
    }
}

/// 根据配置构建提供方
pub fn build_provider(config: &ProviderConfig, client: &Client) -> Result<Box<dyn QuoteProvider>> {
    let provider: Box<dyn QuoteProvider> = match config.kind {
        ProviderKind::Constant => {
            let price = config
                .price_per_gram
                .ok_or_else(|| anyhow!("提供方 {} 缺少 price_per_gram", config.name))?;
            Box::new(ConstantProvider::new(&config.name, price))
        }
        ProviderKind::Goldapi => Box::new(GoldApiProvider::new(
            &config.name,
            client.clone(),
            parse_url(config)?,
            config.api_key.clone(),
            config.unit,
        )),
        ProviderKind::Rates => Box::new(RatesProvider::new(
            &config.name,
            client.clone(),
            parse_url(config)?,
            config.api_key.clone(),
            config.unit,
        )),
    };
    Ok(provider)
}

fn parse_url(config: &ProviderConfig) -> Result<Url> {
    let raw = config
        .url
        .as_deref()
        .ok_or_else(|| anyhow!("提供方 {} 缺少 url", config.name))?;
    Url::parse(raw).with_context(|| format!("提供方 {} 的 url 无效: {}", config.name, raw))
}
